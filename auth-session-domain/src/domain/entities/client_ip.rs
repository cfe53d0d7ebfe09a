use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A syntactically valid IPv4 or IPv6 address as supplied by the caller.
///
/// The original text is kept as-is: equality and display use that text, so
/// `"::1"` and `"0:0:0:0:0:0:0:1"` are different sources. Surrounding or
/// embedded whitespace is rejected rather than trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientIp {
    text: String,
    addr: IpAddr,
}

impl ClientIp {
    pub fn of(value: &str) -> DomainResult<Self> {
        if value.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "ClientIp cannot be null or empty",
            ));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::invalid_format("ClientIp", value));
        }

        let addr = value
            .parse::<IpAddr>()
            .map_err(|_| DomainError::invalid_format("ClientIp", value))?;

        Ok(Self {
            text: value.to_string(),
            addr,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }
}

impl TryFrom<String> for ClientIp {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<ClientIp> for String {
    fn from(ip: ClientIp) -> Self {
        ip.text
    }
}

impl std::str::FromStr for ClientIp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl std::fmt::Display for ClientIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
