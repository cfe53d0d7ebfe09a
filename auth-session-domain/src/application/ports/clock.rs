use chrono::{DateTime, Utc};

/// Time source port.
///
/// Services read it once per command and pass the reading into the
/// aggregate, so every comparison inside a command agrees on "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
