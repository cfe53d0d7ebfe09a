use crate::application::ports::{
    AppConfig, ConfigurationPort, LockoutConfig, LoggingConfig, RiskConfig,
};
use crate::domain::errors::DomainResult;

/// Environment-based configuration adapter
pub struct EnvConfigurationAdapter {
    config: AppConfig,
}

impl EnvConfigurationAdapter {
    pub fn new() -> DomainResult<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self { config })
    }

    /// Wrap an already assembled configuration after validating it
    pub fn from_config(config: AppConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl ConfigurationPort for EnvConfigurationAdapter {
    fn get_lockout_config(&self) -> &LockoutConfig {
        &self.config.lockout
    }

    fn get_risk_config(&self) -> &RiskConfig {
        &self.config.risk
    }

    fn get_logging_config(&self) -> &LoggingConfig {
        &self.config.logging
    }

    fn validate(&self) -> DomainResult<()> {
        self.config.validate()
    }

    fn is_development(&self) -> bool {
        self.config.is_development()
    }

    fn is_test(&self) -> bool {
        self.config.is_test()
    }
}
