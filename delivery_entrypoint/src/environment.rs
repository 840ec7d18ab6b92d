use std::str::FromStr;

use thiserror::Error;


const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// The current environment the lambda is running in
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Environment {
    /// Production environment
    #[strum(serialize = "prod")]
    Production,
    /// Dev and or staging environment
    #[strum(serialize = "dev")]
    Develop,
    /// Running on a developer machine, e.g. through cargo lambda watch
    #[strum(serialize = "local")]
    Local,
}

/// Represents a value which cannot be converted into an [Environment]
#[derive(Debug, Error)]
#[error("Could not convert {0} into an environment value")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(environment: &str) -> Result<Self, UnknownEnvironment> {
        match environment {
            "prod" => Ok(Environment::Production),
            "dev" => Ok(Environment::Develop),
            "local" => Ok(Environment::Local),
            s => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

impl Environment {
    /// Read the environment from `ENVIRONMENT`, falling back to production when it is missing
    /// or not recognized
    pub fn new_or_prod() -> Self {
        Self::from_var(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    fn from_var(value: Option<&str>) -> Self {
        value
            .and_then(|v| Environment::from_str(v).ok())
            .unwrap_or(Environment::Production)
    }
}
