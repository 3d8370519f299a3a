use std::env;
use std::str::FromStr;

use log::Level;
use rusoto_core::Region;

use crate::error::RuleHandlerError;

const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const AWS_REGION: &str = "AWS_REGION";
const RULE_TEST_MODE: &str = "RULE_TEST_MODE";
const LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct RuleHandlerConfig {
    pub region: Region,
    pub test_mode: bool,
    pub log_level: Level,
}

impl Default for RuleHandlerConfig {
    fn default() -> Self {
        Self {
            region: Region::UsEast1,
            test_mode: false,
            log_level: Level::Info,
        }
    }
}

impl RuleHandlerConfig {
    pub fn from_env() -> Result<Self, RuleHandlerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuleHandlerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let region = match non_empty(AWS_DEFAULT_REGION).or_else(|| non_empty(AWS_REGION)) {
            Some(name) => Region::from_str(name.trim()).map_err(|error| {
                RuleHandlerError::InvalidConfig(format!("{}: {}", AWS_DEFAULT_REGION, error))
            })?,
            None => defaults.region,
        };

        let test_mode = match non_empty(RULE_TEST_MODE) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(RuleHandlerError::InvalidConfig(format!(
                        "{} must be a boolean, got '{}'",
                        RULE_TEST_MODE, other
                    )))
                }
            },
            None => defaults.test_mode,
        };

        let log_level = match non_empty(LOG_LEVEL) {
            Some(value) => Level::from_str(value.trim()).map_err(|_| {
                RuleHandlerError::InvalidConfig(format!(
                    "{} must be one of error, warn, info, debug, trace, got '{}'",
                    LOG_LEVEL, value
                ))
            })?,
            None => defaults.log_level,
        };

        Ok(RuleHandlerConfig {
            region,
            test_mode,
            log_level,
        })
    }
}
