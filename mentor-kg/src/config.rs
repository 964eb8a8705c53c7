//! Runtime configuration for the tutor core

use crate::cache::config::CacheConfig;
use crate::error::{KgError, Result};
use crate::pack::assembler::DEFAULT_MAX_BUDGET;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Budget used when a request does not name one
pub const DEFAULT_BUDGET: usize = 25;

pub const ENV_CACHE_TTL_MS: &str = "MENTOR_CACHE_TTL_MS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "MENTOR_CACHE_MAX_ENTRIES";
pub const ENV_DEFAULT_BUDGET: &str = "MENTOR_DEFAULT_BUDGET";
pub const ENV_MAX_BUDGET: &str = "MENTOR_MAX_BUDGET";

/// Cache settings plus context-pack budget limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorConfig {
    pub cache: CacheConfig,

    /// Budget applied when a request omits one
    pub default_budget: usize,

    /// Requests above this are rejected with `InvalidBudget`
    pub max_budget: usize,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            default_budget: DEFAULT_BUDGET,
            max_budget: DEFAULT_MAX_BUDGET,
        }
    }
}

impl MentorConfig {
    /// Read `MENTOR_*` variables, loading a `.env` file first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup; unset variables keep their defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_CACHE_TTL_MS)? {
            config.cache.default_ttl = Duration::from_millis(ms);
        }
        if let Some(max) = parse_var(&lookup, ENV_CACHE_MAX_ENTRIES)? {
            config.cache.max_entries = max;
        }
        if let Some(budget) = parse_var(&lookup, ENV_DEFAULT_BUDGET)? {
            config.default_budget = budget;
        }
        if let Some(max) = parse_var(&lookup, ENV_MAX_BUDGET)? {
            config.max_budget = max;
        }

        config.validate()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;

        if self.max_budget == 0 {
            return Err(KgError::ConfigError(
                "max_budget must be greater than 0".to_string(),
            ));
        }

        if self.default_budget == 0 || self.default_budget > self.max_budget {
            return Err(KgError::ConfigError(format!(
                "default_budget must be between 1 and max_budget ({})",
                self.max_budget
            )));
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| KgError::ConfigError(format!("{} is not a valid number: {:?}", name, raw))),
    }
}
