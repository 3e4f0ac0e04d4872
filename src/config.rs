//! Configuration loading from TOML with fail-fast validation.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. The
//! LTV ceiling is validated at load time: a value of exactly 0 or 1 would
//! make the looping arithmetic divide by zero, so it must stay strictly
//! inside (0, 1) before anything else runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::LooperError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub vault: VaultConfig,
    pub market: MarketConfig,
    pub looping: LoopingConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    /// Base URL of the vault stats API.
    pub api_base: String,
    /// Address of the vault share token.
    pub address: String,
    /// Vault identifier within the stats payload.
    pub vault_id: String,
    pub chain_id: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// GraphQL endpoint serving money-market state.
    pub graphql_url: String,
    /// Unique key of the borrow market.
    pub unique_key: String,
    pub chain_id: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoopingConfig {
    /// LTV ceiling enforced per loop iteration. Strictly inside (0, 1).
    pub ltv_limit: f64,
    /// HTTP timeout for both data fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptsConfig {
    /// Default vault APY window when the user presses Enter ("1d"/"7d"/"30d").
    pub default_window: String,
    /// Default borrow APY mode when the user presses Enter ("spot"/"avg"/"net").
    pub default_mode: String,
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulator cannot run with.
    pub fn validate(&self) -> Result<(), LooperError> {
        let ltv = self.looping.ltv_limit;
        if !(ltv > 0.0 && ltv < 1.0) {
            return Err(LooperError::InvalidConfiguration(format!(
                "ltv_limit must be strictly between 0 and 1, got {ltv}"
            )));
        }
        if self.looping.fetch_timeout_secs == 0 {
            return Err(LooperError::InvalidConfiguration(
                "fetch_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
