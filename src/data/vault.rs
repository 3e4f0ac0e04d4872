//! Vault stats API integration.
//!
//! Fetches yield statistics for the target vault from the Yo stats
//! endpoint and normalizes them into [`VaultYieldInfo`].
//!
//! Endpoint: `GET {api_base}/vault/stats`
//! Auth: none — fully public reads.
//!
//! The payload lists every vault; we locate ours by share-token address
//! (case-insensitive), chain id, and vault id. Yield windows arrive as
//! percent values and are converted to fractions here so everything
//! downstream works in fractional rates.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::FetchOutcome;
use crate::config::VaultConfig;
use crate::types::VaultYieldInfo;

// ---------------------------------------------------------------------------
// API response types (stats JSON → Rust)
// ---------------------------------------------------------------------------

/// Top-level stats payload. We only deserialize the fields we need.
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    data: Vec<StatsItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    chain: Option<ChainRef>,
    #[serde(default)]
    share_asset: Option<AssetRef>,
    #[serde(default)]
    asset: Option<AssetRef>,
    #[serde(default)]
    share_price: Option<SharePrice>,
    #[serde(default)]
    r#yield: Option<YieldWindows>,
}

#[derive(Debug, Default, Deserialize)]
struct ChainRef {
    #[serde(default)]
    id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetRef {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SharePrice {
    /// Human-readable price; the API serves it as a string.
    #[serde(default)]
    formatted: Option<String>,
}

/// Yield windows keyed `"1d"` / `"7d"` / `"30d"`, in percent. The API is
/// loose about numeric types, so each value is accepted as string or number.
#[derive(Debug, Default, Deserialize)]
struct YieldWindows {
    #[serde(default, rename = "1d")]
    one_day: Option<serde_json::Value>,
    #[serde(default, rename = "7d")]
    seven_day: Option<serde_json::Value>,
    #[serde(default, rename = "30d")]
    thirty_day: Option<serde_json::Value>,
}

/// Best-effort float coercion for string-or-number JSON values.
fn to_f64(v: &Option<serde_json::Value>) -> Option<f64> {
    match v {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Vault stats client.
pub struct VaultStatsClient {
    http: Client,
    config: VaultConfig,
}

impl VaultStatsClient {
    pub fn new(config: VaultConfig, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("LOOPER/0.1.0 (looping-estimator)")
            .build()
            .context("Failed to build HTTP client for vault stats")?;
        Ok(Self { http, config })
    }

    /// Fetch and normalize yield stats for the configured vault.
    ///
    /// Never returns an error: transport faults become `network_error`,
    /// decode faults become `json_error`, and a payload without our vault
    /// becomes `vault_not_found`. The run proceeds in a degraded state.
    pub async fn fetch_stats(&self) -> FetchOutcome<VaultYieldInfo> {
        let url = format!("{}/vault/stats", self.config.api_base);
        debug!(url = %url, "Fetching vault stats");

        let resp = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Vault stats request failed");
                return FetchOutcome::failed(format!("network_error: {e}"));
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(status = %status, "Vault stats API returned error status");
            return FetchOutcome::failed(format!("network_error: HTTP {status}"));
        }

        let payload: StatsResponse = match resp.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Vault stats payload was not valid JSON");
                return FetchOutcome::failed(format!("json_error: {e}"));
            }
        };

        match self.locate(payload.data) {
            Some(item) => {
                let info = Self::normalize(item);
                info!(
                    vault = info.vault_symbol.as_deref().unwrap_or("?"),
                    yield_7d = ?info.yield_7d,
                    "Vault stats fetched"
                );
                FetchOutcome::ok(info)
            }
            None => {
                warn!(
                    address = %self.config.address,
                    chain_id = self.config.chain_id,
                    "Configured vault not present in stats payload"
                );
                FetchOutcome::failed("vault_not_found")
            }
        }
    }

    /// Find the configured vault among the listed items.
    fn locate(&self, items: Vec<StatsItem>) -> Option<StatsItem> {
        let wanted = self.config.address.to_lowercase();
        items.into_iter().find(|it| {
            let share_addr = it
                .share_asset
                .as_ref()
                .and_then(|a| a.address.as_deref())
                .unwrap_or("")
                .to_lowercase();
            let chain_id = it.chain.as_ref().and_then(|c| c.id);
            share_addr == wanted
                && chain_id == Some(self.config.chain_id)
                && it.id.as_deref() == Some(self.config.vault_id.as_str())
        })
    }

    /// Convert a raw stats item to the normalized record. Percent yields
    /// become fractions.
    fn normalize(item: StatsItem) -> VaultYieldInfo {
        let vault_symbol = item
            .share_asset
            .as_ref()
            .and_then(|a| a.symbol.clone())
            .or(item.name)
            .or(item.id);
        let (asset_address, asset_symbol) = match &item.asset {
            Some(a) => (a.address.clone(), a.symbol.clone()),
            None => (None, None),
        };
        let share_price = item
            .share_price
            .as_ref()
            .and_then(|p| p.formatted.as_deref())
            .and_then(|s| s.trim().parse().ok());
        let windows = item.r#yield.unwrap_or_default();

        VaultYieldInfo {
            vault_symbol,
            asset_address,
            asset_symbol,
            share_price,
            yield_1d: to_f64(&windows.one_day).map(|v| v / 100.0),
            yield_7d: to_f64(&windows.seven_day).map(|v| v / 100.0),
            yield_30d: to_f64(&windows.thirty_day).map(|v| v / 100.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
