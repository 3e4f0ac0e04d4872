//! Money-market GraphQL integration.
//!
//! Fetches borrow/supply rate state for the configured market from the
//! Morpho GraphQL API and normalizes it into [`MarketRateInfo`].
//!
//! Endpoint: `POST {graphql_url}` with a `marketByUniqueKey` query.
//! Auth: none — fully public reads.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::FetchOutcome;
use crate::config::MarketConfig;
use crate::types::{MarketRateInfo, RewardRates};

const MARKET_QUERY: &str = r#"
query MarketInfo($uk: String!, $cid: Int!) {
  marketByUniqueKey(uniqueKey: $uk, chainId: $cid) {
    lltv
    state {
      borrowApy
      avgBorrowApy
      avgNetBorrowApy
      supplyApy
      avgSupplyApy
      avgNetSupplyApy
      rewards { supplyApr borrowApr }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// API response types (GraphQL JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlData {
    market_by_unique_key: Option<MarketNode>,
}

#[derive(Debug, Deserialize)]
struct MarketNode {
    #[serde(default)]
    lltv: Option<f64>,
    #[serde(default)]
    state: Option<MarketState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketState {
    #[serde(default)]
    borrow_apy: Option<f64>,
    #[serde(default)]
    avg_borrow_apy: Option<f64>,
    #[serde(default)]
    avg_net_borrow_apy: Option<f64>,
    #[serde(default)]
    supply_apy: Option<f64>,
    #[serde(default)]
    avg_supply_apy: Option<f64>,
    #[serde(default)]
    avg_net_supply_apy: Option<f64>,
    #[serde(default)]
    rewards: Option<RewardsNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewardsNode {
    #[serde(default)]
    supply_apr: Option<f64>,
    #[serde(default)]
    borrow_apr: Option<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Money-market GraphQL client.
pub struct MarketClient {
    http: Client,
    config: MarketConfig,
}

impl MarketClient {
    pub fn new(config: MarketConfig, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("LOOPER/0.1.0 (looping-estimator)")
            .build()
            .context("Failed to build HTTP client for market rates")?;
        Ok(Self { http, config })
    }

    /// Fetch and normalize rate state for the configured market.
    ///
    /// Never returns an error: transport faults become `network_error` and
    /// any JSON/shape problem becomes `parse_error`.
    pub async fn fetch_rates(&self) -> FetchOutcome<MarketRateInfo> {
        debug!(url = %self.config.graphql_url, key = %self.config.unique_key, "Fetching market rates");

        let body = serde_json::json!({
            "query": MARKET_QUERY,
            "variables": {
                "uk": self.config.unique_key,
                "cid": self.config.chain_id,
            },
        });

        let resp = match self.http.post(&self.config.graphql_url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Market rates request failed");
                return FetchOutcome::failed(format!("network_error: {e}"));
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(status = %status, "Market rates API returned error status");
            return FetchOutcome::failed(format!("network_error: HTTP {status}"));
        }

        let payload: GraphqlResponse = match resp.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Market rates payload failed to decode");
                return FetchOutcome::failed(format!("parse_error: {e}"));
            }
        };

        let node = match payload.data.and_then(|d| d.market_by_unique_key) {
            Some(n) => n,
            None => {
                warn!(key = %self.config.unique_key, "Market missing from GraphQL response");
                return FetchOutcome::failed("parse_error: marketByUniqueKey is null");
            }
        };

        let info = Self::normalize(node);
        info!(
            borrow_apy = ?info.borrow_apy,
            avg_net_borrow_apy = ?info.avg_net_borrow_apy,
            lltv = ?info.lltv,
            "Market rates fetched"
        );
        FetchOutcome::ok(info)
    }

    /// Flatten the GraphQL node into the normalized record.
    fn normalize(node: MarketNode) -> MarketRateInfo {
        let state = node.state.unwrap_or_default();
        MarketRateInfo {
            lltv: node.lltv,
            borrow_apy: state.borrow_apy,
            avg_borrow_apy: state.avg_borrow_apy,
            avg_net_borrow_apy: state.avg_net_borrow_apy,
            supply_apy: state.supply_apy,
            avg_supply_apy: state.avg_supply_apy,
            avg_net_supply_apy: state.avg_net_supply_apy,
            rewards: state.rewards.map(|r| RewardRates {
                supply_apr: r.supply_apr,
                borrow_apr: r.borrow_apr,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
