//! Remote data providers.
//!
//! Two independent read-only sources feed the estimator:
//! - the vault stats API (yield windows, redeem rate, identity metadata)
//! - the money-market GraphQL API (borrow/supply rates, rewards)
//!
//! Every transport or decoding fault is absorbed into a [`FetchOutcome`]
//! status string here; nothing downstream ever sees a raw error. The rate
//! selector treats an absent record identically regardless of the status
//! text — the descriptor exists only for the DATA USED display.

pub mod market;
pub mod vault;

use chrono::{DateTime, Utc};

pub use market::MarketClient;
pub use vault::VaultStatsClient;

/// Result of one fetch attempt: a normalized record, or a diagnostic
/// descriptor explaining why it is unavailable.
#[derive(Debug, Clone)]
pub struct FetchOutcome<T> {
    pub data: Option<T>,
    /// Diagnostic descriptor, e.g. `"network_error: …"`, `"json_error: …"`,
    /// `"parse_error: …"`, `"vault_not_found"`. Display only.
    pub status: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl<T> FetchOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            status: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            data: None,
            status: Some(status.into()),
            fetched_at: Utc::now(),
        }
    }
}
