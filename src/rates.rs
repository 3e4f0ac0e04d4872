//! Rate selection policy.
//!
//! Given the (possibly partial or missing) fetched records and the user's
//! preferences, deterministically picks the vault APY and borrow APY the
//! simulator will run with. Missing data is never a hard failure here —
//! every path degrades to a 0.0 rate labeled "unavailable".

use tracing::debug;

use crate::types::{BorrowMode, MarketRateInfo, VaultYieldInfo, Window};

/// Label used when no usable rate exists.
pub const UNAVAILABLE: &str = "unavailable";

/// Chosen vault APY plus provenance for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultApySelection {
    pub rate: f64,
    /// Window the value actually came from, or "unavailable".
    pub window_used: String,
    /// Empty when the requested window was used directly; otherwise a
    /// human-readable fallback note.
    pub note: String,
}

/// Chosen borrow APY plus the mode label.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowApySelection {
    pub rate: f64,
    /// Always the normalized requested mode, or "unavailable" when the
    /// record itself is absent — never the name of a fallback field.
    pub mode_used: String,
}

impl VaultApySelection {
    fn unavailable() -> Self {
        Self {
            rate: 0.0,
            window_used: UNAVAILABLE.to_string(),
            note: "vault APY unavailable".to_string(),
        }
    }
}

/// Pick the vault APY for a requested window.
///
/// Fallback preference order: the requested window first, then 7d, 1d, 30d
/// (de-duplicated, first occurrence wins). The first window holding a value
/// is used; a fallback beyond index 0 is noted for display.
pub fn select_vault_apy(stats: Option<&VaultYieldInfo>, requested: Window) -> VaultApySelection {
    let stats = match stats {
        Some(s) => s,
        None => return VaultApySelection::unavailable(),
    };

    let mut order: Vec<Window> = Vec::with_capacity(4);
    for w in [requested, Window::SevenDay, Window::OneDay, Window::ThirtyDay] {
        if !order.contains(&w) {
            order.push(w);
        }
    }

    for (idx, window) in order.iter().enumerate() {
        if let Some(rate) = stats.yield_for(*window) {
            let note = if idx == 0 {
                String::new()
            } else {
                debug!(requested = %requested, used = %window, "Vault APY window fallback");
                format!("fallback to {window}")
            };
            return VaultApySelection {
                rate,
                window_used: window.label().to_string(),
                note,
            };
        }
    }

    debug!(requested = %requested, "No vault APY window populated");
    VaultApySelection::unavailable()
}

/// Pick the borrow APY for a requested mode.
///
/// Each mode prefers its own field and falls back at most two levels deep;
/// a still-missing value resolves to 0.0. The returned label is always the
/// requested mode — the fallback happens to the value source only.
pub fn select_borrow_apy(market: Option<&MarketRateInfo>, requested: BorrowMode) -> BorrowApySelection {
    let market = match market {
        Some(m) => m,
        None => {
            return BorrowApySelection {
                rate: 0.0,
                mode_used: UNAVAILABLE.to_string(),
            }
        }
    };

    let rate = match requested {
        BorrowMode::Net => market
            .avg_net_borrow_apy
            .or(market.borrow_apy)
            .or(market.avg_borrow_apy),
        BorrowMode::Avg => market.avg_borrow_apy.or(market.borrow_apy),
        BorrowMode::Spot => market.borrow_apy.or(market.avg_borrow_apy),
    };

    if rate.is_none() {
        debug!(mode = %requested, "No borrow APY field populated, using 0.0");
    }

    BorrowApySelection {
        rate: rate.unwrap_or(0.0),
        mode_used: requested.label().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(y1: Option<f64>, y7: Option<f64>, y30: Option<f64>) -> VaultYieldInfo {
        VaultYieldInfo {
            yield_1d: y1,
            yield_7d: y7,
            yield_30d: y30,
            ..Default::default()
        }
    }

    // -- Vault APY selection --

    #[test]
    fn test_vault_absent_record() {
        let sel = select_vault_apy(None, Window::SevenDay);
        assert_eq!(sel.rate, 0.0);
        assert_eq!(sel.window_used, "unavailable");
        assert_eq!(sel.note, "vault APY unavailable");
    }

    #[test]
    fn test_vault_requested_window_present_no_note() {
        let s = stats(Some(0.04), Some(0.05), Some(0.06));
        let sel = select_vault_apy(Some(&s), Window::ThirtyDay);
        assert_eq!(sel.rate, 0.06);
        assert_eq!(sel.window_used, "30d");
        assert!(sel.note.is_empty());
    }

    #[test]
    fn test_vault_fallback_to_7d() {
        // 1d requested but missing → 7d is next in preference order.
        let s = stats(None, Some(0.05), Some(0.06));
        let sel = select_vault_apy(Some(&s), Window::OneDay);
        assert_eq!(sel.rate, 0.05);
        assert_eq!(sel.window_used, "7d");
        assert_eq!(sel.note, "fallback to 7d");
    }

    #[test]
    fn test_vault_fallback_to_30d_only_window() {
        let s = stats(None, None, Some(0.06));
        let sel = select_vault_apy(Some(&s), Window::OneDay);
        assert_eq!(sel.rate, 0.06);
        assert_eq!(sel.window_used, "30d");
        assert_eq!(sel.note, "fallback to 30d");
    }

    #[test]
    fn test_vault_fallback_prefers_1d_over_30d() {
        // Requested 7d missing → 1d comes before 30d in the order.
        let s = stats(Some(0.04), None, Some(0.06));
        let sel = select_vault_apy(Some(&s), Window::SevenDay);
        assert_eq!(sel.rate, 0.04);
        assert_eq!(sel.window_used, "1d");
        assert_eq!(sel.note, "fallback to 1d");
    }

    #[test]
    fn test_vault_all_windows_missing() {
        let s = stats(None, None, None);
        let sel = select_vault_apy(Some(&s), Window::SevenDay);
        assert_eq!(sel.rate, 0.0);
        assert_eq!(sel.window_used, "unavailable");
        assert_eq!(sel.note, "vault APY unavailable");
    }

    // -- Borrow APY selection --

    fn market(
        spot: Option<f64>,
        avg: Option<f64>,
        net: Option<f64>,
    ) -> MarketRateInfo {
        MarketRateInfo {
            borrow_apy: spot,
            avg_borrow_apy: avg,
            avg_net_borrow_apy: net,
            ..Default::default()
        }
    }

    #[test]
    fn test_borrow_absent_record() {
        let sel = select_borrow_apy(None, BorrowMode::Net);
        assert_eq!(sel.rate, 0.0);
        assert_eq!(sel.mode_used, "unavailable");
    }

    #[test]
    fn test_borrow_net_prefers_net_field() {
        let m = market(Some(0.05), Some(0.045), Some(0.038));
        let sel = select_borrow_apy(Some(&m), BorrowMode::Net);
        assert_eq!(sel.rate, 0.038);
        assert_eq!(sel.mode_used, "net");
    }

    #[test]
    fn test_borrow_net_falls_back_to_spot_then_avg() {
        let m = market(Some(0.05), Some(0.045), None);
        let sel = select_borrow_apy(Some(&m), BorrowMode::Net);
        assert_eq!(sel.rate, 0.05);
        // Label stays "net" even though the value came from the spot field.
        assert_eq!(sel.mode_used, "net");

        let m = market(None, Some(0.045), None);
        let sel = select_borrow_apy(Some(&m), BorrowMode::Net);
        assert_eq!(sel.rate, 0.045);
        assert_eq!(sel.mode_used, "net");
    }

    #[test]
    fn test_borrow_avg_falls_back_to_spot() {
        let m = market(Some(0.05), None, Some(0.038));
        let sel = select_borrow_apy(Some(&m), BorrowMode::Avg);
        assert_eq!(sel.rate, 0.05);
        assert_eq!(sel.mode_used, "avg");
    }

    #[test]
    fn test_borrow_spot_falls_back_to_avg() {
        let m = market(None, Some(0.045), None);
        let sel = select_borrow_apy(Some(&m), BorrowMode::Spot);
        assert_eq!(sel.rate, 0.045);
        assert_eq!(sel.mode_used, "spot");
    }

    #[test]
    fn test_borrow_all_fields_missing_resolves_to_zero() {
        let m = market(None, None, None);
        for mode in [BorrowMode::Spot, BorrowMode::Avg, BorrowMode::Net] {
            let sel = select_borrow_apy(Some(&m), mode);
            assert_eq!(sel.rate, 0.0);
            assert_eq!(sel.mode_used, mode.label());
        }
    }

    #[test]
    fn test_borrow_spot_does_not_see_net_field() {
        // Spot mode's chain is spot → avg only; the net field is ignored.
        let m = market(None, None, Some(0.038));
        let sel = select_borrow_apy(Some(&m), BorrowMode::Spot);
        assert_eq!(sel.rate, 0.0);
    }
}
