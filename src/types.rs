//! Shared types for the LOOPER estimator.
//!
//! These types form the data model used across all modules: the normalized
//! records produced by the data clients, the rate-selection preferences, and
//! the inputs/outputs of the loop simulator. All are immutable value records
//! produced once per calculation run.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Vault yield record
// ---------------------------------------------------------------------------

/// Normalized yield statistics for the target vault.
///
/// All yield fields are fractional annualized rates (0.05 = 5%), already
/// converted from the percent values the API serves. Any field may be
/// missing independently of the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultYieldInfo {
    /// Vault share token symbol (e.g. "yoUSD").
    pub vault_symbol: Option<String>,
    /// Address of the underlying asset.
    pub asset_address: Option<String>,
    /// Symbol of the underlying asset (e.g. "USDC").
    pub asset_symbol: Option<String>,
    /// Redeem rate: underlying units per vault share.
    pub share_price: Option<f64>,
    pub yield_1d: Option<f64>,
    pub yield_7d: Option<f64>,
    pub yield_30d: Option<f64>,
}

impl VaultYieldInfo {
    /// The yield value for a given window, if present.
    pub fn yield_for(&self, window: Window) -> Option<f64> {
        match window {
            Window::OneDay => self.yield_1d,
            Window::SevenDay => self.yield_7d,
            Window::ThirtyDay => self.yield_30d,
        }
    }
}

// ---------------------------------------------------------------------------
// Market rate record
// ---------------------------------------------------------------------------

/// Normalized money-market rates for the borrow market.
///
/// All rates are fractional annualized. Any field may be missing
/// independently of the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketRateInfo {
    /// Liquidation LTV reported by the market.
    pub lltv: Option<f64>,
    /// Spot borrow APY.
    pub borrow_apy: Option<f64>,
    /// Trailing average borrow APY.
    pub avg_borrow_apy: Option<f64>,
    /// Trailing average borrow APY net of reward subsidies.
    pub avg_net_borrow_apy: Option<f64>,
    pub supply_apy: Option<f64>,
    pub avg_supply_apy: Option<f64>,
    pub avg_net_supply_apy: Option<f64>,
    pub rewards: Option<RewardRates>,
}

/// Reward subsidy rates attached to the market.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardRates {
    pub supply_apr: Option<f64>,
    pub borrow_apr: Option<f64>,
}

// ---------------------------------------------------------------------------
// Rate-selection preferences
// ---------------------------------------------------------------------------

/// Yield averaging window for the vault APY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    OneDay,
    SevenDay,
    ThirtyDay,
}

impl Window {
    /// Parse a user-supplied window string. Anything unrecognized falls
    /// back to the 7d default.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "1d" => Window::OneDay,
            "30d" => Window::ThirtyDay,
            _ => Window::SevenDay,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Window::OneDay => "1d",
            Window::SevenDay => "7d",
            Window::ThirtyDay => "30d",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which borrow-rate flavor to price the leverage with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowMode {
    Spot,
    Avg,
    Net,
}

impl BorrowMode {
    /// Parse a user-supplied mode string. Anything unrecognized falls back
    /// to the net default.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "spot" => BorrowMode::Spot,
            "avg" => BorrowMode::Avg,
            _ => BorrowMode::Net,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BorrowMode::Spot => "spot",
            BorrowMode::Avg => "avg",
            BorrowMode::Net => "net",
        }
    }
}

impl fmt::Display for BorrowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Simulator inputs and outputs
// ---------------------------------------------------------------------------

/// Inputs to a single looping calculation.
#[derive(Debug, Clone)]
pub struct LoopInputs {
    /// Initial principal in USDC. Caller validates > 0.
    pub initial: f64,
    /// Maximum borrow drawn per loop iteration, in USDC (>= 0).
    pub max_borrow_per_loop: f64,
    /// Requested number of loop iterations.
    pub requested_loops: u32,
    /// Selected vault APY (fractional).
    pub vault_apy: f64,
    /// Selected borrow APY (fractional).
    pub borrow_apy: f64,
}

/// Outcome of a looping calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopResult {
    /// Total assets deposited in the vault after looping.
    pub assets_usdc: f64,
    /// Total borrowed against those assets.
    pub borrow_usdc: f64,
    /// Loops actually executed (may be fewer than requested).
    pub loops_executed: u32,
    /// Resulting loan-to-value ratio.
    pub ltv_after: f64,
    /// Yearly yield earned on total assets, in USDC.
    pub yearly_profit_yield: f64,
    /// Yearly interest paid on the borrow, in USDC.
    pub yearly_borrow_cost: f64,
    /// Yield minus borrow cost, in USDC.
    pub net_yearly_profit: f64,
    /// Net yearly profit over the original principal.
    pub net_apy_on_equity: f64,
    /// Total assets over net equity (1.0 = unlevered).
    pub eff_leverage: f64,
}

impl fmt::Display for LoopResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assets=${:.2} borrow=${:.2} loops={} ltv={:.2}% leverage={:.2}x net_apy={:.2}%",
            self.assets_usdc,
            self.borrow_usdc,
            self.loops_executed,
            self.ltv_after * 100.0,
            self.eff_leverage,
            self.net_apy_on_equity * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for LOOPER.
///
/// Missing rate data never surfaces here — the rate selector resolves it by
/// fallback. Only configuration the simulator cannot run with is a hard
/// failure.
#[derive(Debug, thiserror::Error)]
pub enum LooperError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
