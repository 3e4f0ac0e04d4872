//! Loop simulator — the iterative leverage computation.
//!
//! Pure and deterministic: no I/O, no randomness, no state across runs.
//! Each iteration borrows up to the per-loop cap, bounded by how much the
//! LTV ceiling still allows, and redeposits the borrowed amount. The bound
//! comes from solving `(borrow + take) / (assets + take) <= ltv` for `take`,
//! which keeps the invariant `borrow <= ltv * assets` true by construction.

use tracing::debug;

use crate::types::{LoopInputs, LoopResult, LooperError};

/// Leverage loop simulator with a validated LTV ceiling.
#[derive(Debug, Clone, Copy)]
pub struct LoopSimulator {
    ltv_limit: f64,
}

impl LoopSimulator {
    /// Create a simulator. The ceiling must be strictly inside (0, 1);
    /// either boundary would divide by zero in the iteration step.
    pub fn new(ltv_limit: f64) -> Result<Self, LooperError> {
        if !(ltv_limit > 0.0 && ltv_limit < 1.0) {
            return Err(LooperError::InvalidConfiguration(format!(
                "ltv_limit must be strictly between 0 and 1, got {ltv_limit}"
            )));
        }
        Ok(Self { ltv_limit })
    }

    pub fn ltv_limit(&self) -> f64 {
        self.ltv_limit
    }

    /// Advisory preview of how many loops the ceiling permits at a given
    /// per-loop cap. Display text only — the run itself terminates on its
    /// own `take <= 0` rule, which can disagree by one at the margin.
    pub fn max_loops_allowed(&self, initial: f64, max_borrow_per_loop: f64) -> u32 {
        if max_borrow_per_loop <= 0.0 || initial <= 0.0 {
            return 0;
        }
        let raw = (self.ltv_limit * initial) / ((1.0 - self.ltv_limit) * max_borrow_per_loop);
        if raw <= 0.0 {
            0
        } else {
            raw.floor() as u32
        }
    }

    /// Upper bound on a sensible per-loop borrow for display next to the
    /// prompt: the ceiling applied to the principal alone.
    pub fn max_first_borrow(&self, initial: f64) -> f64 {
        (self.ltv_limit * initial).max(0.0)
    }

    /// Run the looping calculation.
    pub fn run(&self, inputs: &LoopInputs) -> LoopResult {
        let ltv = self.ltv_limit;
        let mut assets_usdc = inputs.initial;
        let mut borrow_usdc = 0.0_f64;
        let mut loops_executed = 0u32;

        for _ in 0..inputs.requested_loops {
            let allowed = ((ltv * assets_usdc - borrow_usdc) / (1.0 - ltv)).max(0.0);
            let take = inputs.max_borrow_per_loop.min(allowed);
            if take <= 0.0 {
                // Ceiling saturated or cap is zero: no further loop can draw.
                break;
            }
            borrow_usdc += take;
            assets_usdc += take;
            loops_executed += 1;
        }

        let ltv_after = if assets_usdc > 0.0 {
            borrow_usdc / assets_usdc
        } else {
            0.0
        };
        let yearly_profit_yield = assets_usdc * inputs.vault_apy;
        let yearly_borrow_cost = borrow_usdc * inputs.borrow_apy;
        let net_yearly_profit = yearly_profit_yield - yearly_borrow_cost;
        let net_apy_on_equity = if inputs.initial > 0.0 {
            net_yearly_profit / inputs.initial
        } else {
            0.0
        };
        let equity = assets_usdc - borrow_usdc;
        let eff_leverage = if equity > 0.0 { assets_usdc / equity } else { 1.0 };

        debug!(
            loops_executed,
            requested = inputs.requested_loops,
            assets = format!("${assets_usdc:.2}"),
            borrow = format!("${borrow_usdc:.2}"),
            ltv_after = format!("{:.2}%", ltv_after * 100.0),
            "Loop simulation complete"
        );

        LoopResult {
            assets_usdc,
            borrow_usdc,
            loops_executed,
            ltv_after,
            yearly_profit_yield,
            yearly_borrow_cost,
            net_yearly_profit,
            net_apy_on_equity,
            eff_leverage,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
