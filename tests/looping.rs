//! End-to-end tests driving the rate selector and loop simulator together,
//! the way the interactive run loop wires them.

use looper::rates::{select_borrow_apy, select_vault_apy};
use looper::sim::LoopSimulator;
use looper::types::{BorrowMode, LoopInputs, MarketRateInfo, VaultYieldInfo, Window};

fn live_stats() -> VaultYieldInfo {
    VaultYieldInfo {
        vault_symbol: Some("yoUSD".to_string()),
        asset_address: Some("0x8335".to_string()),
        asset_symbol: Some("USDC".to_string()),
        share_price: Some(1.048),
        yield_1d: Some(0.075),
        yield_7d: Some(0.08),
        yield_30d: Some(0.082),
    }
}

fn live_market() -> MarketRateInfo {
    MarketRateInfo {
        lltv: Some(0.915),
        borrow_apy: Some(0.045),
        avg_borrow_apy: Some(0.042),
        avg_net_borrow_apy: Some(0.04),
        ..Default::default()
    }
}

#[test]
fn full_run_with_live_data() {
    let vault_sel = select_vault_apy(Some(&live_stats()), Window::SevenDay);
    let borrow_sel = select_borrow_apy(Some(&live_market()), BorrowMode::Net);

    assert_eq!(vault_sel.rate, 0.08);
    assert_eq!(vault_sel.window_used, "7d");
    assert!(vault_sel.note.is_empty());
    assert_eq!(borrow_sel.rate, 0.04);
    assert_eq!(borrow_sel.mode_used, "net");

    let sim = LoopSimulator::new(0.86).unwrap();
    let result = sim.run(&LoopInputs {
        initial: 1000.0,
        max_borrow_per_loop: 500.0,
        requested_loops: 3,
        vault_apy: vault_sel.rate,
        borrow_apy: borrow_sel.rate,
    });

    assert_eq!(result.loops_executed, 3);
    assert!((result.assets_usdc - 2500.0).abs() < 1e-9);
    assert!((result.borrow_usdc - 1500.0).abs() < 1e-9);
    assert!((result.ltv_after - 0.6).abs() < 1e-9);
    assert!((result.net_apy_on_equity - 0.14).abs() < 1e-9);
}

#[test]
fn full_run_with_entirely_unavailable_data() {
    // Both fetches failed: the run still completes on zero rates.
    let vault_sel = select_vault_apy(None, Window::SevenDay);
    let borrow_sel = select_borrow_apy(None, BorrowMode::Net);

    assert_eq!(vault_sel.rate, 0.0);
    assert_eq!(vault_sel.window_used, "unavailable");
    assert_eq!(borrow_sel.rate, 0.0);
    assert_eq!(borrow_sel.mode_used, "unavailable");

    let sim = LoopSimulator::new(0.86).unwrap();
    let result = sim.run(&LoopInputs {
        initial: 1000.0,
        max_borrow_per_loop: 500.0,
        requested_loops: 3,
        vault_apy: vault_sel.rate,
        borrow_apy: borrow_sel.rate,
    });

    assert_eq!(result.loops_executed, 3);
    assert_eq!(result.net_yearly_profit, 0.0);
    assert_eq!(result.net_apy_on_equity, 0.0);
}

#[test]
fn fallback_window_feeds_the_simulator() {
    // Only the 30d window is populated; a 1d request falls back to it.
    let stats = VaultYieldInfo {
        yield_30d: Some(0.06),
        ..Default::default()
    };
    let vault_sel = select_vault_apy(Some(&stats), Window::OneDay);
    assert_eq!(vault_sel.rate, 0.06);
    assert_eq!(vault_sel.window_used, "30d");
    assert_eq!(vault_sel.note, "fallback to 30d");

    let sim = LoopSimulator::new(0.86).unwrap();
    let result = sim.run(&LoopInputs {
        initial: 2000.0,
        max_borrow_per_loop: 400.0,
        requested_loops: 2,
        vault_apy: vault_sel.rate,
        borrow_apy: 0.0,
    });
    // assets = 2000 + 2*400 = 2800, yield = 2800 * 0.06
    assert!((result.yearly_profit_yield - 168.0).abs() < 1e-9);
}

#[test]
fn ltv_invariant_holds_across_input_grid() {
    let sim = LoopSimulator::new(0.86).unwrap();
    let limit = sim.ltv_limit();
    for initial in [100.0, 1000.0, 50_000.0] {
        for cap in [0.0, 50.0, 500.0, 10_000.0] {
            for loops in [0u32, 1, 5, 25] {
                let r = sim.run(&LoopInputs {
                    initial,
                    max_borrow_per_loop: cap,
                    requested_loops: loops,
                    vault_apy: 0.08,
                    borrow_apy: 0.04,
                });
                assert!(
                    r.borrow_usdc <= limit * r.assets_usdc + 1e-6,
                    "ceiling exceeded for initial={initial} cap={cap} loops={loops}"
                );
                assert!(r.loops_executed <= loops);
            }
        }
    }
}

#[test]
fn user_preference_strings_round_trip_through_enums() {
    // Invalid prompt strings collapse to the documented defaults before
    // selection runs.
    let stats = live_stats();
    let sel = select_vault_apy(Some(&stats), Window::parse_or_default("2w"));
    assert_eq!(sel.window_used, "7d");

    let m = live_market();
    let sel = select_borrow_apy(Some(&m), BorrowMode::parse_or_default("median"));
    assert_eq!(sel.mode_used, "net");
}
