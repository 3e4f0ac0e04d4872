//! LOOPER — Leveraged Looping Yield Estimator
//!
//! Entry point. Loads configuration, initialises structured logging,
//! fetches live vault and market data, and drives the interactive
//! prompt→select→simulate→print loop until the user quits.

use anyhow::Result;
use std::io;
use tracing::{info, warn};

use looper::config::AppConfig;
use looper::console::{self, fmt_label, fmt_rate, fmt_usd};
use looper::data::{FetchOutcome, MarketClient, VaultStatsClient};
use looper::rates::{self, BorrowApySelection, VaultApySelection};
use looper::sim::LoopSimulator;
use looper::types::{BorrowMode, LoopInputs, MarketRateInfo, VaultYieldInfo, Window};

const BANNER: &str = r#"
 _     ___   ___  ____  _____ ____
| |   / _ \ / _ \|  _ \| ____|  _ \
| |  | | | | | | | |_) |  _| | |_) |
| |__| |_| | |_| |  __/| |___|  _ <
|_____\___/ \___/|_|   |_____|_| \_\

  Leveraged Looping Yield Estimator
  v0.1.0
"#;

const RULE_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML (fails fast on an out-of-range LTV)
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    println!("{BANNER}");
    info!(
        vault = %cfg.vault.vault_id,
        chain_id = cfg.vault.chain_id,
        ltv_limit = cfg.looping.ltv_limit,
        "LOOPER starting up"
    );

    // -- Initialise components -------------------------------------------

    let vault_client = VaultStatsClient::new(cfg.vault.clone(), cfg.looping.fetch_timeout_secs)?;
    let market_client = MarketClient::new(cfg.market.clone(), cfg.looping.fetch_timeout_secs)?;
    let simulator = LoopSimulator::new(cfg.looping.ltv_limit)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    // -- Main loop -------------------------------------------------------

    loop {
        let rule = "=".repeat(RULE_WIDTH);
        println!("{rule}");
        println!("Looping Calculator");
        println!("{rule}");
        println!();

        println!("Fetching live data...");
        // Independent read-only fetches — issue both at once.
        let (vault_outcome, market_outcome) =
            tokio::join!(vault_client.fetch_stats(), market_client.fetch_rates());
        info!(
            vault_fetched_at = %vault_outcome.fetched_at,
            market_fetched_at = %market_outcome.fetched_at,
            "Live data fetched"
        );

        let window_raw = console::read_str_or(
            &mut input,
            &mut output,
            &format!("Vault APY window (1d/7d/30d) [{}]: ", cfg.prompts.default_window),
            &cfg.prompts.default_window,
        )?;
        let window = Window::parse_or_default(&window_raw);

        let mode_raw = console::read_str_or(
            &mut input,
            &mut output,
            &format!("Borrow APY mode (spot/avg/net) [{}]: ", cfg.prompts.default_mode),
            &cfg.prompts.default_mode,
        )?;
        let mode = BorrowMode::parse_or_default(&mode_raw);

        let vault_sel = rates::select_vault_apy(vault_outcome.data.as_ref(), window);
        let borrow_sel = rates::select_borrow_apy(market_outcome.data.as_ref(), mode);

        print_data_used(&vault_outcome, &market_outcome, &vault_sel, &borrow_sel);

        // -- Inputs ------------------------------------------------------

        println!();
        println!("Please enter the following values:");
        println!();

        let initial = console::read_f64(&mut input, &mut output, "Base investment (USDC): ")?;
        let preview_max = simulator.max_first_borrow(initial);
        let mut max_borrow_per_loop = console::read_f64(
            &mut input,
            &mut output,
            &format!("Max borrow per loop (USDC) [max {}]: ", fmt_usd(preview_max)),
        )?;
        if max_borrow_per_loop < 0.0 {
            max_borrow_per_loop = 0.0;
        }

        let max_loops_allowed = simulator.max_loops_allowed(initial, max_borrow_per_loop);
        let requested_loops = console::read_u32(
            &mut input,
            &mut output,
            &format!("Number of loops [max {max_loops_allowed}]: "),
        )?;
        if requested_loops > max_loops_allowed {
            println!("Loops must be between 0 and {max_loops_allowed}. Exiting.");
            return Ok(());
        }

        // -- Simulation --------------------------------------------------

        println!();
        println!("{rule}");
        println!("CALCULATING...");
        println!("{rule}");
        println!();

        let result = simulator.run(&LoopInputs {
            initial,
            max_borrow_per_loop,
            requested_loops,
            vault_apy: vault_sel.rate,
            borrow_apy: borrow_sel.rate,
        });

        info!(
            loops = result.loops_executed,
            assets = format!("{:.2}", result.assets_usdc),
            borrow = format!("{:.2}", result.borrow_usdc),
            net_apy = format!("{:.4}", result.net_apy_on_equity),
            "Calculation complete"
        );

        println!("RESULTS:");
        println!("{}", "-".repeat(RULE_WIDTH));
        println!("{}{}", fmt_label("Gross Assets (USDC):"), fmt_usd(result.assets_usdc));
        println!("{}{:.2}x", fmt_label("Effective Leverage:"), result.eff_leverage);
        println!("{}{}", fmt_label("LTV After Leverage:"), fmt_rate(result.ltv_after));
        println!("{}{}", fmt_label("Net Borrowed USDC:"), fmt_usd(result.borrow_usdc));
        println!("{}{}", fmt_label("Loops Executed:"), result.loops_executed);
        println!("{}{}", fmt_label("Looped Supply APY:"), fmt_rate(vault_sel.rate));
        println!(
            "{}{}",
            fmt_label("Yearly Yield on Assets:"),
            fmt_usd(result.yearly_profit_yield)
        );
        println!("{}{}", fmt_label("Yearly Borrow Cost:"), fmt_usd(result.yearly_borrow_cost));
        println!("{}{}", fmt_label("Net Yearly Profit:"), fmt_usd(result.net_yearly_profit));
        println!("{}", "-".repeat(RULE_WIDTH));
        println!(
            "{}{}",
            fmt_label("Net APY on Initial Deposit:"),
            fmt_rate(result.net_apy_on_equity)
        );
        println!("{rule}");
        println!();

        let again = console::read_str_or(&mut input, &mut output, "Calculate again? (y/n): ", "n")?;
        if again.to_lowercase() != "y" {
            break;
        }
        println!("\n");
    }

    info!("LOOPER shut down cleanly.");
    Ok(())
}

/// Print the DATA USED block: vault identity, redeem rate, selected rates,
/// and fetch status lines when a source was unavailable.
fn print_data_used(
    vault_outcome: &FetchOutcome<VaultYieldInfo>,
    market_outcome: &FetchOutcome<MarketRateInfo>,
    vault_sel: &VaultApySelection,
    borrow_sel: &BorrowApySelection,
) {
    let stats = vault_outcome.data.as_ref();

    println!();
    println!("DATA USED");
    println!("{}", "-".repeat(RULE_WIDTH));

    match stats.and_then(|s| s.vault_symbol.as_deref()) {
        Some(symbol) => println!("{}{}", fmt_label("Vault Token:"), symbol),
        None => println!("{}unavailable", fmt_label("Vault Token:")),
    }

    match stats.and_then(|s| s.asset_address.as_deref()) {
        Some(addr) => match stats.and_then(|s| s.asset_symbol.as_deref()) {
            Some(sym) => println!("{}{} ({})", fmt_label("Underlying Asset:"), addr, sym),
            None => println!("{}{}", fmt_label("Underlying Asset:"), addr),
        },
        None => println!("{}unavailable", fmt_label("Underlying Asset:")),
    }

    match stats.and_then(|s| s.share_price) {
        Some(rate) => println!("{}{:.8}", fmt_label("Redeem Rate (USDC/share):"), rate),
        None => println!("{}unavailable", fmt_label("Redeem Rate (USDC/share):")),
    }

    println!(
        "{}{} [{}] ({})",
        fmt_label("Vault APY:"),
        fmt_rate(vault_sel.rate),
        vault_sel.window_used,
        vault_sel.note,
    );
    println!(
        "{}{} [{}]",
        fmt_label("Borrow APY:"),
        fmt_rate(borrow_sel.rate),
        borrow_sel.mode_used,
    );

    if let Some(status) = &vault_outcome.status {
        warn!(status = %status, "Vault data unavailable for this run");
        println!("{}{}", fmt_label("Vault data status:"), status);
    }
    if let Some(status) = &market_outcome.status {
        warn!(status = %status, "Market data unavailable for this run");
        println!("{}{}", fmt_label("Market data status:"), status);
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("looper=info"));

    let json_logging = std::env::var("LOOPER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
