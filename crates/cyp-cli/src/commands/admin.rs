use crate::commands::common::{load_config, print_json, resolve_now, Context};
use crate::{print_info, print_success};
use colored::*;
use cyp_core::PoolEngine;

pub fn init(
    ctx: &Context,
    genesis: Option<u64>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.state_path.exists() && !force {
        return Err(format!(
            "Pool already exists at {} (use --force to overwrite)",
            ctx.state_path.display()
        )
        .into());
    }

    let config = load_config(ctx.config_path.as_deref())?;
    let genesis = resolve_now(genesis)?;
    let engine = PoolEngine::new(config.clone(), genesis)?;
    ctx.save_engine(&engine)?;

    if ctx.json {
        return print_json(&config);
    }
    print_success(&format!("Pool created at {}", ctx.state_path.display()));
    println!("  {} {}", "Genesis:".bold(), genesis);
    println!(
        "  {} {}/s",
        "Reward rate:".bold(),
        ctx.fmt(config.reward_rate_per_second).cyan()
    );
    println!("  {} {}s", "Max lock:".bold(), config.max_lock_seconds);
    println!(
        "  {} {}x",
        "Max boost:".bold(),
        cyp_core::format_units(config.boost_max_e18, cyp_core::WAD_DECIMALS)
    );
    println!(
        "  {} {} bps ({})",
        "Early-exit penalty:".bold(),
        config.penalty_bps,
        config.penalty_sink
    );
    Ok(())
}

pub fn set_rate(
    ctx: &Context,
    rate: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rate = ctx.parse_amount(rate)?;
    let now = resolve_now(now)?;
    let mut engine = ctx.load_engine()?;
    let old = engine.pool().reward_rate_per_second;

    print_info(&format!("Settling at the old rate up to t={}...", now));
    engine.set_reward_rate(rate, now)?;
    ctx.save_engine(&engine)?;

    if ctx.json {
        return print_json(&engine.pool_stats(now)?);
    }
    print_success(&format!(
        "Reward rate {}/s -> {}/s",
        ctx.fmt(old),
        ctx.fmt(rate).green()
    ));
    Ok(())
}
