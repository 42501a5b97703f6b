use crate::commands::common::{print_json, resolve_now, Context};
use crate::{print_info, print_success};
use colored::*;
use cyp_core::WithdrawOutcome;

/// Shown only once a withdrawal has actually been charged.
fn penalty_notice(
    outcome: &WithdrawOutcome,
    lock_remaining: u64,
    penalty_bps: u16,
) -> Option<String> {
    if outcome.penalty_charged.is_zero() {
        return None;
    }
    Some(format!(
        "Lock had {}s left: early-exit penalty of {} bps applied",
        lock_remaining, penalty_bps
    ))
}

pub fn deposit(
    ctx: &Context,
    account: &str,
    amount: &str,
    lock: u64,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let amount = ctx.parse_amount(amount)?;
    let now = resolve_now(now)?;
    let mut engine = ctx.load_engine()?;

    let outcome = engine.deposit(account, amount, lock, now)?;
    ctx.save_engine(&engine)?;

    if ctx.json {
        return print_json(&outcome);
    }
    print_success(&format!("{} staked {}", account, ctx.fmt(amount).green()));
    println!(
        "  {} {}",
        "Shares minted:".bold(),
        ctx.fmt(outcome.shares_minted).cyan()
    );
    if outcome.new_lock_expiry > now {
        println!(
            "  {} t={} ({}s from now)",
            "Locked until:".bold(),
            outcome.new_lock_expiry,
            outcome.new_lock_expiry - now
        );
    }
    Ok(())
}

pub fn withdraw(
    ctx: &Context,
    account: &str,
    amount: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let amount = ctx.parse_amount(amount)?;
    let now = resolve_now(now)?;
    let mut engine = ctx.load_engine()?;

    // read before the call: a full exit clears the lock
    let lock_remaining = engine
        .account(account)
        .map(|a| a.lock_remaining_secs(now))
        .unwrap_or(0);

    let outcome = engine.withdraw(account, amount, now)?;
    ctx.save_engine(&engine)?;

    if ctx.json {
        return print_json(&outcome);
    }
    if let Some(notice) = penalty_notice(&outcome, lock_remaining, engine.pool().penalty_bps) {
        print_info(&notice);
    }
    print_success(&format!(
        "{} withdrew {}",
        account,
        ctx.fmt(outcome.amount_returned).green()
    ));
    if !outcome.penalty_charged.is_zero() {
        println!(
            "  {} {} ({})",
            "Penalty:".bold(),
            ctx.fmt(outcome.penalty_charged).red(),
            engine.pool().penalty_sink
        );
    }
    println!(
        "  {} {}",
        "Shares burned:".bold(),
        ctx.fmt(outcome.shares_burned)
    );
    Ok(())
}

pub fn claim(
    ctx: &Context,
    account: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = resolve_now(now)?;
    let mut engine = ctx.load_engine()?;

    let outcome = engine.claim(account, now)?;
    ctx.save_engine(&engine)?;

    if ctx.json {
        return print_json(&outcome);
    }
    print_success(&format!(
        "{} claimed {}",
        account,
        ctx.fmt(outcome.amount_paid).green().bold()
    ));
    Ok(())
}
