use crate::commands::common::{print_json, resolve_now, Context};
use crate::print_info;
use colored::*;
use cyp_core::{AccountStatus, Diagnosis};

pub fn pending(
    ctx: &Context,
    account: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = resolve_now(now)?;
    let engine = ctx.load_engine()?;
    let pending = engine.preview_pending(account, now)?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "account": account,
            "now": now,
            "pending_rewards": pending.to_string(),
        }));
    }
    println!(
        "{} {}",
        "Pending rewards:".bold(),
        ctx.fmt(pending).green()
    );
    Ok(())
}

pub fn account(
    ctx: &Context,
    account: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = resolve_now(now)?;
    let engine = ctx.load_engine()?;
    let view = engine.account_view(account, now)?;

    if ctx.json {
        return print_json(&view);
    }
    let status = match view.status {
        AccountStatus::Uninitialized => "No stake".dimmed(),
        AccountStatus::Locked => "Locked".yellow().bold(),
        AccountStatus::Unlocked => "Unlocked".green().bold(),
    };
    println!("{} {}", "Account:".bold(), account.cyan());
    println!("  {} {}", "Status:".bold(), status);
    println!("  {} {}", "Principal:".bold(), ctx.fmt(view.principal));
    println!("  {} {}", "Shares:".bold(), ctx.fmt(view.shares));
    println!(
        "  {} {}",
        "Pending rewards:".bold(),
        ctx.fmt(view.pending_rewards).green()
    );
    println!("  {} {}", "Total claimed:".bold(), ctx.fmt(view.total_claimed));
    if view.is_locked {
        println!(
            "  {} t={} ({}s remaining)",
            "Lock expiry:".bold(),
            view.lock_expiry,
            view.lock_remaining_secs
        );
    }
    Ok(())
}

pub fn diagnose(
    ctx: &Context,
    account: &str,
    now: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = resolve_now(now)?;
    let engine = ctx.load_engine()?;
    let d = engine.diagnose(account, now)?;

    if ctx.json {
        return print_json(&d);
    }
    println!("{} {}", "Diagnostics for".bold(), account.cyan());
    println!("  {} {}s", "Since last update:".bold(), d.seconds_since_update);
    println!("  {} {}", "Index (settled):".bold(), d.acc_reward_per_share);
    println!(
        "  {} {}",
        "Index (projected):".bold(),
        d.projected_acc_reward_per_share
    );
    println!("  {} {}", "Account checkpoint:".bold(), d.account_checkpoint);
    println!("  {} {}", "Index delta:".bold(), d.index_delta);
    println!("  {} {}", "Shares:".bold(), ctx.fmt(d.shares));
    println!("  {} {}", "Settled pending:".bold(), ctx.fmt(d.settled_pending));
    println!(
        "  {} {}",
        "Projected pending:".bold(),
        ctx.fmt(d.projected_pending)
    );
    println!(
        "  {} {}",
        "Reward/share/sec:".bold(),
        d.reward_per_share_per_second
    );
    let verdict = match d.diagnosis {
        Diagnosis::HasRewards => d.diagnosis.to_string().green(),
        Diagnosis::NoStake => d.diagnosis.to_string().dimmed(),
        Diagnosis::RecentlyUpdated | Diagnosis::RoundingToZero => {
            d.diagnosis.to_string().yellow()
        }
    };
    println!("  {} {}", "Verdict:".bold(), verdict);
    Ok(())
}

pub fn stats(ctx: &Context, now: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let now = resolve_now(now)?;
    let engine = ctx.load_engine()?;
    let s = engine.pool_stats(now)?;

    if ctx.json {
        return print_json(&s);
    }
    println!("{}", "Pool".bold());
    println!("  {} {}", "Total staked:".bold(), ctx.fmt(s.total_principal).cyan());
    println!("  {} {}", "Total shares:".bold(), ctx.fmt(s.total_shares));
    println!(
        "  {} {}/s",
        "Reward rate:".bold(),
        ctx.fmt(s.reward_rate_per_second)
    );
    println!("  {} {}", "Reward index:".bold(), s.acc_reward_per_share);
    println!(
        "  {} {}",
        "Rewards claimed:".bold(),
        ctx.fmt(s.total_rewards_claimed)
    );
    println!(
        "  {} {}",
        "Penalties collected:".bold(),
        ctx.fmt(s.total_penalties_collected)
    );
    println!(
        "  {} {} ({} active)",
        "Accounts:".bold(),
        s.account_count,
        s.active_accounts
    );
    println!(
        "  {} {}s / {} bps / {}",
        "Max lock / penalty / sink:".bold(),
        s.max_lock_seconds,
        s.penalty_bps,
        s.penalty_sink
    );
    Ok(())
}

pub fn root(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let engine = ctx.load_engine()?;
    let root = engine.state_root();
    if ctx.json {
        return print_json(&serde_json::json!({ "state_root": root }));
    }
    print_info(&format!("State root: {}", root.green()));
    Ok(())
}
