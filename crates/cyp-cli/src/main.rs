// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COMMUNITY YIELD POOL CLI - drive a persisted pool from the shell
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// The engine never reads a clock; this host does. Every command takes an
// optional `--now <unix secs>` so runs can be replayed deterministically.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod commands;
mod logger;

use commands::common::{default_state_path, Context};

#[derive(Parser)]
#[command(name = "cyp")]
#[command(about = "Community Yield Pool - staking reward accrual", long_about = None)]
#[command(version)]
struct Cli {
    /// Pool state file (default: ~/.cyp/pool.json)
    #[arg(short, long, env = "CYP_STATE")]
    state: Option<PathBuf>,

    /// Pool config TOML used by `init` (otherwise CYP_* env vars / defaults)
    #[arg(short, long, env = "CYP_CONFIG")]
    config: Option<PathBuf>,

    /// Amounts are raw 18-decimal units instead of whole tokens
    #[arg(long, global = true)]
    raw: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty pool
    Init {
        /// Genesis timestamp (default: now)
        #[arg(long)]
        genesis: Option<u64>,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Stake tokens, optionally locked for a boost
    Deposit {
        /// Account id
        account: String,

        /// Amount to stake
        amount: String,

        /// Lock duration in seconds
        #[arg(short, long, default_value_t = 0)]
        lock: u64,

        #[arg(long)]
        now: Option<u64>,
    },

    /// Unstake principal (penalized while locked)
    Withdraw {
        account: String,
        amount: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Claim all pending rewards
    Claim {
        account: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Show claimable rewards
    Pending {
        account: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Show an account's position
    Account {
        account: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Explain an account's pending rewards
    Diagnose {
        account: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Show pool totals
    Stats {
        #[arg(long)]
        now: Option<u64>,
    },

    /// Change the reward rate (tokens per second)
    SetRate {
        rate: String,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Print the state root of the persisted pool
    Root,

    /// Run a scenario file against a fresh in-memory pool
    Replay {
        /// Scenario TOML
        scenario: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if !cli.json {
        print_banner();
    }

    let ctx = Context {
        state_path: cli.state.unwrap_or_else(default_state_path),
        config_path: cli.config,
        raw: cli.raw,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Init { genesis, force } => commands::admin::init(&ctx, genesis, force),
        Commands::SetRate { rate, now } => commands::admin::set_rate(&ctx, &rate, now),
        Commands::Deposit {
            account,
            amount,
            lock,
            now,
        } => commands::stake::deposit(&ctx, &account, &amount, lock, now),
        Commands::Withdraw {
            account,
            amount,
            now,
        } => commands::stake::withdraw(&ctx, &account, &amount, now),
        Commands::Claim { account, now } => commands::stake::claim(&ctx, &account, now),
        Commands::Pending { account, now } => commands::query::pending(&ctx, &account, now),
        Commands::Account { account, now } => commands::query::account(&ctx, &account, now),
        Commands::Diagnose { account, now } => commands::query::diagnose(&ctx, &account, now),
        Commands::Stats { now } => commands::query::stats(&ctx, now),
        Commands::Root => commands::query::root(&ctx),
        Commands::Replay { scenario } => commands::replay::run(&ctx, &scenario),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        "╔═══════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║      COMMUNITY YIELD POOL - CLI v0.1.0        ║"
            .cyan()
            .bold()
    );
    println!(
        "{}",
        "║     Stake | Lock for boost | Claim anytime    ║".cyan()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════╝".cyan()
    );
    println!();
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── CLI Argument Parsing ────────────────────────────────────

    #[test]
    fn test_cli_init() {
        let cli = Cli::try_parse_from(["cyp", "init", "--genesis", "1700000000", "--force"]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Init { genesis, force } => {
                assert_eq!(genesis, Some(1_700_000_000));
                assert!(force);
            }
            _ => panic!("Expected Init"),
        }
    }

    #[test]
    fn test_cli_deposit_with_lock() {
        let cli = Cli::try_parse_from([
            "cyp", "deposit", "alice", "12.5", "--lock", "86400", "--now", "42",
        ]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Deposit {
                account,
                amount,
                lock,
                now,
            } => {
                assert_eq!(account, "alice");
                assert_eq!(amount, "12.5");
                assert_eq!(lock, 86_400);
                assert_eq!(now, Some(42));
            }
            _ => panic!("Expected Deposit"),
        }
    }

    #[test]
    fn test_cli_deposit_lock_defaults_to_zero() {
        let cli = Cli::try_parse_from(["cyp", "deposit", "bob", "1"]).unwrap();
        match cli.command {
            Commands::Deposit { lock, now, .. } => {
                assert_eq!(lock, 0);
                assert_eq!(now, None);
            }
            _ => panic!("Expected Deposit"),
        }
    }

    #[test]
    fn test_cli_withdraw_and_claim() {
        let cli = Cli::try_parse_from(["cyp", "withdraw", "alice", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Withdraw { .. }));
        let cli = Cli::try_parse_from(["cyp", "claim", "alice", "--now", "99"]).unwrap();
        match cli.command {
            Commands::Claim { account, now } => {
                assert_eq!(account, "alice");
                assert_eq!(now, Some(99));
            }
            _ => panic!("Expected Claim"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "cyp",
            "--state",
            "/tmp/pool.json",
            "stats",
            "--json",
            "--raw",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/pool.json")));
        assert!(cli.json);
        assert!(cli.raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Stats { now: None }));
    }

    #[test]
    fn test_cli_set_rate_and_replay() {
        let cli = Cli::try_parse_from(["cyp", "set-rate", "0.25"]).unwrap();
        match cli.command {
            Commands::SetRate { rate, .. } => assert_eq!(rate, "0.25"),
            _ => panic!("Expected SetRate"),
        }
        let cli = Cli::try_parse_from(["cyp", "replay", "scenario.toml"]).unwrap();
        match cli.command {
            Commands::Replay { scenario } => assert_eq!(scenario, PathBuf::from("scenario.toml")),
            _ => panic!("Expected Replay"),
        }
    }

    #[test]
    fn test_cli_missing_amount_rejected() {
        assert!(Cli::try_parse_from(["cyp", "deposit", "alice"]).is_err());
        assert!(Cli::try_parse_from(["cyp", "frobnicate"]).is_err());
    }
}
