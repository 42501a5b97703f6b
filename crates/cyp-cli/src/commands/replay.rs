//! Deterministic replay of a scenario file against a fresh in-memory pool.
//!
//! ```toml
//! genesis = 0
//!
//! [config]
//! reward_rate_per_second = "1000000000000000000"
//! max_lock_seconds = 2592000
//! boost_max_e18 = "2000000000000000000"
//! penalty_bps = 500
//!
//! [[step]]
//! at = 0
//! op = "deposit"
//! account = "alice"
//! amount = "100"
//!
//! [[step]]
//! at = 10
//! op = "claim"
//! account = "alice"
//! expect = "1000"
//! ```
//!
//! Amounts are whole tokens unless `--raw` is given. `expect` is checked
//! against the step's headline number (shares minted, amount returned,
//! amount paid, pending); `expect_error` must appear in the error message.

use crate::commands::common::{parse_amount, print_json, Context};
use crate::{print_info, print_success};
use colored::*;
use cyp_core::{PoolConfig, PoolEngine, PoolError, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOp {
    Deposit,
    Withdraw,
    Claim,
    Pending,
    SetRate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at: u64,
    pub op: StepOp,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub lock: Option<u64>,
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub genesis: u64,
    #[serde(default)]
    pub config: PoolConfig,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// Per-step record printed (or emitted as JSON) after the run.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub at: u64,
    pub op: StepOp,
    pub account: Option<String>,
    /// Headline number of the step, raw units
    pub value: Option<String>,
    pub error: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub failures: usize,
    pub state_root: String,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let scenario: Scenario = toml::from_str(&content)?;
        scenario.config.validate()?;
        Ok(scenario)
    }
}

/// A step with its inputs parsed and checked.
enum Action<'a> {
    Deposit { account: &'a str, amount: U256, lock: u64 },
    Withdraw { account: &'a str, amount: U256 },
    Claim { account: &'a str },
    Pending { account: &'a str },
    SetRate { rate: U256 },
}

fn required<'a>(field: &'a Option<String>, name: &str, index: usize) -> Result<&'a str, String> {
    field
        .as_deref()
        .ok_or_else(|| format!("step {}: missing '{}'", index, name))
}

fn resolve(step: &Step, index: usize, raw: bool) -> Result<Action<'_>, Box<dyn std::error::Error>> {
    let amount = |name: &str| -> Result<U256, Box<dyn std::error::Error>> {
        parse_amount(required(&step.amount, name, index)?, raw)
    };
    Ok(match step.op {
        StepOp::Deposit => Action::Deposit {
            account: required(&step.account, "account", index)?,
            amount: amount("amount")?,
            lock: step.lock.unwrap_or(0),
        },
        StepOp::Withdraw => Action::Withdraw {
            account: required(&step.account, "account", index)?,
            amount: amount("amount")?,
        },
        StepOp::Claim => Action::Claim {
            account: required(&step.account, "account", index)?,
        },
        StepOp::Pending => Action::Pending {
            account: required(&step.account, "account", index)?,
        },
        StepOp::SetRate => Action::SetRate {
            rate: amount("amount")?,
        },
    })
}

/// Apply one action at `at`; Ok carries the step's headline value.
fn execute(engine: &mut PoolEngine, action: &Action, at: u64) -> Result<Option<U256>, PoolError> {
    let value = match *action {
        Action::Deposit {
            account,
            amount,
            lock,
        } => engine.deposit(account, amount, lock, at)?.shares_minted,
        Action::Withdraw { account, amount } => engine.withdraw(account, amount, at)?.amount_returned,
        Action::Claim { account } => engine.claim(account, at)?.amount_paid,
        Action::Pending { account } => engine.preview_pending(account, at)?,
        Action::SetRate { rate } => {
            engine.set_reward_rate(rate, at)?;
            return Ok(None);
        }
    };
    Ok(Some(value))
}

/// Run a scenario to completion. Malformed steps abort; engine errors
/// are recorded and checked against `expect_error`.
pub fn replay(scenario: &Scenario, raw: bool) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let mut engine = PoolEngine::new(scenario.config.clone(), scenario.genesis)?;
    let mut steps = Vec::with_capacity(scenario.steps.len());
    let mut failures = 0;

    for (index, step) in scenario.steps.iter().enumerate() {
        let expected = match &step.expect {
            Some(e) => Some(parse_amount(e, raw)?),
            None => None,
        };

        let action = resolve(step, index, raw)?;
        let (value, error) = match execute(&mut engine, &action, step.at) {
            Ok(v) => (v, None),
            Err(e) => (None, Some(e.to_string())),
        };

        let passed = match (&step.expect_error, &error) {
            (Some(want), Some(got)) => got.to_lowercase().contains(&want.to_lowercase()),
            (Some(_), None) => false,
            (None, Some(_)) => false,
            (None, None) => match expected {
                Some(want) => value == Some(want),
                None => true,
            },
        };
        if !passed {
            failures += 1;
        }

        steps.push(StepReport {
            index,
            at: step.at,
            op: step.op,
            account: step.account.clone(),
            value: value.map(|v| v.to_string()),
            error,
            passed,
        });
    }

    Ok(ReplayReport {
        steps,
        failures,
        state_root: engine.state_root(),
    })
}

pub fn run(ctx: &Context, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Scenario::load(path)?;
    if !ctx.json {
        print_info(&format!(
            "Replaying {} steps from {}",
            scenario.steps.len(),
            path.display()
        ));
    }
    let report = replay(&scenario, ctx.raw)?;

    if ctx.json {
        print_json(&report)?;
    } else {
        for s in &report.steps {
            let mark = if s.passed { "✓".green() } else { "✗".red() };
            let detail = match (&s.value, &s.error) {
                (_, Some(err)) => err.yellow().to_string(),
                (Some(v), None) => {
                    let v = U256::from_dec_str(v).unwrap_or_default();
                    ctx.fmt(v)
                }
                (None, None) => String::new(),
            };
            println!(
                "{} #{:<3} t={:<8} {:<9} {:<12} {}",
                mark,
                s.index,
                s.at,
                format!("{:?}", s.op).to_lowercase(),
                s.account.as_deref().unwrap_or("-"),
                detail
            );
        }
        println!();
        println!("{} {}", "State root:".bold(), report.state_root);
    }

    if report.failures > 0 {
        return Err(format!("{} step(s) did not match", report.failures).into());
    }
    if !ctx.json {
        print_success("Scenario passed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STAKERS: &str = r#"
genesis = 0

[config]
reward_rate_per_second = 1000000000000000000
max_lock_seconds = 100
boost_max_e18 = "2000000000000000000"
penalty_bps = 500

[[step]]
at = 0
op = "deposit"
account = "alice"
amount = "100"
expect = "100"

[[step]]
at = 0
op = "deposit"
account = "bob"
amount = "300"

[[step]]
at = 10
op = "pending"
account = "alice"
expect = "2.5"

[[step]]
at = 10
op = "claim"
account = "bob"
expect = "7.5"

[[step]]
at = 10
op = "claim"
account = "bob"
expect_error = "no rewards"
"#;

    fn load(src: &str) -> Scenario {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, src).unwrap();
        Scenario::load(&path).unwrap()
    }

    #[test]
    fn test_replay_two_stakers_passes() {
        let report = replay(&load(TWO_STAKERS), false).unwrap();
        assert_eq!(report.failures, 0, "{:?}", report.steps);
        assert_eq!(report.steps.len(), 5);
        assert_eq!(report.state_root.len(), 64);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let a = replay(&load(TWO_STAKERS), false).unwrap();
        let b = replay(&load(TWO_STAKERS), false).unwrap();
        assert_eq!(a.state_root, b.state_root);
    }

    #[test]
    fn test_replay_reports_mismatch() {
        let src = TWO_STAKERS.replace("expect = \"2.5\"", "expect = \"3\"");
        let report = replay(&load(&src), false).unwrap();
        assert_eq!(report.failures, 1);
        assert!(!report.steps[2].passed);
    }

    #[test]
    fn test_replay_unexpected_error_fails_step() {
        let src = r#"
[[step]]
at = 0
op = "withdraw"
account = "alice"
amount = "1"
"#;
        let report = replay(&load(src), false).unwrap();
        assert_eq!(report.failures, 1);
        assert!(report.steps[0].error.is_some());
    }

    #[test]
    fn test_replay_missing_field_aborts() {
        let src = r#"
[[step]]
at = 0
op = "deposit"
account = "alice"
"#;
        assert!(replay(&load(src), false).is_err());
    }
}
