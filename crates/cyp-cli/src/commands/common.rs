use cyp_core::{format_units, parse_units, PoolConfig, PoolEngine, PoolSnapshot, U256, TOKEN_DECIMALS};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Settings shared by every command.
pub struct Context {
    pub state_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub raw: bool,
    pub json: bool,
}

pub fn default_state_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cyp")
        .join("pool.json")
}

/// `--now` if given, else the wall clock in unix seconds.
pub fn resolve_now(now: Option<u64>) -> Result<u64, Box<dyn std::error::Error>> {
    match now {
        Some(t) => Ok(t),
        None => Ok(std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs()),
    }
}

/// Parse a user amount: whole tokens ("12.5") or, with `raw`, base units.
pub fn parse_amount(input: &str, raw: bool) -> Result<U256, Box<dyn std::error::Error>> {
    if raw {
        let v = U256::from_dec_str(input.trim())
            .map_err(|e| format!("invalid raw amount '{}': {:?}", input, e))?;
        return Ok(v);
    }
    Ok(parse_units(input, TOKEN_DECIMALS)?)
}

pub fn format_amount(value: U256, raw: bool) -> String {
    if raw {
        value.to_string()
    } else {
        format_units(value, TOKEN_DECIMALS)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Pool config for `init`: explicit TOML file, else CYP_* env vars over defaults.
pub fn load_config(path: Option<&Path>) -> Result<PoolConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => PoolConfig::load_from_file(p).map_err(|e| {
            Box::<dyn std::error::Error>::from(format!(
                "Failed to load config {}: {}",
                p.display(),
                e
            ))
        }),
        None => PoolConfig::load_from_env(),
    }
}

impl Context {
    pub fn parse_amount(&self, input: &str) -> Result<U256, Box<dyn std::error::Error>> {
        parse_amount(input, self.raw)
    }

    pub fn fmt(&self, value: U256) -> String {
        format_amount(value, self.raw)
    }

    pub fn load_engine(&self) -> Result<PoolEngine, Box<dyn std::error::Error>> {
        if !self.state_path.exists() {
            return Err(format!(
                "No pool at {}. Run `cyp init` first.",
                self.state_path.display()
            )
            .into());
        }
        let snapshot = PoolSnapshot::load_from_file(&self.state_path)?;
        Ok(PoolEngine::from_snapshot(snapshot)?)
    }

    pub fn save_engine(&self, engine: &PoolEngine) -> Result<(), Box<dyn std::error::Error>> {
        engine.snapshot().save_to_file(&self.state_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyp_core::WAD;

    #[test]
    fn test_parse_amount_tokens_and_raw() {
        assert_eq!(parse_amount("1", false).unwrap(), WAD);
        assert_eq!(
            parse_amount("0.5", false).unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert_eq!(parse_amount("12345", true).unwrap(), U256::from(12_345));
        assert!(parse_amount("1.5", true).is_err());
        assert!(parse_amount("abc", false).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(WAD * U256::from(3), false), "3.0");
        assert_eq!(format_amount(U256::from(7), true), "7");
    }

    #[test]
    fn test_resolve_now_prefers_explicit() {
        assert_eq!(resolve_now(Some(5)).unwrap(), 5);
        assert!(resolve_now(None).unwrap() > 1_600_000_000);
    }

    #[test]
    fn test_load_engine_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            state_path: dir.path().join("missing.json"),
            config_path: None,
            raw: false,
            json: false,
        };
        assert!(ctx.load_engine().is_err());
    }
}
