// ─────────────────────────────────────────────────────────────────
// Fixed-Point Math - 18-decimal scaled integers on 256-bit words
// ─────────────────────────────────────────────────────────────────
// 1e18 (WAD) represents 1.0. Every product that can exceed 256 bits
// goes through a 512-bit intermediate and is narrowed back with an
// explicit overflow check. Division always rounds toward zero, so the
// pool under-pays by dust and never over-pays.
// ─────────────────────────────────────────────────────────────────

use uint::construct_uint;

use crate::error::PoolError;

construct_uint! {
    /// 256-bit unsigned integer used for every amount, share and index.
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer, only used as a product intermediate.
    pub struct U512(8);
}

/// 1e18: fixed-point representation of 1.0
pub const WAD: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Number of decimals carried by WAD-scaled values
pub const WAD_DECIMALS: usize = 18;

fn widen(x: U256) -> U512 {
    let mut words = [0u64; 8];
    words[..4].copy_from_slice(&x.0);
    U512(words)
}

fn narrow(x: U512) -> Option<U256> {
    if x.0[4..].iter().any(|w| *w != 0) {
        return None;
    }
    let mut words = [0u64; 4];
    words.copy_from_slice(&x.0[..4]);
    Some(U256(words))
}

/// `a * b / denom`, rounded toward zero, with a 512-bit intermediate.
///
/// Fails with `ArithmeticOverflow` when `denom` is zero or the quotient
/// does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denom: U256) -> Result<U256, PoolError> {
    if denom.is_zero() {
        return Err(PoolError::ArithmeticOverflow);
    }
    // 256 × 256 bits always fits in 512 bits.
    let product = widen(a)
        .checked_mul(widen(b))
        .ok_or(PoolError::ArithmeticOverflow)?;
    narrow(product / widen(denom)).ok_or(PoolError::ArithmeticOverflow)
}

/// `a + b`, or `ArithmeticOverflow`.
pub fn checked_add(a: U256, b: U256) -> Result<U256, PoolError> {
    a.checked_add(b).ok_or(PoolError::ArithmeticOverflow)
}

/// Underflow is reported as `ArithmeticOverflow` as well: both mean the
/// result does not fit the unsigned target width.
pub fn checked_sub(a: U256, b: U256) -> Result<U256, PoolError> {
    a.checked_sub(b).ok_or(PoolError::ArithmeticOverflow)
}

/// `a * b`, or `ArithmeticOverflow`.
pub fn checked_mul(a: U256, b: U256) -> Result<U256, PoolError> {
    a.checked_mul(b).ok_or(PoolError::ArithmeticOverflow)
}

/// Render a scaled integer as an exact decimal string.
/// No floating point: `format_units(2.5e18, 18) == "2.5"`.
pub fn format_units(value: U256, decimals: usize) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let unit = U256::exp10(decimals);
    let whole = value / unit;
    let frac = value % unit;
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals);
    let trimmed = frac_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Parse a decimal string ("12", "0.5", "3.") into a scaled integer.
pub fn parse_units(input: &str, decimals: usize) -> Result<U256, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty amount".to_string());
    }
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid amount '{}'", input));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("invalid amount '{}'", input));
    }
    if frac.len() > decimals {
        return Err(format!(
            "amount '{}' has more than {} decimal places",
            input, decimals
        ));
    }
    let digits = format!(
        "{}{}{}",
        if whole.is_empty() { "0" } else { whole },
        frac,
        "0".repeat(decimals - frac.len())
    );
    U256::from_dec_str(&digits).map_err(|e| format!("amount '{}' out of range: {:?}", input, e))
}

/// Serde adapter for U256: serialize as a decimal string, deserialize from
/// a decimal string or a plain integer. TOML and JSON numbers cannot carry
/// 256 bits, so persisted values round-trip through strings.
pub mod u256_dec {
    use super::U256;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(val: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        use serde::de::{self, Visitor};
        struct U256Visitor;

        impl<'de> Visitor<'de> for U256Visitor {
            type Value = U256;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u256 as a decimal string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
                U256::from_dec_str(v).map_err(|e| E::custom(format!("invalid u256: {:?}", e)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
                Ok(U256::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
                if v >= 0 {
                    Ok(U256::from(v as u64))
                } else {
                    Err(E::custom("negative value for u256"))
                }
            }
        }

        d.deserialize_any(U256Visitor)
    }
}
