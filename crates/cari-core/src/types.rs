use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios expressed as decimals (1.2 = 120% of the limit).
pub type Ratio = Decimal;

/// Whole calendar days. Negative when a due date lies in the future.
pub type Days = i64;

/// Stable identifier of a customer record.
pub type CustomerId = String;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Lenient amounts
// ---------------------------------------------------------------------------

/// Parse an amount the way ledger rows are typed in by hand.
///
/// Accepts `"1250.50"`, `"1250,50"`, `"1.250,50"`, `"1,250.50"` and
/// scientific notation. Returns `None` when nothing numeric can be recovered.
pub fn parse_lenient_money(raw: &str) -> Option<Money> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Decimal comma with dot grouping: 1.250,50
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        // Comma grouping with decimal dot: 1,250.50
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => {
            if cleaned.matches(',').count() == 1 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        // Dot grouping without decimals: 1.250.000
        (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Coerce a loosely-typed JSON value into money. Missing or malformed values
/// become zero.
pub fn coerce_money(raw: Option<&Value>) -> Money {
    match raw {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::Number(n)) => match parse_lenient_money(&n.to_string()) {
            Some(v) => v,
            None => {
                tracing::warn!(value = %n, "numeric amount out of decimal range; treated as zero");
                Decimal::ZERO
            }
        },
        Some(Value::String(s)) if s.trim().is_empty() => Decimal::ZERO,
        Some(Value::String(s)) => match parse_lenient_money(s) {
            Some(v) => v,
            None => {
                tracing::warn!(value = %s, "malformed amount treated as zero");
                Decimal::ZERO
            }
        },
        Some(other) => {
            tracing::warn!(value = %other, "non-numeric amount treated as zero");
            Decimal::ZERO
        }
    }
}

/// `deserialize_with` adapter for [`coerce_money`]. Pair with `#[serde(default)]`.
pub fn lenient_money<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_money(raw.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_plain_and_comma_decimals() {
        assert_eq!(parse_lenient_money("1250.50"), Some(dec!(1250.50)));
        assert_eq!(parse_lenient_money("1250,50"), Some(dec!(1250.50)));
        assert_eq!(parse_lenient_money(" 1.250,50 "), Some(dec!(1250.50)));
        assert_eq!(parse_lenient_money("1,250.50"), Some(dec!(1250.50)));
        assert_eq!(parse_lenient_money("1,250,000"), Some(dec!(1250000)));
        assert_eq!(parse_lenient_money("1.250.000"), Some(dec!(1250000)));
        assert_eq!(parse_lenient_money("-300"), Some(dec!(-300)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_lenient_money("abc"), None);
        assert_eq!(parse_lenient_money(""), None);
    }

    #[test]
    fn test_coerce_money_defaults_to_zero() {
        assert_eq!(coerce_money(None), Decimal::ZERO);
        assert_eq!(coerce_money(Some(&Value::Null)), Decimal::ZERO);
        assert_eq!(coerce_money(Some(&json!("n/a"))), Decimal::ZERO);
        assert_eq!(coerce_money(Some(&json!(true))), Decimal::ZERO);
        assert_eq!(coerce_money(Some(&json!(""))), Decimal::ZERO);
        assert_eq!(coerce_money(Some(&json!(12.5))), dec!(12.5));
        assert_eq!(coerce_money(Some(&json!("99,90"))), dec!(99.90));
        assert_eq!(coerce_money(Some(&json!("1.250.000"))), dec!(1250000));
    }
}
