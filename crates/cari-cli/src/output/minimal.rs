use serde_json::Value;

use super::flatten::{cell, flatten_object};

/// Result fields worth printing on their own, most specific first. Nested
/// fields match on their last path segment (`reconciliation.computed_balance`).
const PRIORITY_KEYS: [&str; 6] = [
    "risk_score",
    "to",
    "code",
    "closing_balance",
    "computed_balance",
    "customer_count",
];

/// Row fields printed next to the customer code.
const ROW_KEYS: [&str; 2] = ["risk_level", "total_balance"];

/// Print just the key answer value from the output.
///
/// Report rows print as `code<TAB>value`, one customer per line: risk level
/// for risk reports, total balance for aging reports.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result.get("rows") {
        Some(Value::Array(rows)) if !rows.is_empty() => {
            for row in rows {
                let code = row.get("customer_code").map(cell).unwrap_or_default();
                let answer = ROW_KEYS
                    .iter()
                    .find_map(|k| row.get(*k))
                    .map(cell)
                    .unwrap_or_default();
                println!("{}\t{}", code, answer);
            }
            return;
        }
        _ => {}
    }

    if let Value::Object(map) = result {
        let flat = flatten_object(map);
        for key in PRIORITY_KEYS {
            let suffix = format!(".{key}");
            if let Some((_, val)) = flat
                .iter()
                .find(|(name, _)| name == key || name.ends_with(&suffix))
            {
                println!("{}", val);
                return;
            }
        }

        if let Some((key, val)) = flat.first() {
            println!("{}: {}", key, val);
            return;
        }
    }

    println!("{}", cell(result));
}
