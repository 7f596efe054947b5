//! Turn nested report rows into flat column/value pairs for tables and CSV.

use serde_json::{Map, Value};

/// Flatten nested objects into dotted keys (`aging.current`). Arrays of
/// scalars are joined with "; ". Key order follows the input.
pub fn flatten_object(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, out),
            other => out.push((name, cell(other))),
        }
    }
}

/// Render a single value as cell text.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Column headers across all rows, in first-seen order.
pub fn union_headers(rows: &[Vec<(String, String)>]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for (key, _) in row {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

/// The array of row objects in a report envelope, if any.
pub fn report_rows(result: &Value) -> Option<&Vec<Value>> {
    match result.get("rows") {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_object) => Some(rows),
        _ => None,
    }
}
