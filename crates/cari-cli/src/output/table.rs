use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::flatten::{cell, flatten_object, report_rows, union_headers};

/// Format output as tables using the tabled crate.
///
/// Reports with a `rows` array print one line per customer, followed by the
/// remaining result fields (totals, summary) as a field/value table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_field_table(map),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if let Some(rows) = report_rows(result) {
                print_rows(rows);
                let rest: Map<String, Value> = res_map
                    .iter()
                    .filter(|(k, _)| k.as_str() != "rows")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                if !rest.is_empty() {
                    println!();
                    print_field_table(&rest);
                }
            } else {
                print_field_table(res_map);
            }
        }
        other => println!("{}", cell(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_object(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(no records)");
        return;
    }

    let flat: Vec<Vec<(String, String)>> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(flatten_object)
        .collect();

    if flat.is_empty() {
        for item in rows {
            println!("{}", cell(item));
        }
        return;
    }

    let headers = union_headers(&flat);
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in &flat {
        builder.push_record(headers.iter().map(|h| {
            row.iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}
