use serde_json::Value;
use std::io;

use super::flatten::{cell, flatten_object, report_rows, union_headers};

/// Write output as CSV to stdout.
///
/// Reports with a `rows` array become one record per row with dotted
/// column names; anything else is written as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    let outcome = match (report_rows(result), result) {
        (Some(rows), _) => write_rows(&mut wtr, rows),
        (None, Value::Object(map)) => write_fields(&mut wtr, flatten_object(map)),
        (None, Value::Array(arr)) => write_rows(&mut wtr, arr),
        (None, other) => wtr.write_record([cell(other)]),
    };

    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    fields: Vec<(String, String)>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key, val])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let flat: Vec<Vec<(String, String)>> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(flatten_object)
        .collect();

    if flat.is_empty() {
        for item in rows {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    }

    let headers = union_headers(&flat);
    wtr.write_record(&headers)?;
    for row in &flat {
        let record: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
