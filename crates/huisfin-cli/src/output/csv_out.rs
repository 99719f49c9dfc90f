use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A schedule, when present, is the table: one record per month. Otherwise
/// the summary is written as flattened `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = match value {
        Value::Object(map) => match (map.get("results"), map.get("result")) {
            (Some(Value::Array(rows)), _) => write_rows(&mut wtr, rows),
            (_, Some(Value::Object(summary))) => write_fields(&mut wtr, summary),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => wtr.write_record([super::cell(other, "")]),
    };

    if let Err(e) = result.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in super::flatten(map) {
        wtr.write_record([key, super::cell(&val, "")])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(|v| super::cell(v, "")).unwrap_or_default()),
        )?;
    }
    Ok(())
}
