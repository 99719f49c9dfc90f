use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, flatten};

/// Format output as tables: the summary as field/value rows, then the
/// month-by-month schedule when one was requested.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => print_fields(result),
        Some(other) => println!("{}", cell(other, "-")),
        None => print_fields(envelope),
    }

    if let Some(Value::Array(rows)) = envelope.get("results") {
        println!();
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(map) {
        builder.push_record([key, cell(&val, "-")]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(|v| cell(v, "-")).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}
