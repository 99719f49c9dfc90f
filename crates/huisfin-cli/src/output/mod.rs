pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `parent.child` rows, keeping field order.
///
/// A mortgage plan nests the gift and both amortization summaries; tables and
/// CSV show them as one field/value list.
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into(None, map, &mut rows);
    rows
}

fn flatten_into(prefix: Option<&str>, map: &Map<String, Value>, rows: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => flatten_into(Some(&name), inner, rows),
            other => rows.push((name, other.clone())),
        }
    }
}

/// Render a scalar for a single cell; `null` for absent optionals.
pub(crate) fn cell(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| cell(v, null))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nests_with_dots() {
        let value = json!({
            "principal": "277964.70",
            "gift": { "tax": "2964.70", "net_amount": "147035.30" },
            "linear": { "final_payment": null },
        });
        let rows = flatten(value.as_object().unwrap());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"principal"));
        assert!(keys.contains(&"gift.tax"));
        assert!(keys.contains(&"gift.net_amount"));
        assert!(keys.contains(&"linear.final_payment"));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_cell_formats_scalars() {
        assert_eq!(cell(&json!("3.98"), ""), "3.98");
        assert_eq!(cell(&json!(true), ""), "true");
        assert_eq!(cell(&Value::Null, "-"), "-");
        assert_eq!(cell(&json!(["a", "b"]), ""), "a, b");
    }
}
