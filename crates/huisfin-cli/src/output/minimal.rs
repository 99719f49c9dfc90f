use serde_json::Value;

/// Headline figure per command, in order of preference.
const HEADLINE_KEYS: [&str; 5] = [
    "annual_rate_pct",
    "annual_rate",
    "initial_payment",
    "net_amount",
    "principal",
];

/// Print just the headline value of the output.
///
/// Looks for a known headline field in the result, then falls back to the
/// first field.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        return super::cell(result, "null");
    };

    HEADLINE_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .map(|v| super::cell(v, "null"))
        .or_else(|| {
            map.iter()
                .next()
                .map(|(key, val)| format!("{}: {}", key, super::cell(val, "null")))
        })
        .unwrap_or_default()
}
