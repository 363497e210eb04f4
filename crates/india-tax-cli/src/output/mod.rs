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

/// Flatten nested objects into dotted `field, value` rows, e.g.
/// `new_regime.total_tax` or `quarterly_tax.Q2.ltcg_tax`. Arrays of objects
/// are left out; callers render those as their own tables.
pub fn flatten(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into("", map, &mut rows);
    rows
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, rows: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, rows),
            Value::Array(items) if items.iter().any(Value::is_object) => {}
            _ => rows.push((name, scalar(val))),
        }
    }
}

/// Arrays of objects anywhere in the result, keyed by their dotted path.
pub fn object_arrays<'a>(map: &'a Map<String, Value>) -> Vec<(String, &'a [Value])> {
    let mut found = Vec::new();
    collect_arrays("", map, &mut found);
    found
}

fn collect_arrays<'a>(prefix: &str, map: &'a Map<String, Value>, found: &mut Vec<(String, &'a [Value])>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect_arrays(&name, inner, found),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                found.push((name, items.as_slice()))
            }
            _ => {}
        }
    }
}

pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "recommendation": { "regime": "New", "savings": "66300" },
            "advance_tax": {
                "regular_tax": "50700",
                "installments": [{ "quarter": "Q1" }, { "quarter": "Q2" }]
            }
        });
        let Value::Object(map) = &value else { unreachable!() };

        let rows = flatten(map);
        assert!(rows.contains(&("recommendation.regime".into(), "New".into())));
        assert!(rows.contains(&("advance_tax.regular_tax".into(), "50700".into())));
        assert!(!rows.iter().any(|(k, _)| k.ends_with("installments")));

        let arrays = object_arrays(map);
        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays[0].0, "advance_tax.installments");
        assert_eq!(arrays[0].1.len(), 2);
    }
}
