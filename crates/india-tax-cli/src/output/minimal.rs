use serde_json::Value;

/// Print just the headline figure of a computation.
///
/// Looks for the headline field of each subcommand in priority order, then
/// falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // regular-tax, compare, assess, capital-gains, plan, deductions, advance-tax
    let priority_keys = [
        "total_tax",
        "recommended",
        "recommendation",
        "total_cg_tax",
        "combined_tax_saving",
        "total",
        "installments",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(key, val));
            return;
        }
    }

    println!("{}", format_minimal("", result_obj));
}

fn format_minimal(key: &str, value: &Value) -> String {
    match (key, value) {
        ("recommendation", Value::Object(rec)) => {
            let regime = rec.get("regime").and_then(Value::as_str).unwrap_or_default();
            let savings = rec.get("savings").and_then(Value::as_str).unwrap_or_default();
            format!("{regime} (saves {savings})")
        }
        // One line per installment: quarter, due date, amount
        ("installments", Value::Array(items)) => items
            .iter()
            .map(|i| {
                let field = |name: &str| i.get(name).and_then(Value::as_str).unwrap_or_default();
                format!(
                    "{} {} {}",
                    field("quarter"),
                    field("due_date"),
                    field("total_amount_due")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        (_, Value::String(s)) => s.clone(),
        (_, Value::Number(n)) => n.to_string(),
        (_, Value::Bool(b)) => b.to_string(),
        (_, Value::Null) => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
