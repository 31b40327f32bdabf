use serde_json::Value;

/// JSON pointers to the headline figure of each command, checked in order.
const HEADLINE_POINTERS: [&str; 9] = [
    "/selected/structure",
    "/score",
    "/worst_dti_scenario",
    "/housing_cost/total",
    "/monthly_payment",
    "/difference",
    "/summary/latest_rate",
    "/insights/market_risk",
    "/alternative_payment",
];

/// Print just the headline value of a result.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

/// The headline figure of a command result, falling back to the first
/// field of the result object.
pub fn headline(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = HEADLINE_POINTERS
        .iter()
        .filter_map(|p| result_obj.pointer(p))
        .find(|v| !v.is_null())
    {
        return format_minimal(val);
    }

    match result_obj {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
            None => format_minimal(result_obj),
        },
        other => format_minimal(other),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
