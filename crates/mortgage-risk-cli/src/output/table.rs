use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Print a command result as a set of tables.
pub fn print_table(value: &Value) {
    println!("{}", render(value));
}

/// Lay out an analysis envelope: scalar result fields first, then one
/// section per nested object (housing cost, baseline, insights) and per
/// row collection (schedule, scenario results, candidates), then the
/// warnings and computation footer.
pub fn render(value: &Value) -> String {
    let Some(envelope) = value.as_object() else {
        return cell(value);
    };
    let result = match envelope.get("result") {
        Some(Value::Object(result)) => result,
        Some(other) => return render_rows_or_cell(other),
        None => return field_table(envelope, false),
    };

    let mut sections = vec![field_table(result, true)];
    for (key, val) in result {
        match val {
            Value::Object(nested) if !nested.is_empty() => {
                sections.push(format!("{}:\n{}", heading(key), field_table(nested, false)));
            }
            Value::Array(rows) if is_row_array(val) => {
                sections.push(format!("{} ({}):\n{}", heading(key), rows.len(), row_table(rows)));
            }
            _ => {}
        }
    }
    if let Some(footer) = footer(envelope) {
        sections.push(footer);
    }
    sections.join("\n\n")
}

/// Arrays of objects get their own table instead of an inline cell.
fn is_row_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn is_section(value: &Value) -> bool {
    is_row_array(value) || matches!(value, Value::Object(m) if !m.is_empty())
}

fn heading(key: &str) -> String {
    key.replace('_', " ")
}

/// Two-column field table. At the top level, sections are left for their
/// own tables; deeper down they are inlined.
fn field_table(map: &Map<String, Value>, skip_sections: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(_, v)| !(skip_sections && is_section(v))) {
        builder.push_record([heading(key), cell(val)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn row_table(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return rows.iter().map(cell).collect::<Vec<_>>().join("\n");
    };
    let headers: Vec<&String> = first.keys().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| heading(h)));
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(headers.iter().map(|h| row.get(*h).map(cell).unwrap_or_default()));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_rows_or_cell(value: &Value) -> String {
    match value {
        Value::Array(rows) if is_row_array(value) => row_table(rows),
        other => cell(other),
    }
}

fn footer(envelope: &Map<String, Value>) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(warnings) = envelope.get("warnings").and_then(Value::as_array) {
        if !warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(warnings.iter().filter_map(Value::as_str).map(|w| format!("  - {w}")));
        }
    }
    if let Some(meth) = envelope.get("methodology").and_then(Value::as_str) {
        lines.push(format!("Methodology: {meth}"));
    }
    if let Some(meta) = envelope.get("metadata") {
        if let (Some(us), Some(precision)) = (
            meta.get("computation_time_us").and_then(Value::as_u64),
            meta.get("precision").and_then(Value::as_str),
        ) {
            lines.push(format!("Computed in {us} us ({precision})"));
        }
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
