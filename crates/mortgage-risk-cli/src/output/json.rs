use serde_json::Value;

/// Pretty-print JSON on a terminal; emit a single compact line when piped
/// so the output can feed another `mra` invocation or `jq`.
pub fn print_json(value: &Value) {
    let rendered = if atty::is(atty::Stream::Stdout) {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
