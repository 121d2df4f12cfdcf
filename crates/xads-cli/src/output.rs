//! Structured stdout output.
//!
//! Every command prints exactly one JSON document: `{"ok":true,"data":…}`
//! on success, `{"ok":false,"error":…}` on failure. Presentation beyond
//! that (tables, colors) is out of scope; downstream tools parse this.

use serde_json::json;

/// Print a success document.
pub fn print_ok<T: serde::Serialize>(data: &T) {
    let doc = json!({ "ok": true, "data": data });
    println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
}

/// Print a failure document. The error chain is flattened so callers see
/// both the summary and the root cause.
pub fn print_error(error: &anyhow::Error) {
    let chain: Vec<String> = error.chain().map(ToString::to_string).collect();
    let doc = json!({
        "ok": false,
        "error": {
            "message": error.to_string(),
            "chain": chain,
        }
    });
    println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
}
