//! Output formatting controls shared by all commands.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    pub fields: Option<String>,
}

impl OutputControls {
    /// Render data as JSON according to output controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));

        let filtered = match self.fields.as_deref().map(field_list) {
            Some(fields) if !fields.is_empty() => keep_fields(value, &fields),
            _ => value,
        };

        render(&filtered, self.compact)
    }

    /// Print data to stdout according to output controls.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }
}

fn render(value: &Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|_| "null".to_string())
}

/// Split `--fields` into names; blanks from stray commas are dropped.
fn field_list(fields: &str) -> Vec<&str> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

/// Keep only the listed keys of each row. Link lists are arrays of rows;
/// summaries are a single object.
fn keep_fields(value: Value, fields: &[&str]) -> Value {
    match value {
        Value::Array(rows) => {
            Value::Array(rows.into_iter().map(|row| keep_fields(row, fields)).collect())
        }
        Value::Object(mut row) => {
            let kept: Map<String, Value> = fields
                .iter()
                .filter_map(|field| row.remove(*field).map(|v| (field.to_string(), v)))
                .collect();
            Value::Object(kept)
        }
        other => other,
    }
}

/// Failure report printed in `--json` mode.
#[derive(Debug, Serialize)]
struct ErrorReport {
    success: bool,
    error: String,
    /// Underlying causes, outermost first (e.g. the file, then the CSV row).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
}

/// Format a command failure as JSON, keeping the context chain as `causes`.
pub fn format_error(error: &anyhow::Error) -> String {
    let report = ErrorReport {
        success: false,
        error: error.to_string(),
        causes: error.chain().skip(1).map(|cause| cause.to_string()).collect(),
    };
    serde_json::to_string(&report)
        .unwrap_or_else(|_| json!({ "success": false, "error": error.to_string() }).to_string())
}
