//! Output formatters

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a value as pretty JSON
    pub fn format<T: Serialize>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

/// Plain text formatter
///
/// Renders nested objects as indented `key: value` lines, which keeps metrics
/// documents greppable. Fractional numbers are shown with four decimals.
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn format<T: Serialize>(value: &T) -> Result<String> {
        let json = serde_json::to_value(value)?;
        let mut lines = Vec::new();
        Self::format_value(&json, 0, &mut lines);
        Ok(lines.join("\n"))
    }

    fn format_value(value: &Value, indent: usize, lines: &mut Vec<String>) {
        let indent_str = "  ".repeat(indent);
        match value {
            Value::Object(obj) => {
                for (key, child) in obj {
                    if Self::is_nested(child) {
                        lines.push(format!("{indent_str}{key}:"));
                        Self::format_value(child, indent + 1, lines);
                    } else {
                        lines.push(format!("{indent_str}{key}: {}", Self::scalar(child)));
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if Self::is_nested(item) {
                        lines.push(format!("{indent_str}-"));
                        Self::format_value(item, indent + 1, lines);
                    } else {
                        lines.push(format!("{indent_str}- {}", Self::scalar(item)));
                    }
                }
            }
            scalar => lines.push(format!("{indent_str}{}", Self::scalar(scalar))),
        }
    }

    fn is_nested(value: &Value) -> bool {
        match value {
            Value::Object(obj) => !obj.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => false,
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(|f| format!("{f:.4}"))
                .unwrap_or_else(|| n.to_string()),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Object(_) => "{}".to_string(),
            Value::Array(_) => "[]".to_string(),
        }
    }
}
