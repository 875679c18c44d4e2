//! Resolved cell values.
//!
//! Rows are opaque JSON objects; an accessor resolves one of them into a
//! `CellValue` either for display or for ordering. The two paths differ only
//! in how `Empty` is treated: display substitutes the empty string, the sort
//! path keeps the raw value.

use serde_json::Value;

/// A value resolved from a row for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing property or JSON null.
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Convert a JSON value. Arrays and objects carry no natural cell
    /// representation and fall back to their JSON text.
    pub fn from_json(value: &Value) -> CellValue {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// Text shown in a cell. `Empty` displays as the empty string; ordering
    /// never goes through this method.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Empty);
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Bool(true));
        assert_eq!(CellValue::from_json(&json!(3.5)), CellValue::Number(3.5));
        assert_eq!(
            CellValue::from_json(&json!("hi")),
            CellValue::Text("hi".to_string())
        );
    }

    #[test]
    fn test_composite_values_display_as_json_text() {
        let v = CellValue::from_json(&json!([1, 2]));
        assert_eq!(v, CellValue::Text("[1,2]".to_string()));
    }

    #[test]
    fn test_empty_displays_as_empty_string() {
        assert_eq!(CellValue::Empty.display(), "");
        assert!(CellValue::Empty.is_empty());
    }

    #[test]
    fn test_integer_display_has_no_fraction() {
        assert_eq!(CellValue::Number(3.0).display(), "3");
        assert_eq!(CellValue::Number(3.25).display(), "3.25");
    }
}
