//! Column descriptors, value accessors, and the row-key rule.
//!
//! Accessors are tagged variants resolved once at construction; the rest of
//! the core never branches on "property name vs. function" again.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{GridError, Result};
use crate::types::value::CellValue;

/// Unique identifier of a row within the active row set.
pub type RowKey = String;

/// Resolves a cell value from an opaque row.
#[derive(Clone)]
pub enum Accessor {
    /// Read a named property off the row object.
    Property(String),
    /// Call an arbitrary extraction function.
    Computed(Rc<dyn Fn(&Value) -> CellValue>),
}

impl Accessor {
    /// Accessor over a named property.
    pub fn property(name: impl Into<String>) -> Accessor {
        Accessor::Property(name.into())
    }

    /// Accessor over an extraction function.
    pub fn computed(f: impl Fn(&Value) -> CellValue + 'static) -> Accessor {
        Accessor::Computed(Rc::new(f))
    }

    /// Resolve the value for one row. A missing property is `Empty`.
    pub fn resolve(&self, row: &Value) -> CellValue {
        match self {
            Accessor::Property(name) => row
                .get(name)
                .map(CellValue::from_json)
                .unwrap_or(CellValue::Empty),
            Accessor::Computed(f) => f(row),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Property(name) => f.debug_tuple("Property").field(name).finish(),
            Accessor::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Row-key extraction rule, fixed at construction.
#[derive(Clone)]
pub enum KeyRule {
    /// Key is a named property of the row (string or number).
    Property(String),
    /// Key is computed by a caller-supplied function.
    Computed(Rc<dyn Fn(&Value) -> Option<RowKey>>),
}

impl KeyRule {
    pub fn property(name: impl Into<String>) -> KeyRule {
        KeyRule::Property(name.into())
    }

    pub fn computed(f: impl Fn(&Value) -> Option<RowKey> + 'static) -> KeyRule {
        KeyRule::Computed(Rc::new(f))
    }

    /// Resolve a row's key, or `None` if the rule yields nothing usable.
    pub fn resolve(&self, row: &Value) -> Option<RowKey> {
        match self {
            KeyRule::Property(name) => match row.get(name) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
            KeyRule::Computed(f) => f(row),
        }
    }
}

impl fmt::Debug for KeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRule::Property(name) => f.debug_tuple("Property").field(name).finish(),
            KeyRule::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Immutable description of one grid column. Columns do not change after the
/// grid is constructed.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Unique column key, referenced by sort orders and header interactions.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Column width in pixels.
    pub width: f32,
    /// Display-value accessor.
    pub accessor: Accessor,
    /// Distinct accessor used only when ordering rows.
    pub sort_accessor: Option<Accessor>,
    /// Flips every comparison result against this column.
    pub reverse: bool,
}

impl ColumnDescriptor {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        width: f32,
        accessor: Accessor,
    ) -> ColumnDescriptor {
        ColumnDescriptor {
            key: key.into(),
            label: label.into(),
            width,
            accessor,
            sort_accessor: None,
            reverse: false,
        }
    }

    /// Column keyed and displayed by the same named property.
    pub fn from_property(key: impl Into<String>, label: impl Into<String>, width: f32) -> Self {
        let key = key.into();
        let accessor = Accessor::property(key.clone());
        ColumnDescriptor::new(key, label, width, accessor)
    }

    pub fn with_sort_accessor(mut self, accessor: Accessor) -> Self {
        self.sort_accessor = Some(accessor);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(GridError::Config("column key must be non-empty".to_string()));
        }
        if !(self.width > 0.0) {
            return Err(GridError::Config(format!(
                "column '{}' width must be positive, got {}",
                self.key, self.width
            )));
        }
        Ok(())
    }
}

/// Validate a descriptor list: each descriptor well-formed, keys unique.
pub fn validate_columns(columns: &[ColumnDescriptor]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
    for column in columns {
        column.validate()?;
        if !seen.insert(column.key.as_str()) {
            return Err(GridError::Config(format!(
                "duplicate column key '{}'",
                column.key
            )));
        }
    }
    Ok(())
}

/// Sum of descriptor widths.
pub fn total_width(columns: &[ColumnDescriptor]) -> f32 {
    columns.iter().map(|c| c.width).sum()
}

/// Look up a descriptor by key.
pub fn find_column<'a>(columns: &'a [ColumnDescriptor], key: &str) -> Option<&'a ColumnDescriptor> {
    columns.iter().find(|c| c.key == key)
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
    fn test_property_accessor_resolves_named_field() {
        let row = json!({"name": "Ada", "age": 36});
        assert_eq!(
            Accessor::property("name").resolve(&row),
            CellValue::Text("Ada".to_string())
        );
        assert_eq!(Accessor::property("age").resolve(&row), CellValue::Number(36.0));
        assert_eq!(Accessor::property("missing").resolve(&row), CellValue::Empty);
    }

    #[test]
    fn test_computed_accessor() {
        let row = json!({"first": "Ada", "last": "Lovelace"});
        let full = Accessor::computed(|r| {
            let first = r.get("first").and_then(Value::as_str).unwrap_or("");
            let last = r.get("last").and_then(Value::as_str).unwrap_or("");
            CellValue::Text(format!("{first} {last}"))
        });
        assert_eq!(full.resolve(&row), CellValue::Text("Ada Lovelace".to_string()));
    }

    #[test]
    fn test_key_rule_accepts_numeric_keys() {
        let rule = KeyRule::property("id");
        assert_eq!(rule.resolve(&json!({"id": 7})), Some("7".to_string()));
        assert_eq!(rule.resolve(&json!({"id": "a"})), Some("a".to_string()));
        assert_eq!(rule.resolve(&json!({"id": null})), None);
        assert_eq!(rule.resolve(&json!({})), None);
    }

    #[test]
    fn test_validate_columns_rejects_duplicates() {
        let columns = vec![
            ColumnDescriptor::from_property("a", "A", 80.0),
            ColumnDescriptor::from_property("a", "A again", 80.0),
        ];
        assert!(matches!(
            validate_columns(&columns),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn test_validate_columns_rejects_bad_width() {
        let columns = vec![ColumnDescriptor::from_property("a", "A", 0.0)];
        assert!(validate_columns(&columns).is_err());
    }

    #[test]
    fn test_total_width() {
        let columns = vec![
            ColumnDescriptor::from_property("a", "A", 80.0),
            ColumnDescriptor::from_property("b", "B", 120.0),
        ];
        assert_eq!(total_width(&columns), 200.0);
    }
}
