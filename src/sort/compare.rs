//! Value resolution and total-order comparison.
//!
//! Text compares locale-aware at base sensitivity: case and common Latin
//! diacritics do not break ties before content does. Values of different
//! kinds fall back to a fixed rank order (`Empty < Bool < Number < Text`),
//! which replaces the host-language looseness of comparing mixed types with
//! relational operators.

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::{CellValue, ColumnDescriptor};

/// Resolve a row's value for a column. The sort path prefers the distinct
/// sort accessor when one exists and keeps the raw result; only the display
/// path substitutes empty text for missing values (via `CellValue::display`).
pub fn resolve_value(row: &Value, column: &ColumnDescriptor, for_sorting: bool) -> CellValue {
    if for_sorting {
        if let Some(accessor) = &column.sort_accessor {
            return accessor.resolve(row);
        }
    }
    column.accessor.resolve(row)
}

/// Total order over resolved values.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Text(a), CellValue::Text(b)) => compare_base(a, b),
        (CellValue::Number(a), CellValue::Number(b)) => compare_f64(*a, *b),
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Empty => 0,
        CellValue::Bool(_) => 1,
        CellValue::Number(_) => 2,
        CellValue::Text(_) => 3,
    }
}

/// NaN sorts after every real number so the order stays total.
fn compare_f64(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/// Base-sensitivity string comparison: case-insensitive, accent-insensitive.
pub fn compare_base(a: &str, b: &str) -> Ordering {
    let mut chars_a = a.chars().flat_map(fold_char);
    let mut chars_b = b.chars().flat_map(fold_char);
    loop {
        match (chars_a.next(), chars_b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => match ca.cmp(&cb) {
                Ordering::Equal => {}
                ordering => return ordering,
            },
        }
    }
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(strip_diacritic)
}

/// Fold Latin-1 Supplement and Latin Extended-A letters onto their base
/// character. Input is already lowercased.
fn strip_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
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
    use crate::types::Accessor;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("Apple", "apple" => Ordering::Equal ; "case folds")]
    #[test_case("Apple", "Banana" => Ordering::Less)]
    #[test_case("résumé", "resume" => Ordering::Equal ; "accents fold")]
    #[test_case("Zoë", "zoe" => Ordering::Equal)]
    #[test_case("a", "ab" => Ordering::Less ; "prefix orders first")]
    #[test_case("", "" => Ordering::Equal)]
    fn base_comparison(a: &str, b: &str) -> Ordering {
        compare_base(a, b)
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            compare_values(&CellValue::Number(2.0), &CellValue::Number(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_nan_sorts_last_among_numbers() {
        assert_eq!(
            compare_values(&CellValue::Number(f64::NAN), &CellValue::Number(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&CellValue::Number(f64::NAN), &CellValue::Number(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_cross_kind_rank_order() {
        let empty = CellValue::Empty;
        let boolean = CellValue::Bool(true);
        let number = CellValue::Number(0.0);
        let text = CellValue::Text("0".to_string());
        assert_eq!(compare_values(&empty, &boolean), Ordering::Less);
        assert_eq!(compare_values(&boolean, &number), Ordering::Less);
        assert_eq!(compare_values(&number, &text), Ordering::Less);
    }

    #[test]
    fn test_resolve_value_prefers_sort_accessor_when_sorting() {
        let row = json!({"name": "Grace", "sortName": "hopper"});
        let column = ColumnDescriptor::from_property("name", "Name", 100.0)
            .with_sort_accessor(Accessor::property("sortName"));
        assert_eq!(
            resolve_value(&row, &column, true),
            CellValue::Text("hopper".to_string())
        );
        assert_eq!(
            resolve_value(&row, &column, false),
            CellValue::Text("Grace".to_string())
        );
    }

    #[test]
    fn test_resolve_value_keeps_raw_empty_on_sort_path() {
        let row = json!({"name": null});
        let column = ColumnDescriptor::from_property("name", "Name", 100.0);
        let sorted = resolve_value(&row, &column, true);
        assert!(sorted.is_empty());
        // display path substitutes empty text
        assert_eq!(resolve_value(&row, &column, false).display(), "");
    }
}
