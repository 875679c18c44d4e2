//! Shared data model: cell values, column descriptors, sort orders.

pub mod column;
pub mod sort;
pub mod value;

pub use column::{
    find_column, total_width, validate_columns, Accessor, ColumnDescriptor, KeyRule, RowKey,
};
pub use sort::{Direction, FieldSortOrder, SortOrder};
pub use value::CellValue;
