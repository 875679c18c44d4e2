//! Structured error types for vgrid.
//!
//! Only configuration defects are errors. Routine absences (no row under a
//! pointer, a persisted sort entry naming a removed column) are `Option`s or
//! silently skipped where they occur.

/// All errors the grid core can report.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Invalid construction input (bad column descriptor, non-positive
    /// measured row height, ...).
    #[error("configuration: {0}")]
    Config(String),

    /// A header interaction referenced a key no column descriptor matches.
    /// This indicates a wiring defect, not a user action to be swallowed.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Two rows resolved to the same key under the configured key rule.
    #[error("duplicate row key: {0}")]
    DuplicateRowKey(String),

    /// A row yielded no key under the configured key rule.
    #[error("row {0} has no key")]
    MissingRowKey(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
