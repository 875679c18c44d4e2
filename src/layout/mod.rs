//! Window geometry for the virtual scroller.

pub mod viewport;

pub use viewport::{ViewportInput, ViewportState};
