/// Colors, placement and canvas geometry.
pub mod core;
/// CSS color parsing.
pub mod color;
/// Crate-wide error type.
pub mod error;
