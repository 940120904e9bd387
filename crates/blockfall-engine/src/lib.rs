pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must have at least one row")]
    NoRows,
    #[display("board must have at least one column")]
    NoColumns,
    #[display("at least one block color is required")]
    NoColors,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape must have at least one row and one column")]
    Empty,
    #[display("shape rows must all have the same length")]
    Ragged,
    #[display("shape exceeds 4x4 cells")]
    TooLarge,
}
