pub mod angle;
pub mod context;
pub mod convert;
pub mod vector;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
    #[error("Dimension Mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("Degenerate Vector: {0}")]
    DegenerateVector(String),
    #[error("Overflow in {operation}")]
    Overflow { operation: &'static str },
    #[error("Invalid Config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VectorError>;

// Re-export main types for convenience
pub use angle::DEFAULT_ZERO_TOLERANCE;
pub use context::DecimalContext;
pub use convert::{to_decimal, ToDecimal};
pub use rust_decimal::Decimal;
pub use vector::Vector;
