// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Morpheus Kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorpheusError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("shape mismatch in {op}: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Backing storage length does not match the declared shape.
    #[error("matrix data length {len} does not match shape {rows}x{cols}")]
    DataLength { rows: usize, cols: usize, len: usize },

    /// An ensemble sample carries the wrong number of features.
    #[error("sample {index} has {got} values, expected {expected}")]
    SampleLength {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Linear dependence or another degenerate numeric input.
    #[error("degenerate input: {0}")]
    Degenerate(String),

    /// Invalid input (node index, embedding payload, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type MorpheusResult<T> = Result<T, MorpheusError>;

impl MorpheusError {
    pub fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            op,
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }
}
