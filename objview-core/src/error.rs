//! Error types for objview-core

use thiserror::Error;

/// Errors raised by the vector and matrix types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// Scalar division by a value within tolerance of zero.
    #[error("division by zero (divisor {divisor})")]
    DivisionByZero { divisor: f64 },

    /// Normalizing a vector whose length is within tolerance of zero.
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    /// Constructing a matrix from rows of the wrong shape.
    #[error("matrix must be {expected}x{expected}, got {rows} rows with a row of length {cols}")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}

/// Errors raised when building or validating a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("polygon must have at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A polygon carries some, but not all, per-vertex attributes.
    #[error("polygon has {attribute} indices for {actual} of {expected} vertices")]
    PartialAttributes {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("polygon {polygon} references {attribute} index {index} (model has {len})")]
    IndexOutOfBounds {
        polygon: usize,
        attribute: &'static str,
        index: usize,
        len: usize,
    },
}

/// Errors raised by the OBJ reader and writer.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("error parsing OBJ file on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("error parsing OBJ file: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ObjError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Line the error was detected on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias for algebra operations
pub type MathResult<T> = std::result::Result<T, MathError>;

/// Result type alias for model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Result type alias for OBJ I/O
pub type ObjResult<T> = std::result::Result<T, ObjError>;
