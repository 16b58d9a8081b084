use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, SoftmaxErr>;

/// Everything that can go wrong while building inputs or computing the loss.
#[derive(Debug)]
pub enum SoftmaxErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },
    EmptyBatch,
    InvalidRegularization(f64),
    EmptyMatrix,
    RaggedRows {
        row: usize,
        got: usize,
        expected: usize,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for SoftmaxErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftmaxErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "size mismatch between {a} and {b}: got {got}, expected {expected}"
            ),
            SoftmaxErr::LabelOutOfRange {
                index,
                label,
                classes,
            } => write!(
                f,
                "label {label} at position {index} is out of range for {classes} classes"
            ),
            SoftmaxErr::EmptyBatch => write!(f, "the batch holds no examples"),
            SoftmaxErr::InvalidRegularization(reg) => {
                write!(f, "regularization strength must be finite and >= 0, got {reg}")
            }
            SoftmaxErr::EmptyMatrix => write!(f, "a matrix needs at least one row and one column"),
            SoftmaxErr::RaggedRows { row, got, expected } => {
                write!(f, "row {row} has {got} columns, expected {expected}")
            }
            SoftmaxErr::Io(e) => write!(f, "io error: {e}"),
            SoftmaxErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for SoftmaxErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SoftmaxErr::Io(e) => Some(e),
            SoftmaxErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SoftmaxErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SoftmaxErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
