use std::fmt;

/// Errors that can occur when indexing or relating a polygon collection.
#[derive(Debug, Clone, PartialEq)]
pub enum GeographError {
    /// The polygon at this index is empty and has no bounding box.
    EmptyGeometry(usize),
    /// A tolerance or distance argument was negative or not finite.
    InvalidTolerance(f64),
}

impl fmt::Display for GeographError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGeometry(idx) => write!(f, "polygon {idx} is empty (no bounding box)"),
            Self::InvalidTolerance(tol) => write!(f, "tolerance must be finite and non-negative, got {tol}"),
        }
    }
}

impl std::error::Error for GeographError {}
