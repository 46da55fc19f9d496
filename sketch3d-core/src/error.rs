/// Error types shared across the core library
use std::fmt;

/// Failure of a math operation whose input has no meaningful result.
///
/// Inverting a singular matrix or normalizing a zero-length vector would
/// otherwise yield NaN silently; these cases are reported instead.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    SingularMatrix,
    ZeroLengthVector,
    DegenerateProjection { reason: &'static str },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::SingularMatrix => write!(f, "matrix is singular and has no inverse"),
            MathError::ZeroLengthVector => write!(f, "cannot normalize a zero-length vector"),
            MathError::DegenerateProjection { reason } => {
                write!(f, "degenerate projection: {}", reason)
            }
        }
    }
}

impl std::error::Error for MathError {}

/// Failure of an index-addressed scene operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    IndexOutOfRange { index: usize, len: usize },
    EmptyScene,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::IndexOutOfRange { index, len } => {
                write!(f, "shape index {} out of range for scene of {} shapes", index, len)
            }
            SceneError::EmptyScene => write!(f, "scene has no shapes to edit"),
        }
    }
}

impl std::error::Error for SceneError {}

/// A color string that is not `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color {:?}, expected #RRGGBB", self.input)
    }
}

impl std::error::Error for ColorParseError {}

/// Failure while resolving a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Math(MathError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Math(e) => write!(f, "failed to resolve frame transforms: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Math(e) => Some(e),
        }
    }
}

impl From<MathError> for RenderError {
    fn from(e: MathError) -> Self {
        RenderError::Math(e)
    }
}
