use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every failure the import pipeline and the profile store can report.  Parsing and reference
/// resolution errors are raised before any parameter or geometry is produced, so a caller never
/// has to clean up a partial import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The profile text contained no coordinate lines, or a stored row had the wrong shape
    MalformedProfile(String),

    /// The two sides of a profile have different point counts, or (in strict mode) the count
    /// does not match the expected spline degree
    DegreeMismatch {
        upper: usize,
        lower: usize,
        expected: usize,
    },

    /// Zero length, parallel or otherwise unusable reference geometry
    DegenerateReference(String),

    /// The parameter suffix is empty or contains non-alphabetic characters
    InvalidSuffix(String),

    /// The parameter suffix would produce names which already exist in the design
    DuplicateSuffix(String),

    /// An expression references a parameter which is not known to the parameter set
    UnknownParameter(String),

    /// A lookup by airfoil name found nothing
    StoreNotFound(String),

    /// The store file could not be read, written or decoded
    StoreIo(String),

    /// The configuration file could not be decoded
    Config(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::MalformedProfile(detail) => write!(f, "malformed profile: {}", detail),
            ImportError::DegreeMismatch {
                upper,
                lower,
                expected,
            } => write!(
                f,
                "spline degree mismatch: upper side has {} points, lower side has {} points, \
                 expected {}",
                upper, lower, expected
            ),
            ImportError::DegenerateReference(detail) => {
                write!(f, "degenerate reference geometry: {}", detail)
            }
            ImportError::InvalidSuffix(s) => {
                write!(f, "suffix '{}' must be non-empty and contain only letters", s)
            }
            ImportError::DuplicateSuffix(s) => {
                write!(f, "suffix '{}' is already used in this design", s)
            }
            ImportError::UnknownParameter(name) => write!(f, "unknown parameter '{}'", name),
            ImportError::StoreNotFound(name) => write!(f, "airfoil '{}' not found in store", name),
            ImportError::StoreIo(detail) => write!(f, "profile store error: {}", detail),
            ImportError::Config(detail) => write!(f, "configuration error: {}", detail),
        }
    }
}

impl Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::StoreIo(e.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::StoreIo(e.to_string())
    }
}

impl From<toml::de::Error> for ImportError {
    fn from(e: toml::de::Error) -> Self {
        ImportError::Config(e.to_string())
    }
}
