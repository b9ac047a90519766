use thiserror::Error;

/// Errors returned by network construction, training, inference and persistence.
#[derive(Debug, Error)]
pub enum Error {
    /// Two operands that must agree in length (or a matrix and a vector) do not.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A backward pass was requested before the matching forward pass filled the cache.
    #[error("{0} requires a preceding forward pass")]
    MissingForwardPass(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    #[inline]
    pub(crate) fn dims(context: &'static str, expected: usize, actual: usize) -> Self {
        Error::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Returns a dimension-mismatch error unless `expected == actual`.
#[inline]
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::dims(context, expected, actual));
    }
    Ok(())
}
