/// Errors from parsing or constructing foundation types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes had the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A sealed scalar was malformed or carried the wrong prefix.
    #[error("invalid sealed scalar: {0}")]
    InvalidSealed(String),

    /// An unknown category tag was encountered.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
