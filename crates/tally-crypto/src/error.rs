use thiserror::Error;

/// Errors from canonical encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A NaN or infinite number reached the encoder. Non-finite values have
    /// no canonical byte form and must never feed a hash.
    #[error("non-finite number cannot be canonically encoded")]
    NonFiniteNumber,

    /// The value could not be serialized into an encodable structure.
    #[error("serialization error: {0}")]
    Serialization(String),
}
