use crate::types::TransactionKind;

/// Error types for Payflow core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required merchant credential was blank or missing.
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),

    /// Two distinct field keys normalize to the same wire key.
    #[error("Field key '{key}' collides with existing key '{existing}' on wire key '{wire_key}'")]
    KeyCollision {
        key: String,
        existing: String,
        wire_key: String,
    },

    /// A caller supplied field key cannot be framed on the wire.
    #[error("Invalid field key '{0}': only ASCII letters, digits and underscores are allowed")]
    InvalidFieldKey(String),

    /// Amounts must be zero or positive.
    #[error("Negative amount: {0}")]
    NegativeAmount(String),

    /// The amount could not be parsed as a decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The transaction kind only accepts a prior transaction reference.
    #[error("{0} requires a transaction reference")]
    ReferenceRequired(TransactionKind),

    /// The transaction kind needs either a card or a transaction reference.
    #[error("{0} requires a card or a transaction reference")]
    SubjectRequired(TransactionKind),

    /// A transaction option required by the transaction kind was not set.
    #[error("{kind} requires the '{option}' option")]
    MissingOption {
        kind: TransactionKind,
        option: &'static str,
    },

    /// A length-prefixed body could not be decoded.
    #[error("Malformed NVP body at byte {offset}: {reason}")]
    MalformedBody { offset: usize, reason: &'static str },
}

/// A specialized `Result` type for Payflow core operations.
pub type Result<T> = std::result::Result<T, Error>;
