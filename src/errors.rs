use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccaError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("zero is not a valid secret key")]
    InvalidSecretKey,

    #[error("not a valid public key")]
    InvalidPublicKey,

    #[error("overflow in {0}")]
    Overflow(&'static str),

    #[error("no secret key available")]
    MissingSecretKey,

    #[error("degenerate collision: both sides use the same randomness")]
    DegenerateCollision,

    #[error("inputs are not a chameleon hash collision")]
    NotACollision,

    #[error("{0} does not verify")]
    VerificationFailed(&'static str),

    #[error("tokens are not extractable even though they both verify")]
    NonExtractable,

    #[error("cannot serialize chameleon hash")]
    Serialization,

    #[error("batch is empty")]
    EmptyBatch,

    #[error("decode error: {0}")]
    DecodeError(&'static str),
}
