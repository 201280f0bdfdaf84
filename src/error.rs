use crate::digest::Digest;
use crate::kind::ObjectKind;

/// Failures raised while encoding, decoding, storing or loading objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("unknown object kind: {0:?}")]
    UnknownKind(String),

    /// The `"<kind> <len>\0"` prefix is missing a separator or has a non-numeric length.
    #[error("malformed object header: {0}")]
    MalformedHeader(&'static str),

    #[error("object declares {declared} payload bytes but carries {actual}")]
    MalformedLength { declared: usize, actual: usize },

    #[error("tree entry at offset {offset} is truncated")]
    TruncatedTreeEntry { offset: usize },

    #[error("invalid tree entry mode: {0:?}")]
    InvalidMode(String),

    #[error("tree entry path is not valid utf-8")]
    InvalidEntryPath(#[source] std::str::Utf8Error),

    #[error("header line is not of the form `key value`: {0:?}")]
    MalformedHeaderLine(String),

    #[error("{kind} is missing the `{key}` header")]
    MissingHeaderKey { kind: ObjectKind, key: &'static str },

    #[error("invalid digest in `{key}` header: {value:?}")]
    InvalidDigest { key: &'static str, value: String },

    #[error("object {digest} is corrupt: {reason}")]
    CorruptCompressedData { digest: Digest, reason: String },

    #[error("object {0} not found in database")]
    MissingObject(Digest),

    #[error("object {digest} is a {found}, expected a {expected}")]
    KindMismatch {
        digest: Digest,
        expected: ObjectKind,
        found: ObjectKind,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ObjectResult<T> = Result<T, ObjectError>;
