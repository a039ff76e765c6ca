use core::fmt::{Display, Formatter, Result as FmtResult};
use serde_json::Value;

/// Maximum length of response bodies and error messages to log.
const ERROR_MSG_MAX_LENGTH: usize = 100;

/// Caller-supplied parameter rejected by the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationField {
    Address,
    /// Index in the supplied storage key list.
    StorageKey(usize),
    Block,
}

impl Display for ValidationField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Address => f.write_str("address"),
            Self::StorageKey(index) => write!(f, "storageKeys[{index}]"),
            Self::Block => f.write_str("block"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationReason {
    #[error("missing-prefix: expected a `0x` prefix")]
    MissingPrefix,
    #[error("empty")]
    Empty,
    #[error("invalid-length: expected {expected} hex digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid-length: expected at most {max} hex digits, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("invalid-character: `{0}`")]
    InvalidCharacter(char),
    #[error("negative")]
    Negative,
    #[error("unknown-tag: `{0}`")]
    UnknownTag(String),
    #[error("overflow: block number does not fit in 64 bits")]
    Overflow,
}

/// Malformed caller input, detected before anything is sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: ValidationField,
    pub reason: ValidationReason,
}

impl ValidationError {
    #[must_use]
    pub const fn new(field: ValidationField, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// The I/O layer failed before or during the exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The round trip did not complete before the deadline.
    #[error("timeout")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[error("http status {status}")]
    HttpStatus { status: u16, body: String },
    /// Connection, TLS or other I/O failure.
    #[error("{0}")]
    Io(String),
}

/// The node accepted the request but rejected it, `code` and `message` are reproduced verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rpc error {code}: {message}")]
pub struct ProtocolError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DecodeReason {
    #[error("invalid-json: {0}")]
    InvalidJson(String),
    #[error("missing")]
    Missing,
    #[error("expected-string")]
    ExpectedString,
    #[error("expected-integer")]
    ExpectedInteger,
    #[error("expected-array")]
    ExpectedArray,
    #[error("expected-object")]
    ExpectedObject,
    #[error("invalid-hex")]
    InvalidHex,
    #[error("invalid-length: expected {expected} bytes, got {actual} hex digits")]
    InvalidLength { expected: usize, actual: usize },
    #[error("overflow")]
    Overflow,
    #[error("unsupported-version")]
    UnsupportedVersion,
    #[error("id-mismatch")]
    IdMismatch,
    #[error("address-mismatch")]
    AddressMismatch,
    #[error("storage-proof-mismatch")]
    StorageProofMismatch,
}

/// The response was received but doesn't match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{reason}", field_prefix(.field))]
pub struct DecodeError {
    /// JSON path of the offending member, ex: `result.storageProof[0].value`.
    pub field: Option<String>,
    pub reason: DecodeReason,
}

impl DecodeError {
    pub fn new(field: impl Into<String>, reason: DecodeReason) -> Self {
        Self { field: Some(field.into()), reason }
    }

    #[must_use]
    pub const fn without_field(reason: DecodeReason) -> Self {
        Self { field: None, reason }
    }
}

fn field_prefix(field: &Option<String>) -> String {
    field.as_ref().map(|field| format!("{field}: ")).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl Error {
    /// Only transport failures may succeed when repeated unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Helper type that truncates the message to `ERROR_MSG_MAX_LENGTH` before logging.
pub struct SafeLogError<'a, T: ?Sized>(&'a T);

impl<T> Display for SafeLogError<'_, T>
where
    T: ToString + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let msg = <T as ToString>::to_string(self.0);
        let msg_str = msg.trim();
        if msg_str.chars().count() > ERROR_MSG_MAX_LENGTH {
            let msg = msg_str.chars().take(ERROR_MSG_MAX_LENGTH).collect::<String>();
            let msg_str = msg.trim_end();
            write!(f, "{msg_str}...")
        } else {
            write!(f, "{msg_str}")
        }
    }
}

pub trait LogErrorExt {
    fn truncate(&self) -> SafeLogError<'_, Self>;
}

impl LogErrorExt for str {
    fn truncate(&self) -> SafeLogError<'_, Self> {
        SafeLogError(self)
    }
}

impl LogErrorExt for DecodeError {
    fn truncate(&self) -> SafeLogError<'_, Self> {
        SafeLogError(self)
    }
}
