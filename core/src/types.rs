//! types.rs
//! Error taxonomy shared by every operation.
//!
//! - Four kinds only: argument, codec, unsupported, allocation.
//! - Raised synchronously to the immediate caller, never retried or downgraded.
//! - Messages are stable and descriptive so host bindings can pass them through.

use std::fmt;

use crate::constants::content_size;

/// Fieldless classification, used by host bindings to pick an exception type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Codec,
    Unsupported,
    Allocation,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Argument,
        ErrorKind::Codec,
        ErrorKind::Unsupported,
        ErrorKind::Allocation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Argument    => "ArgumentError",
            ErrorKind::Codec       => "CodecError",
            ErrorKind::Unsupported => "UnsupportedError",
            ErrorKind::Allocation  => "AllocationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unified error for the four public operations.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Wrong arity, wrong argument type, or failed structural precondition.
    /// Always detected before the codec is touched.
    #[error("argument error: {0}")]
    Argument(String),

    /// The codec reported a failure. `code` is the codec's numeric status when it has one.
    #[error("codec error: {reason}{}", fmt_code(.code))]
    Codec { code: Option<u64>, reason: String },

    /// Valid request outside the supported scope.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Destination buffer could not be reserved.
    #[error("allocation error: {0}")]
    Allocation(String),
}

fn fmt_code(code: &Option<u64>) -> String {
    match *code {
        Some(content_size::UNKNOWN) => " (content size unknown)".to_string(),
        Some(content_size::ERROR)   => " (content size error)".to_string(),
        Some(c)                     => format!(" (code {})", c),
        None                        => String::new(),
    }
}

impl BindError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindError::Argument(_)       => ErrorKind::Argument,
            BindError::Codec { .. }      => ErrorKind::Codec,
            BindError::Unsupported(_)    => ErrorKind::Unsupported,
            BindError::Allocation(_)     => ErrorKind::Allocation,
        }
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        BindError::Argument(msg.into())
    }

    /// Codec failure carrying the codec's own error code and name.
    pub fn codec_status(code: usize, context: &str) -> Self {
        BindError::Codec {
            code: Some(code as u64),
            reason: format!("{}: {}", context, zstd_safe::get_error_name(code)),
        }
    }

    /// Codec failure without a numeric status (e.g. a null dictionary).
    pub fn codec(reason: impl Into<String>) -> Self {
        BindError::Codec { code: None, reason: reason.into() }
    }

    /// Numeric status carried by a codec error, if any.
    pub fn code(&self) -> Option<u64> {
        match self {
            BindError::Codec { code, .. } => *code,
            _ => None,
        }
    }
}

pub type BindResult<T> = Result<T, BindError>;
