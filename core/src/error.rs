//! Error types for field binding.
//!
//! Every failure surfaced by the engine is a [`DecodeError`]. Values that are
//! deliberately ignored (unsupported field types, unknown boolean words,
//! timestamps too short to classify) never produce an error.

use crate::field::FieldKind;
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use thiserror::Error;

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors produced while populating a record.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The destination record was missing.
    ///
    /// This is a usage error rather than a data error: callers must always
    /// provide a mutable record to bind into.
    #[error("decode target must be a mutable record, got {0}")]
    InvalidTarget(&'static str),

    /// A raw value did not match the grammar of its field's type.
    #[error("field `{field}` (key `{key}`): cannot parse {value:?} as {kind}: {source}")]
    Parse {
        /// Rust name of the field being bound.
        field: &'static str,
        /// Key the value was looked up under.
        key: String,
        /// Raw text that failed to parse.
        value: String,
        /// Declared kind of the field.
        kind: FieldKind,
        /// Underlying parse failure.
        #[source]
        source: ParseFailure,
    },

    /// The request carried no body where one was required.
    #[error("empty request body")]
    EmptyBody,

    /// The request body was not a JSON object.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// A JSON body member could not be decoded into its field.
    #[error("body field `{key}`: {source}")]
    BodyField {
        /// JSON member name.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Returns true if the error was caused by the request data rather than
    /// by the caller's use of the API.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvalidTarget(_))
    }
}

/// Reason a single raw value failed to coerce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Not a base-10 integer.
    #[error(transparent)]
    Int(#[from] ParseIntError),

    /// Not a decimal number.
    #[error(transparent)]
    Float(#[from] ParseFloatError),

    /// A valid integer that does not fit the field's width.
    #[error(transparent)]
    Range(#[from] TryFromIntError),

    /// Text did not match the timestamp format chosen for its length.
    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),

    /// A wall-clock time that does not exist in the local time zone.
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(chrono::NaiveDateTime),

    /// Text did not have the shape of the timestamp layout chosen for its
    /// length. Letters in the layout stand for ASCII digits and `+` for an
    /// offset sign.
    #[error("expected timestamp layout {0}")]
    Layout(&'static str),

    /// An unsigned value was written with a sign.
    #[error("unsigned value cannot carry a sign")]
    Signed,

    /// Truncating the text would split a multi-byte character.
    #[error("cannot truncate to {0} bytes on a character boundary")]
    CharBoundary(usize),
}
