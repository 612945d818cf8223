//! JSON body decoding.
//!
//! The body is decoded as a JSON object whose members are then assigned
//! field by field, so a body only overwrites the fields it mentions. This
//! keeps values bound from the path or the query string when the body is
//! applied after them.

use crate::bind::Bind;
use crate::error::{DecodeError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A decoded JSON object.
pub type JsonObject = serde_json::Map<String, Value>;

/// Decode `body` as a JSON object and merge it into `target`.
///
/// # Errors
///
/// - [`DecodeError::EmptyBody`] when `body` is empty.
/// - [`DecodeError::MalformedBody`] when `body` is neither a JSON object nor
///   `null`. A `null` body leaves `target` unchanged.
/// - [`DecodeError::BodyField`] when a member does not fit its field.
pub fn merge_body(body: &[u8], target: &mut dyn Bind) -> Result<()> {
    if body.is_empty() {
        return Err(DecodeError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body).map_err(DecodeError::MalformedBody)?;
    match value {
        Value::Null => Ok(()),
        Value::Object(object) => target.merge_json(&object),
        other => serde_json::from_value::<JsonObject>(other)
            .map_err(DecodeError::MalformedBody)
            .and_then(|object| target.merge_json(&object)),
    }
}

/// Decode one JSON member into a field value.
///
/// A JSON string that holds an encoded scalar, such as `"12.34"` or
/// `"true"`, is accepted where the field expects that scalar.
///
/// # Errors
///
/// Returns [`DecodeError::BodyField`] carrying the direct decoding error
/// when neither the member nor the text of a string member decodes.
pub fn decode_field<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
    match T::deserialize(value) {
        Ok(decoded) => Ok(decoded),
        Err(source) => match value {
            Value::String(text) => serde_json::from_str(text).map_err(|_| DecodeError::BodyField {
                key: key.to_owned(),
                source,
            }),
            _ => Err(DecodeError::BodyField {
                key: key.to_owned(),
                source,
            }),
        },
    }
}
