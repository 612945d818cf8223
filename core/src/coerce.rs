//! Type-directed coercion of raw text into a field slot.

use crate::error::ParseFailure;
use crate::field::FieldSlot;
use crate::timestamp::parse_timestamp;

/// Separator between list elements. There is no escaping.
pub const LIST_SEPARATOR: char = ',';

const TRUTHY: [&str; 4] = ["on", "1", "yes", "true"];
const FALSY: [&str; 4] = ["off", "0", "no", "false"];

/// What a coercion did to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The field was written.
    Assigned,
    /// The value was recognised as not applicable and the field left alone.
    Ignored,
}

/// Interpret a boolean word, case-insensitively.
///
/// Returns `None` for anything outside the vocabulary.
///
/// # Examples
///
/// ```
/// use magic_decoder_core::coerce::parse_bool;
///
/// assert_eq!(parse_bool("YES"), Some(true));
/// assert_eq!(parse_bool("Off"), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    if TRUTHY.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(true)
    } else if FALSY.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(false)
    } else {
        None
    }
}

/// Coerce `raw` into `slot` according to the slot's kind.
///
/// # Errors
///
/// Returns a [`ParseFailure`] when `raw` is not valid for a numeric,
/// timestamp or integer-list slot. Boolean, string, string-list and
/// unsupported slots never fail.
pub fn assign(slot: FieldSlot<'_>, raw: &str) -> Result<Outcome, ParseFailure> {
    match slot {
        FieldSlot::Bool(field) => Ok(parse_bool(raw).map_or(Outcome::Ignored, |value| {
            *field = value;
            Outcome::Assigned
        })),
        FieldSlot::Int(field) => {
            field.set_i64(raw.parse()?)?;
            Ok(Outcome::Assigned)
        }
        FieldSlot::Uint(field) => {
            // `u64::from_str` tolerates a leading `+`.
            if raw.starts_with('+') {
                return Err(ParseFailure::Signed);
            }
            field.set_u64(raw.parse()?)?;
            Ok(Outcome::Assigned)
        }
        FieldSlot::Float(field) => {
            field.set_f64(raw.parse()?);
            Ok(Outcome::Assigned)
        }
        FieldSlot::String(field) => {
            raw.clone_into(field);
            Ok(Outcome::Assigned)
        }
        FieldSlot::Timestamp(field) => Ok(parse_timestamp(raw)?.map_or(Outcome::Ignored, |value| {
            field.set_timestamp(value);
            Outcome::Assigned
        })),
        FieldSlot::IntList(field) => {
            let values = raw
                .split(LIST_SEPARATOR)
                .map(str::parse::<i64>)
                .collect::<Result<Vec<_>, _>>()?;
            field.replace_all(&values)?;
            Ok(Outcome::Assigned)
        }
        FieldSlot::StringList(field) => {
            *field = raw.split(LIST_SEPARATOR).map(str::to_owned).collect();
            Ok(Outcome::Assigned)
        }
        FieldSlot::Unsupported => Ok(Outcome::Ignored),
    }
}
