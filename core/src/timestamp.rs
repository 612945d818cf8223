//! Textual timestamp parsing.
//!
//! The format is chosen by the byte length of the input alone, and the
//! input is truncated to that format's width before parsing:
//!
//! | length | width | format |
//! |---|---|---|
//! | ≥ 25 | 25 | RFC 3339 with offset, e.g. `2006-01-02T15:04:05+07:00` |
//! | ≥ 19, contains `T` | 19 | `2006-01-02T15:04:05`, local zone |
//! | ≥ 19 | 19 | `2006-01-02 15:04:05`, local zone |
//! | ≥ 10 | 10 | `2006-01-02`, local midnight |
//! | ≥ 8 | 8 | `15:04:05` on `0000-01-01`, local zone |
//!
//! Once a width is chosen there is no fallback to a shorter format. Inputs
//! shorter than eight bytes match nothing and are ignored.
//!
//! The truncated text must match its layout byte for byte before it is
//! handed to chrono: every digit position holds an ASCII digit and every
//! separator is exactly `-`, `:`, `T` or a space. chrono alone would accept
//! space-padded fields and a lowercase `t`.
//!
//! Values without an offset are interpreted in the process's local time
//! zone, so the resulting instant depends on the environment.

use crate::error::ParseFailure;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

const RFC3339_WIDTH: usize = 25;
const DATE_TIME_WIDTH: usize = 19;
const DATE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 8;

const DATE_TIME_T_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// Letters are digit positions, `+` is an offset sign.
const RFC3339_LAYOUT: &str = "YYYY-MM-DDThh:mm:ss+hh:mm";
const DATE_TIME_T_LAYOUT: &str = "YYYY-MM-DDThh:mm:ss";
const DATE_TIME_LAYOUT: &str = "YYYY-MM-DD hh:mm:ss";
const DATE_LAYOUT: &str = "YYYY-MM-DD";
const TIME_LAYOUT: &str = "hh:mm:ss";

// Time-only values land on the first day of year zero.
const TIME_ONLY_PREFIX: &str = "0000-01-01 ";

/// Parse `raw` according to the length-classified format table.
///
/// Returns `Ok(None)` when the input is too short to match any format.
///
/// # Errors
///
/// Returns a [`ParseFailure`] when the format chosen for the input's length
/// does not parse the truncated text, when truncation would split a
/// character, or when the wall-clock time does not exist locally.
///
/// # Examples
///
/// ```
/// use magic_decoder_core::timestamp::parse_timestamp;
///
/// let parsed = parse_timestamp("2023-05-01T10:20:30+02:00").unwrap().unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2023-05-01T10:20:30+02:00");
///
/// assert!(parse_timestamp("10:20").unwrap().is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Result<Option<DateTime<FixedOffset>>, ParseFailure> {
    let len = raw.len();

    if len >= RFC3339_WIDTH {
        let text = truncate(raw, RFC3339_WIDTH)?;
        check_layout(text, RFC3339_LAYOUT)?;
        return Ok(Some(DateTime::parse_from_rfc3339(text)?));
    }

    if len >= DATE_TIME_WIDTH {
        let (format, layout) = if raw.contains('T') {
            (DATE_TIME_T_FORMAT, DATE_TIME_T_LAYOUT)
        } else {
            (DATE_TIME_FORMAT, DATE_TIME_LAYOUT)
        };
        let text = truncate(raw, DATE_TIME_WIDTH)?;
        check_layout(text, layout)?;
        let naive = NaiveDateTime::parse_from_str(text, format)?;
        return in_local_zone(naive).map(Some);
    }

    if len >= DATE_WIDTH {
        let text = truncate(raw, DATE_WIDTH)?;
        check_layout(text, DATE_LAYOUT)?;
        let date = NaiveDate::parse_from_str(text, DATE_FORMAT)?;
        return in_local_zone(date.and_time(chrono::NaiveTime::MIN)).map(Some);
    }

    if len >= TIME_WIDTH {
        let text = truncate(raw, TIME_WIDTH)?;
        check_layout(text, TIME_LAYOUT)?;
        let naive =
            NaiveDateTime::parse_from_str(&format!("{TIME_ONLY_PREFIX}{text}"), DATE_TIME_FORMAT)?;
        return in_local_zone(naive).map(Some);
    }

    Ok(None)
}

fn truncate(raw: &str, width: usize) -> Result<&str, ParseFailure> {
    raw.get(..width).ok_or(ParseFailure::CharBoundary(width))
}

fn check_layout(text: &str, layout: &'static str) -> Result<(), ParseFailure> {
    let matches = text.len() == layout.len()
        && text.bytes().zip(layout.bytes()).all(|(byte, slot)| match slot {
            b'+' => byte == b'+' || byte == b'-',
            slot if slot.is_ascii_alphabetic() && slot != b'T' => byte.is_ascii_digit(),
            literal => byte == literal,
        });

    if matches {
        Ok(())
    } else {
        Err(ParseFailure::Layout(layout))
    }
}

fn in_local_zone(naive: NaiveDateTime) -> Result<DateTime<FixedOffset>, ParseFailure> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
        .ok_or(ParseFailure::NonexistentLocalTime(naive))
}
