//! Field metadata and typed assignment slots.
//!
//! A record that implements [`Bind`](crate::Bind) exposes two views of itself:
//!
//! - a static table of [`FieldDescriptor`]s (name, declared kind, tags), and
//! - a mutable [`FieldSlot`] per field, through which the engine assigns
//!   coerced values.
//!
//! Both are normally generated by `#[derive(Bind)]`.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use std::fmt;
use std::num::TryFromIntError;

/// Tag value that explicitly opts a field out of a namespace.
pub const SKIP_TAG: &str = "-";

/// Declared semantic type of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// `i8` through `i64` and `isize`
    Int,
    /// `u8` through `u64` and `usize`
    Uint,
    /// `f32` and `f64`
    Float,
    /// `String`
    String,
    /// `chrono` date-time values
    Timestamp,
    /// `Vec` of signed integers
    IntList,
    /// `Vec<String>`
    StringList,
    /// Anything else; never assigned.
    Unsupported,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Uint => "unsigned integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::IntList => "integer list",
            Self::StringList => "string list",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Static description of one field of a bindable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Declared kind, used to pick the coercion.
    pub kind: FieldKind,
    /// `(namespace, tag value)` pairs in declaration order.
    pub tags: &'static [(&'static str, &'static str)],
    /// Embedded sub-record; never traversed.
    pub embedded: bool,
}

impl FieldDescriptor {
    /// Returns the binding key of this field for `namespace`.
    ///
    /// Only the text before the first `,` counts, so `"id,omitempty"` binds
    /// key `id`. Returns `None` when the field has no tag for the namespace,
    /// the key is empty, or the key is the [`SKIP_TAG`] sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use magic_decoder_core::field::{FieldDescriptor, FieldKind};
    ///
    /// let field = FieldDescriptor {
    ///     name: "team_id",
    ///     kind: FieldKind::Int,
    ///     tags: &[("path", "team,omitempty"), ("form", "-")],
    ///     embedded: false,
    /// };
    ///
    /// assert_eq!(field.key("path"), Some("team"));
    /// assert_eq!(field.key("form"), None);
    /// assert_eq!(field.key("json"), None);
    /// ```
    #[must_use]
    pub fn key(&self, namespace: &str) -> Option<&'static str> {
        let (_, tag) = self.tags.iter().find(|(ns, _)| *ns == namespace)?;
        let key = tag.split(',').next().unwrap_or_default();
        if key.is_empty() || key == SKIP_TAG {
            return None;
        }
        Some(key)
    }
}

/// Mutable handle to one field, typed by its [`FieldKind`].
///
/// Numeric and timestamp variants erase the concrete width or time zone
/// behind a small trait so one coercion serves every supported type.
pub enum FieldSlot<'a> {
    /// A boolean field.
    Bool(&'a mut bool),
    /// A signed integer field of any width.
    Int(&'a mut dyn SignedField),
    /// An unsigned integer field of any width.
    Uint(&'a mut dyn UnsignedField),
    /// A floating point field.
    Float(&'a mut dyn FloatField),
    /// A string field.
    String(&'a mut String),
    /// A date-time field.
    Timestamp(&'a mut dyn TimestampField),
    /// A list of signed integers.
    IntList(&'a mut dyn IntListField),
    /// A list of strings.
    StringList(&'a mut Vec<String>),
    /// A field the engine never writes.
    Unsupported,
}

impl FieldSlot<'_> {
    /// Kind of value this slot accepts.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int,
            Self::Uint(_) => FieldKind::Uint,
            Self::Float(_) => FieldKind::Float,
            Self::String(_) => FieldKind::String,
            Self::Timestamp(_) => FieldKind::Timestamp,
            Self::IntList(_) => FieldKind::IntList,
            Self::StringList(_) => FieldKind::StringList,
            Self::Unsupported => FieldKind::Unsupported,
        }
    }
}

/// Signed integer storage.
pub trait SignedField {
    /// Store `value`, narrowing to the field's width.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not fit.
    fn set_i64(&mut self, value: i64) -> Result<(), TryFromIntError>;
}

/// Unsigned integer storage.
pub trait UnsignedField {
    /// Store `value`, narrowing to the field's width.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not fit.
    fn set_u64(&mut self, value: u64) -> Result<(), TryFromIntError>;
}

/// Floating point storage.
pub trait FloatField {
    /// Store `value`, rounding to the field's precision.
    fn set_f64(&mut self, value: f64);
}

/// Date-time storage.
pub trait TimestampField {
    /// Store the parsed instant, converted into the field's representation.
    fn set_timestamp(&mut self, value: DateTime<FixedOffset>);
}

/// Signed integer list storage.
pub trait IntListField {
    /// Replace the whole list.
    ///
    /// The list is only written if every element fits the element width.
    ///
    /// # Errors
    ///
    /// Returns an error on the first element that does not fit; the list is
    /// left unchanged.
    fn replace_all(&mut self, values: &[i64]) -> Result<(), TryFromIntError>;
}

macro_rules! signed_fields {
    ($($ty:ty),*) => {$(
        impl SignedField for $ty {
            fn set_i64(&mut self, value: i64) -> Result<(), TryFromIntError> {
                *self = <$ty>::try_from(value)?;
                Ok(())
            }
        }

        impl IntListField for Vec<$ty> {
            fn replace_all(&mut self, values: &[i64]) -> Result<(), TryFromIntError> {
                let narrowed = values
                    .iter()
                    .map(|value| <$ty>::try_from(*value))
                    .collect::<Result<Vec<_>, _>>()?;
                *self = narrowed;
                Ok(())
            }
        }
    )*};
}

macro_rules! unsigned_fields {
    ($($ty:ty),*) => {$(
        impl UnsignedField for $ty {
            fn set_u64(&mut self, value: u64) -> Result<(), TryFromIntError> {
                *self = <$ty>::try_from(value)?;
                Ok(())
            }
        }
    )*};
}

signed_fields!(i8, i16, i32, i64, isize);
unsigned_fields!(u8, u16, u32, u64, usize);

impl FloatField for f64 {
    fn set_f64(&mut self, value: f64) {
        *self = value;
    }
}

impl FloatField for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn set_f64(&mut self, value: f64) {
        *self = value as f32;
    }
}

impl TimestampField for DateTime<FixedOffset> {
    fn set_timestamp(&mut self, value: DateTime<FixedOffset>) {
        *self = value;
    }
}

impl TimestampField for DateTime<Local> {
    fn set_timestamp(&mut self, value: DateTime<FixedOffset>) {
        *self = value.with_timezone(&Local);
    }
}

impl TimestampField for DateTime<Utc> {
    fn set_timestamp(&mut self, value: DateTime<FixedOffset>) {
        *self = value.with_timezone(&Utc);
    }
}

impl TimestampField for NaiveDateTime {
    fn set_timestamp(&mut self, value: DateTime<FixedOffset>) {
        *self = value.with_timezone(&Local).naive_local();
    }
}
