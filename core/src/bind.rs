//! The [`Bind`] trait implemented by every decodable record.

use crate::error::Result;
use crate::field::{FieldDescriptor, FieldSlot};
use crate::json::JsonObject;
use crate::populate::{bind_values, RawValues};

/// A request aspect a record can be populated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Query-string parameters, bound through the `form` namespace.
    Query,
    /// Matched route variables, bound through the `path` namespace.
    Path,
    /// A JSON request body, bound through `json` tags.
    Body,
}

/// Sources used by records that do not configure their own.
pub const DEFAULT_SOURCES: &[Source] = &[Source::Query, Source::Path, Source::Body];

/// A record whose fields can be populated from tagged string values.
///
/// Implementations are normally generated with `#[derive(Bind)]`, which
/// builds the descriptor table and slot accessors at compile time. The
/// trait is object safe, so the engine and the extractors work on
/// `&mut dyn Bind`.
///
/// # Example
///
/// ```ignore
/// use magic_decoder_macros::Bind;
///
/// #[derive(Bind, Default)]
/// struct Item {
///     #[bind(path = "id")]
///     id: i64,
///     #[bind(form = "name")]
///     name: String,
///     #[bind(json = "money")]
///     money: f64,
/// }
/// ```
pub trait Bind {
    /// Static description of every field, in declaration order.
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Mutable slot for the field at `index` in [`Bind::descriptors`].
    ///
    /// Out of range indices yield [`FieldSlot::Unsupported`].
    fn slot(&mut self, index: usize) -> FieldSlot<'_>;

    /// Decode the members of a JSON object into the fields tagged `json`.
    ///
    /// Members without a matching field are ignored, and fields without a
    /// matching member keep their current value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BodyField`](crate::DecodeError::BodyField) when
    /// a member cannot be decoded into its field's type.
    fn merge_json(&mut self, object: &JsonObject) -> Result<()>;

    /// Name of the record type, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Request aspects this record is decoded from, in order.
    fn sources() -> &'static [Source]
    where
        Self: Sized,
    {
        DEFAULT_SOURCES
    }

    /// Populate this record from `values` under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Parse`](crate::DecodeError::Parse) on the first
    /// value that does not match its field's type.
    fn bind_from(&mut self, namespace: &str, values: &RawValues) -> Result<()>
    where
        Self: Sized,
    {
        bind_values(namespace, values, self)
    }
}
