//! # Magic Decoder Core
//!
//! Tag-driven field binding for request decoding.
//!
//! A record type describes, per field, which key it is bound to in each tag
//! namespace. Given a namespace and a map of raw string values, the engine
//! walks the record's fields in declaration order and coerces every
//! matching value into the field's declared type.
//!
//! ## Core Concepts
//!
//! - **Record**: any type implementing [`Bind`], usually via `#[derive(Bind)]`
//! - **Namespace**: a group of tags, e.g. [`namespace::PATH`] or [`namespace::FORM`]
//! - **Raw values**: a [`RawValues`] map built fresh from one request aspect
//! - **Coercion**: parsing a raw string into a [`FieldKind`]
//!
//! ## Coercion Rules
//!
//! | kind | accepted text | on bad text |
//! |---|---|---|
//! | `Bool` | `on 1 yes true` / `off 0 no false`, any case | ignored |
//! | `Int`, `Uint` | base-10 | error |
//! | `Float` | decimal | error |
//! | `String` | anything | never fails |
//! | `Timestamp` | see [`timestamp`] | error; ignored when shorter than 8 bytes |
//! | `IntList` | comma separated base-10 | error, list unchanged |
//! | `StringList` | comma separated | never fails |
//! | `Unsupported` | any | ignored |
//!
//! Empty values are treated as absent and never clear a field.
//!
//! ## Example
//!
//! ```ignore
//! use magic_decoder_core::{Bind, RawValues, namespace};
//! use magic_decoder_macros::Bind;
//!
//! #[derive(Bind, Default)]
//! struct Search {
//!     #[bind(form = "q")]
//!     query: String,
//!     #[bind(form = "page")]
//!     page: u32,
//!     #[bind(form = "tags")]
//!     tags: Vec<String>,
//! }
//!
//! let values = RawValues::from([
//!     ("q".to_string(), "rust".to_string()),
//!     ("page".to_string(), "2".to_string()),
//!     ("tags".to_string(), "web,http".to_string()),
//! ]);
//!
//! let mut search = Search::default();
//! search.bind_from(namespace::FORM, &values)?;
//! assert_eq!(search.page, 2);
//! ```

pub mod bind;
pub mod coerce;
pub mod error;
pub mod field;
pub mod json;
pub mod populate;
pub mod timestamp;

pub use bind::{Bind, Source, DEFAULT_SOURCES};
pub use error::{DecodeError, ParseFailure, Result};
pub use field::{FieldDescriptor, FieldKind, FieldSlot};
pub use json::{merge_body, JsonObject};
pub use populate::{bind_values, populate, RawValues};

/// Well-known tag namespaces.
pub mod namespace {
    /// Route variables.
    pub const PATH: &str = "path";
    /// Query-string parameters.
    pub const FORM: &str = "form";
    /// JSON body members.
    pub const JSON: &str = "json";
}
