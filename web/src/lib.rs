//! Axum integration for Magic Decoder.
//!
//! This crate decodes HTTP requests into tagged records. A request is
//! materialised once into a [`RequestData`], then an ordered list of
//! extractors applies its aspects to the record:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        HTTP request          │  route variables, query, body
//! ├──────────────────────────────┤
//! │        RequestData           │  buffered once, read by all steps
//! ├──────────────────────────────┤
//! │  PathParams   → `path` tags  │
//! │  QueryParams  → `form` tags  │  applied in order, later wins,
//! │  JsonBody     → `json` tags  │  first error stops the run
//! ├──────────────────────────────┤
//! │        record (T: Bind)      │
//! └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::put, Json, Router};
//! use magic_decoder_web::{run_all, Bind, JsonBody, PathParams, RequestData, DecodeRejection};
//!
//! #[derive(Bind, Default, Serialize)]
//! struct Item {
//!     #[bind(path = "id")]
//!     id: i64,
//!     #[bind(json = "money")]
//!     money: f64,
//! }
//!
//! async fn update(request: RequestData) -> Result<Json<Item>, DecodeRejection> {
//!     let mut item = Item::default();
//!     run_all(
//!         Some(&mut item),
//!         &request,
//!         &[Some(&PathParams::new()), Some(&JsonBody::new())],
//!     )?;
//!     Ok(Json(item))
//! }
//!
//! let app = Router::new().route("/items/:id", put(update));
//! ```
//!
//! Handlers that use each record's declared sources can take
//! [`Magic<T>`](Magic) directly.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod magic;
pub mod pipeline;
pub mod request;

// Re-export key types for convenience
pub use error::DecodeRejection;
pub use extractors::{Extractor, JsonBody, PathFields, PathParams, QueryFields, QueryParams};
pub use magic::Magic;
pub use magic_decoder_core::{Bind, DecodeError, Source};
pub use magic_decoder_macros::Bind;
pub use pipeline::{run_all, Pipeline};
pub use request::RequestData;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, DecodeRejection>;
