//! The [`Magic`] extractor.

use crate::error::DecodeRejection;
use crate::pipeline::Pipeline;
use crate::request::RequestData;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use magic_decoder_core::Bind;
use std::ops::{Deref, DerefMut};

/// Decodes a record from every source it declares.
///
/// The record starts from `T::default()` and is then populated by the
/// default extractor of each source in `T::sources()`, in order. Any
/// decode failure rejects the request with a JSON error body.
///
/// # Example
///
/// ```ignore
/// use magic_decoder_web::{Bind, Magic};
///
/// #[derive(Bind, Default, Serialize)]
/// #[bind(sources(path, json))]
/// struct UpdateItem {
///     #[bind(path = "id")]
///     id: i64,
///     #[bind(json = "money")]
///     money: f64,
/// }
///
/// async fn update(Magic(item): Magic<UpdateItem>) -> Json<UpdateItem> {
///     Json(item)
/// }
///
/// let app = Router::new().route("/items/:id", put(update));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Magic<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Magic<T>
where
    T: Bind + Default + Send,
    S: Send + Sync,
{
    type Rejection = DecodeRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let data = RequestData::from_request(req, state).await?;

        let mut value = T::default();
        Pipeline::for_sources(T::sources()).run(Some(&mut value), &data)?;

        Ok(Self(value))
    }
}

impl<T> Deref for Magic<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Magic<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
