//! Materialised request data.
//!
//! Extractors run synchronously over a [`RequestData`], which holds the
//! three request aspects they read from: matched route variables, the raw
//! query string, and the buffered body. Building it is the only
//! asynchronous step, and it reads the body exactly once.

use crate::error::DecodeRejection;
use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::RawPathParamsRejection, FromRequest, FromRequestParts, RawPathParams, Request},
};

/// Route variables, query string and body of one request.
///
/// # Example
///
/// ```
/// use magic_decoder_web::RequestData;
///
/// let request = RequestData::new()
///     .with_path_param("id", "2")
///     .with_query("pet=cat&name=bob")
///     .with_body(r#"{"money": 12.34}"#);
///
/// assert_eq!(request.path_param("id"), Some("2"));
/// assert_eq!(request.query(), Some("pet=cat&name=bob"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    path_params: Vec<(String, String)>,
    query: Option<String>,
    body: Bytes,
}

impl RequestData {
    /// Create empty request data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a matched route variable.
    #[must_use]
    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((key.into(), value.into()));
        self
    }

    /// Set the raw query string, without the leading `?`.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the buffered body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// All matched route variables, in route order.
    #[must_use]
    pub fn path_params(&self) -> &[(String, String)] {
        &self.path_params
    }

    /// Value of the route variable `key`, if the route matched one.
    #[must_use]
    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Raw query string, if the request had one.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Buffered body; empty when the request had none.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[async_trait]
impl<S> FromRequest<S> for RequestData
where
    S: Send + Sync,
{
    type Rejection = DecodeRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        // Requests that did not go through a parameterised route have no
        // variables to offer.
        let path_params = match RawPathParams::from_request_parts(&mut parts, state).await {
            Ok(params) => params
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
            Err(RawPathParamsRejection::MissingPathParams(_)) => Vec::new(),
            Err(rejection) => {
                return Err(DecodeRejection::extraction(
                    rejection.status(),
                    rejection.body_text(),
                ));
            }
        };

        let query = parts.uri.query().map(str::to_owned);

        let body = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| {
                DecodeRejection::extraction(rejection.status(), rejection.body_text())
            })?;

        Ok(Self {
            path_params,
            query,
            body,
        })
    }
}
