//! Source extractors.
//!
//! Each extractor reads one aspect of a [`RequestData`] and applies it to a
//! record:
//! - `PathParams` / `PathFields`: matched route variables, `path` tags
//! - `QueryParams` / `QueryFields`: query-string parameters, `form` tags
//! - `JsonBody`: a JSON object body, `json` tags
//!
//! The `*Params` variants take every key the request carries; the
//! `*Fields` variants only the keys they were configured with.
//!
//! # Examples
//!
//! ```ignore
//! use magic_decoder_web::extractors::{Extractor, PathParams, QueryParams};
//!
//! let mut item = Item::default();
//! PathParams::new().extract(&mut item, &request)?;
//! QueryParams::new().with_namespace("filter").extract(&mut item, &request)?;
//! ```

use crate::request::RequestData;
use magic_decoder_core::{bind_values, merge_body, namespace, Bind, RawValues, Result};

/// Applies one request aspect to a record.
pub trait Extractor: Send + Sync {
    /// Populate `target` from `request`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`](magic_decoder_core::DecodeError)
    /// raised while binding; fields bound before it keep their values.
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// All matched route variables, bound through `path` tags.
#[derive(Debug, Clone)]
pub struct PathParams {
    namespace: String,
}

impl PathParams {
    /// Extractor over every route variable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: namespace::PATH.to_string(),
        }
    }

    /// Bind through a different tag namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Default for PathParams {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PathParams {
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()> {
        let values: RawValues = request.path_params().iter().cloned().collect();
        bind_values(&self.namespace, &values, target)
    }

    fn name(&self) -> &'static str {
        "path_params"
    }
}

/// Only the listed route variables, bound through `path` tags.
///
/// Listed keys the route did not match bind as empty values and are
/// therefore skipped.
#[derive(Debug, Clone)]
pub struct PathFields {
    keys: Vec<String>,
    namespace: String,
}

impl PathFields {
    /// Extractor over the route variables named in `keys`.
    #[must_use]
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            namespace: namespace::PATH.to_string(),
        }
    }

    /// Bind through a different tag namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Extractor for PathFields {
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()> {
        let values: RawValues = self
            .keys
            .iter()
            .map(|key| {
                let value = request.path_param(key).unwrap_or_default();
                (key.clone(), value.to_string())
            })
            .collect();
        bind_values(&self.namespace, &values, target)
    }

    fn name(&self) -> &'static str {
        "path_fields"
    }
}

/// All query-string parameters, bound through `form` tags.
///
/// When a key repeats, its first value is used.
#[derive(Debug, Clone)]
pub struct QueryParams {
    namespace: String,
}

impl QueryParams {
    /// Extractor over every query parameter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: namespace::FORM.to_string(),
        }
    }

    /// Bind through a different tag namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for QueryParams {
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()> {
        let values = query_values(request);
        bind_values(&self.namespace, &values, target)
    }

    fn name(&self) -> &'static str {
        "query_params"
    }
}

/// Only the listed query-string parameters, bound through `form` tags.
#[derive(Debug, Clone)]
pub struct QueryFields {
    keys: Vec<String>,
    namespace: String,
}

impl QueryFields {
    /// Extractor over the query parameters named in `keys`.
    #[must_use]
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            namespace: namespace::FORM.to_string(),
        }
    }

    /// Bind through a different tag namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Extractor for QueryFields {
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()> {
        let mut all = query_values(request);
        let values: RawValues = self
            .keys
            .iter()
            .map(|key| (key.clone(), all.remove(key).unwrap_or_default()))
            .collect();
        bind_values(&self.namespace, &values, target)
    }

    fn name(&self) -> &'static str {
        "query_fields"
    }
}

/// A JSON object body, bound through each record's `json` tags.
///
/// Does not use the string coercion engine: members are decoded with
/// `serde_json`. An empty body is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody;

impl JsonBody {
    /// Extractor over the request body.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Extractor for JsonBody {
    fn extract(&self, target: &mut dyn Bind, request: &RequestData) -> Result<()> {
        merge_body(request.body(), target)
    }

    fn name(&self) -> &'static str {
        "json_body"
    }
}

/// Decode the query string into a first-value-wins map.
///
/// Undecodable query strings are treated as empty.
fn query_values(request: &RequestData) -> RawValues {
    let Some(query) = request.query() else {
        return RawValues::new();
    };

    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Ignoring undecodable query string");
        Vec::new()
    });

    let mut values = RawValues::with_capacity(pairs.len());
    for (key, value) in pairs {
        values.entry(key).or_insert(value);
    }
    values
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use magic_decoder_core::DecodeError;
    use magic_decoder_macros::Bind;

    #[derive(Bind, Debug, Default, PartialEq)]
    struct Team {
        #[bind(path = "id")]
        id: i64,
        #[bind(path = "team_id")]
        team_id: i64,
        #[bind(form = "name", route = "name")]
        name: String,
        #[bind(json = "money")]
        money: f64,
    }

    #[test]
    fn test_path_params_bind_every_variable() {
        let request = RequestData::new()
            .with_path_param("id", "2")
            .with_path_param("team_id", "7");

        let mut team = Team::default();
        PathParams::new().extract(&mut team, &request).unwrap();

        assert_eq!(team.id, 2);
        assert_eq!(team.team_id, 7);
    }

    #[test]
    fn test_path_fields_restrict_keys() {
        let request = RequestData::new()
            .with_path_param("id", "2")
            .with_path_param("team_id", "7");

        let mut team = Team::default();
        PathFields::new(["id", "missing"]).extract(&mut team, &request).unwrap();

        assert_eq!(team.id, 2);
        assert_eq!(team.team_id, 0);
    }

    #[test]
    fn test_path_params_custom_namespace() {
        let request = RequestData::new().with_path_param("name", "bob");

        let mut team = Team::default();
        PathParams::new()
            .with_namespace("route")
            .extract(&mut team, &request)
            .unwrap();

        assert_eq!(team.name, "bob");
    }

    #[test]
    fn test_query_params() {
        let request = RequestData::new().with_query("name=bob&id=9");

        let mut team = Team::default();
        QueryParams::new().extract(&mut team, &request).unwrap();

        assert_eq!(team.name, "bob");
        assert_eq!(team.id, 0);
    }

    #[test]
    fn test_query_params_first_value_wins() {
        let request = RequestData::new().with_query("name=bob&name=carl");

        let mut team = Team::default();
        QueryParams::new().extract(&mut team, &request).unwrap();

        assert_eq!(team.name, "bob");
    }

    #[test]
    fn test_query_params_decode_percent_encoding() {
        let request = RequestData::new().with_query("name=bob%20smith");

        let mut team = Team::default();
        QueryParams::new().extract(&mut team, &request).unwrap();

        assert_eq!(team.name, "bob smith");
    }

    #[test]
    fn test_query_params_empty() {
        let mut team = Team::default();
        QueryParams::new().extract(&mut team, &RequestData::new()).unwrap();

        assert_eq!(team, Team::default());
    }

    #[test]
    fn test_query_fields_use_form_namespace() {
        let request = RequestData::new().with_query("name=bob&pet=cat");

        let mut team = Team::default();
        QueryFields::new(["name"]).extract(&mut team, &request).unwrap();
        assert_eq!(team.name, "bob");

        let mut team = Team::default();
        QueryFields::new(["pet"]).extract(&mut team, &request).unwrap();
        assert_eq!(team, Team::default());
    }

    #[test]
    fn test_json_body() {
        let request = RequestData::new().with_body(r#"{"money": 12.34, "id": 5}"#);

        let mut team = Team::default();
        JsonBody::new().extract(&mut team, &request).unwrap();

        assert!((team.money - 12.34).abs() < f64::EPSILON);
        assert_eq!(team.id, 0);
    }

    #[test]
    fn test_json_body_required() {
        let mut team = Team::default();
        let err = JsonBody::new()
            .extract(&mut team, &RequestData::new())
            .unwrap_err();

        assert!(matches!(err, DecodeError::EmptyBody));
    }

    #[test]
    fn test_path_parse_error() {
        let request = RequestData::new().with_path_param("id", "two");

        let mut team = Team::default();
        let err = PathParams::new().extract(&mut team, &request).unwrap_err();

        assert!(matches!(err, DecodeError::Parse { field: "id", .. }));
    }
}
