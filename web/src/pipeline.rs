//! Ordered extractor pipelines.
//!
//! A pipeline applies a list of extractors to one record, in order. Later
//! extractors overwrite fields set by earlier ones, and the first error
//! stops the run. Fields bound before the failure keep their values.

use crate::extractors::{Extractor, JsonBody, PathParams, QueryParams};
use crate::request::RequestData;
use magic_decoder_core::{Bind, DecodeError, Result, Source};

/// Apply `extractors` to `target` in order.
///
/// `None` entries are skipped.
///
/// # Errors
///
/// - [`DecodeError::InvalidTarget`] when `target` is `None`.
/// - The first error returned by an extractor.
///
/// # Example
///
/// ```ignore
/// let mut item = Item::default();
/// run_all(
///     Some(&mut item),
///     &request,
///     &[Some(&PathParams::new()), None, Some(&JsonBody::new())],
/// )?;
/// ```
pub fn run_all(
    target: Option<&mut dyn Bind>,
    request: &RequestData,
    extractors: &[Option<&dyn Extractor>],
) -> Result<()> {
    let Some(target) = target else {
        tracing::error!("Decode pipeline invoked without a target record");
        return Err(DecodeError::InvalidTarget("no record"));
    };

    let span = tracing::debug_span!("decode", record = target.type_name());
    let _entered = span.enter();

    for extractor in extractors.iter().flatten() {
        tracing::trace!(extractor = extractor.name(), "Applying extractor");
        if let Err(err) = extractor.extract(&mut *target, request) {
            tracing::debug!(extractor = extractor.name(), error = %err, "Extractor failed");
            return Err(err);
        }
    }

    Ok(())
}

/// An owned, reusable list of extractors.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .then(QueryParams::new())
///     .then(PathParams::new())
///     .then(JsonBody::new());
///
/// let mut item = Item::default();
/// pipeline.run(Some(&mut item), &request)?;
/// ```
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Option<Box<dyn Extractor>>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extractor.
    #[must_use]
    pub fn then(mut self, extractor: impl Extractor + 'static) -> Self {
        self.steps.push(Some(Box::new(extractor)));
        self
    }

    /// Append an extractor that may be absent; absent steps are skipped.
    #[must_use]
    pub fn then_optional(mut self, extractor: Option<Box<dyn Extractor>>) -> Self {
        self.steps.push(extractor);
        self
    }

    /// Pipeline applying the default extractor for each source, in order.
    #[must_use]
    pub fn for_sources(sources: &[Source]) -> Self {
        sources
            .iter()
            .fold(Self::new(), |pipeline, source| match source {
                Source::Query => pipeline.then(QueryParams::new()),
                Source::Path => pipeline.then(PathParams::new()),
                Source::Body => pipeline.then(JsonBody::new()),
            })
    }

    /// Number of steps, absent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to `target`.
    ///
    /// # Errors
    ///
    /// Same as [`run_all`].
    pub fn run(&self, target: Option<&mut dyn Bind>, request: &RequestData) -> Result<()> {
        let steps: Vec<Option<&dyn Extractor>> =
            self.steps.iter().map(Option::as_deref).collect();
        run_all(target, request, &steps)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<Option<&'static str>> = self
            .steps
            .iter()
            .map(|step| step.as_deref().map(|extractor| extractor.name()))
            .collect();
        f.debug_struct("Pipeline").field("steps", &names).finish()
    }
}
