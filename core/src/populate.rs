//! The field population engine.
//!
//! Walks a record's descriptor table, matches each field's tag for one
//! namespace against a map of raw values, and coerces the matching values
//! into the fields in place. The first value that fails to parse aborts the
//! walk; fields assigned before it keep their new values.

use crate::bind::Bind;
use crate::coerce::{self, Outcome};
use crate::error::{DecodeError, Result};
use std::collections::HashMap;

/// Raw key to value map built from one request aspect.
pub type RawValues = HashMap<String, String>;

/// Populate `target` from `values` under the tag `namespace`.
///
/// An absent map is a successful no-op and is checked before the target;
/// an absent target with a present map is a usage error.
///
/// # Errors
///
/// - [`DecodeError::InvalidTarget`] when `target` is `None` and `values` is
///   present.
/// - [`DecodeError::Parse`] on the first value that does not match its
///   field's type.
///
/// # Examples
///
/// ```
/// use magic_decoder_core::{populate, DecodeError, RawValues};
///
/// let values = RawValues::new();
/// assert!(populate("form", None, None).is_ok());
/// assert!(matches!(
///     populate("form", Some(&values), None),
///     Err(DecodeError::InvalidTarget(_))
/// ));
/// ```
pub fn populate(
    namespace: &str,
    values: Option<&RawValues>,
    target: Option<&mut dyn Bind>,
) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };
    let Some(target) = target else {
        return Err(DecodeError::InvalidTarget("no record"));
    };
    bind_values(namespace, values, target)
}

/// Populate a present `target` from `values` under `namespace`.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] on the first value that does not match
/// its field's type.
pub fn bind_values(namespace: &str, values: &RawValues, target: &mut dyn Bind) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    for (index, field) in target.descriptors().iter().enumerate() {
        if field.embedded {
            continue;
        }

        let Some(key) = field.key(namespace) else {
            continue;
        };

        // An empty value is indistinguishable from an absent one.
        let Some(raw) = values.get(key).filter(|raw| !raw.is_empty()) else {
            continue;
        };

        match coerce::assign(target.slot(index), raw) {
            Ok(Outcome::Assigned) => {
                tracing::trace!(field = field.name, key, namespace, "Bound field");
            }
            Ok(Outcome::Ignored) => {
                tracing::debug!(
                    field = field.name,
                    key,
                    kind = %field.kind,
                    "Value not applicable to field, left unchanged"
                );
            }
            Err(source) => {
                return Err(DecodeError::Parse {
                    field: field.name,
                    key: key.to_owned(),
                    value: raw.clone(),
                    kind: field.kind,
                    source,
                });
            }
        }
    }

    Ok(())
}
