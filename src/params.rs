//! Parameter normalization and binding.
//!
//! Callers may pass `commandParameters` as one mapping (`{"a": 1}`) or as a
//! sequence of mappings (`[{"a": 1}, {"b": 2}]`). Each entry's value is either
//! a bare scalar or a descriptor such as `{"direction": "Output", "value": 0}`.
//! Both shapes are resolved here, once, so the backends only ever see
//! [`BoundParameter`]s.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::SqlFacadeError;
use crate::types::{ParameterDirection, RowValues};

/// One mapping of parameter name to parameter input.
pub type ParameterMap = JsonMap<String, JsonValue>;

/// Normalize raw `commandParameters` into a sequence of mappings.
///
/// A single mapping becomes a one-element sequence and a sequence of mappings
/// is returned as-is. Any other shape, including absence, yields an empty
/// sequence rather than an error; non-mapping elements of a sequence are
/// skipped the same way.
#[must_use]
pub fn normalize_parameters(raw: Option<&JsonValue>) -> Vec<ParameterMap> {
    match raw {
        Some(JsonValue::Object(map)) => vec![map.clone()],
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                JsonValue::Object(map) => Some(map.clone()),
                other => {
                    tracing::debug!(?other, "skipping non-mapping parameter entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::debug!(?other, "ignoring commandParameters of unsupported shape");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// A parameter value as the caller supplied it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamInput {
    /// A bare value; the direction is implied `Input`.
    Scalar(RowValues),
    /// A `{direction, value}` descriptor.
    Structured {
        direction: ParameterDirection,
        value: RowValues,
    },
}

impl ParamInput {
    /// Classify a raw parameter value.
    ///
    /// Descriptor keys are matched case-insensitively. A missing or
    /// unparseable `direction` means `Input`; a missing `value` means null.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ParameterError` when a descriptor holds two
    /// keys that differ only by case.
    pub fn from_json(raw: &JsonValue) -> Result<Self, SqlFacadeError> {
        let JsonValue::Object(descriptor) = raw else {
            return Ok(ParamInput::Scalar(RowValues::from_json(raw)));
        };

        let direction = get_ignore_case(descriptor, "direction")?.and_then(JsonValue::as_str);
        let value = get_ignore_case(descriptor, "value")?
            .map_or(RowValues::Null, RowValues::from_json);

        Ok(ParamInput::Structured {
            direction: ParameterDirection::parse_or_default(direction),
            value,
        })
    }

    #[must_use]
    pub fn direction(&self) -> ParameterDirection {
        match self {
            ParamInput::Scalar(_) => ParameterDirection::Input,
            ParamInput::Structured { direction, .. } => *direction,
        }
    }

    #[must_use]
    pub fn into_value(self) -> RowValues {
        match self {
            ParamInput::Scalar(value) | ParamInput::Structured { value, .. } => value,
        }
    }
}

/// A named parameter with its direction resolved, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub direction: ParameterDirection,
    pub value: RowValues,
}

impl BoundParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, direction: ParameterDirection, value: RowValues) -> Self {
        Self {
            name: name.into(),
            direction,
            value,
        }
    }

    /// Shorthand for an `Input` parameter.
    #[must_use]
    pub fn input(name: impl Into<String>, value: RowValues) -> Self {
        Self::new(name, ParameterDirection::Input, value)
    }

    #[must_use]
    pub fn from_input(name: impl Into<String>, input: ParamInput) -> Self {
        let direction = input.direction();
        Self::new(name, direction, input.into_value())
    }
}

/// Bind one `name -> value-or-descriptor` pair.
///
/// # Errors
///
/// Returns `SqlFacadeError::ParameterError` for an ambiguous descriptor.
pub fn bind_parameter(name: &str, raw: &JsonValue) -> Result<BoundParameter, SqlFacadeError> {
    let input = ParamInput::from_json(raw).map_err(|e| match e {
        SqlFacadeError::ParameterError(msg) => {
            SqlFacadeError::ParameterError(format!("parameter `{name}`: {msg}"))
        }
        other => other,
    })?;
    Ok(BoundParameter::from_input(name, input))
}

/// Flatten a normalized batch into one ordered parameter list.
///
/// Mappings are visited in sequence order and entries in insertion order.
///
/// # Errors
///
/// Propagates the first binding failure.
pub fn bind_parameters(batch: &[ParameterMap]) -> Result<Vec<BoundParameter>, SqlFacadeError> {
    batch
        .iter()
        .flat_map(|map| map.iter())
        .map(|(name, raw)| bind_parameter(name, raw))
        .collect()
}

/// Case-insensitive key lookup that refuses to guess between keys differing
/// only by case.
///
/// # Errors
///
/// Returns `SqlFacadeError::ParameterError` when more than one key matches.
pub fn get_ignore_case<'a>(
    map: &'a ParameterMap,
    key: &str,
) -> Result<Option<&'a JsonValue>, SqlFacadeError> {
    let mut matches = map.iter().filter(|(k, _)| k.eq_ignore_ascii_case(key));
    match (matches.next(), matches.next()) {
        (Some((found, _)), Some((other, _))) => Err(SqlFacadeError::ParameterError(format!(
            "keys `{found}` and `{other}` both match `{key}`"
        ))),
        (first, _) => Ok(first.map(|(_, v)| v)),
    }
}
