mod reader;

pub use reader::SummaryReader;

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Top-level sections that must be objects when present.
const OBJECT_SECTIONS: &[&str] = &["metrics", "state"];

/// A load-test summary as emitted by the load generator.
///
/// The document has no fixed schema. The only structural guarantee is that
/// the top level (and the `metrics`/`state` sections, when present) are
/// objects; everything below that is probed with [`lookup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawSummary(Value);

impl RawSummary {
    /// Wrap an already-deserialized JSON document, rejecting structurally
    /// invalid input.
    ///
    /// A missing `metrics` section is not an error: it is logged and every
    /// metric takes its absent value or default.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = &value else {
            return Err(Error::InvalidStructure(format!(
                "summary must be a JSON object, found {}",
                kind(&value)
            )));
        };

        for section in OBJECT_SECTIONS {
            if let Some(inner) = map.get(*section)
                && !inner.is_object()
            {
                return Err(Error::InvalidStructure(format!(
                    "`{}` must be a JSON object, found {}",
                    section,
                    kind(inner)
                )));
            }
        }

        if !map.contains_key("metrics") {
            tracing::warn!("Summary has no `metrics` section, every metric falls back to its default");
        }

        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolve a dotted path, see [`lookup`].
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup(&self.0, path)
    }

    /// Like [`RawSummary::first_number`], but yields `default` when no
    /// candidate resolves to a JSON number.
    pub fn number_or<P: AsRef<str>>(&self, paths: &[P], default: f64) -> f64 {
        self.first_number(paths).unwrap_or(default)
    }

    /// First candidate path that resolves to a JSON number.
    pub fn first_number<P: AsRef<str>>(&self, paths: &[P]) -> Option<f64> {
        paths
            .iter()
            .find_map(|path| self.lookup(path.as_ref()).and_then(Value::as_f64))
    }

    /// First candidate path that resolves to a non-negative whole number.
    pub fn first_count<P: AsRef<str>>(&self, paths: &[P]) -> Option<u64> {
        paths
            .iter()
            .find_map(|path| self.lookup(path.as_ref()).and_then(as_count))
    }
}

impl TryFrom<Value> for RawSummary {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Walk a dotted key path through nested objects.
///
/// Returns `None` as soon as a segment is missing or the value reached so far
/// is not an object. Never fails otherwise.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Read a request count. Accepts JSON integers and whole, non-negative floats
/// (some exporters write `300.0`); anything else is not a count.
fn as_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    let float = value.as_f64()?;
    (float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64).then_some(float as u64)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
