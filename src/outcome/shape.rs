//! # Validating attempt results into [`Outcome`]s.
//!
//! Every value a retried computation yields must be convertible into an
//! [`Outcome`]. Typed outcomes convert trivially; dynamic JSON records are
//! checked for shape:
//!
//! ```text
//! {"must_repeat": true, "data": 3}   ─► Outcome { must_repeat: true,  best_repeat: false, payload: {"data": 3} }
//! {"bestRepeat": true}               ─► Outcome { must_repeat: false, best_repeat: true,  payload: {} }
//! {"must_repeat": null}              ─► Outcome { must_repeat: false, best_repeat: false, payload: {} }
//! [1, 2, 3]                          ─► ShapeError("expected an object, got an array")
//! {"must_repeat": "yes"}             ─► ShapeError("flag `must_repeat` must be a boolean, got a string")
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::GuardError;
use crate::outcome::record::Outcome;

const MUST_KEYS: [&str; 2] = ["must_repeat", "mustRepeat"];
const BEST_KEYS: [&str; 2] = ["best_repeat", "bestRepeat"];

/// A value that is not a well-formed outcome record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ShapeError {
    pub reason: String,
}

impl ShapeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Attaches the attempt number, producing the public error.
    pub(crate) fn at_attempt(self, attempt: u32) -> GuardError {
        GuardError::InvalidOutcomeShape {
            attempt,
            reason: self.reason,
        }
    }
}

/// Conversion of an attempt's return value into an [`Outcome`].
///
/// Implement this for custom record types that carry the two repeat flags.
pub trait IntoOutcome {
    /// Payload type of the resulting outcome.
    type Payload;

    /// Validates `self` and converts it.
    fn into_outcome(self) -> Result<Outcome<Self::Payload>, ShapeError>;
}

impl<T> IntoOutcome for Outcome<T> {
    type Payload = T;

    #[inline]
    fn into_outcome(self) -> Result<Outcome<T>, ShapeError> {
        Ok(self)
    }
}

impl IntoOutcome for Map<String, Value> {
    type Payload = Value;

    fn into_outcome(mut self) -> Result<Outcome<Value>, ShapeError> {
        let must_repeat = take_flag(&mut self, &MUST_KEYS)?;
        let best_repeat = take_flag(&mut self, &BEST_KEYS)?;
        Ok(Outcome {
            must_repeat,
            best_repeat,
            payload: Value::Object(self),
        })
    }
}

impl IntoOutcome for Value {
    type Payload = Value;

    fn into_outcome(self) -> Result<Outcome<Value>, ShapeError> {
        match self {
            Value::Object(map) => map.into_outcome(),
            other => Err(ShapeError::new(format!(
                "expected an object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

/// Removes every alias of a flag and returns its value (`false` when absent or null).
fn take_flag(map: &mut Map<String, Value>, keys: &[&str]) -> Result<bool, ShapeError> {
    let mut flag = false;
    for key in keys {
        match map.remove(*key) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(b)) => flag |= b,
            Some(other) => {
                return Err(ShapeError::new(format!(
                    "flag `{key}` must be a boolean, got {}",
                    kind_of(&other)
                )));
            }
        }
    }
    Ok(flag)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
