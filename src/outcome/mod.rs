//! Attempt outcomes.
//!
//! - [`Outcome`] typed record with the two repeat flags and a payload
//! - [`IntoOutcome`] validation of whatever an attempt returns
//! - [`ShapeError`] why a value is not a well-formed outcome

mod record;
mod shape;

pub use record::Outcome;
pub use shape::{IntoOutcome, ShapeError};
