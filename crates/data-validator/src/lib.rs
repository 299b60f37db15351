//! Measurement Validation
//!
//! Provides the dimension vocabulary, decimal input normalization and
//! submission validation for measurement form input.

mod dimension;
mod error;
mod normalizer;
mod validator;

pub use dimension::Dimension;
pub use error::ValidationError;
pub use normalizer::normalize_decimal_separator;
pub use validator::{Measurement, Validator, MAX_INTEGER_DIGITS, MAX_SCALE};
