//! Sample Validation
//!
//! Range and finiteness checks applied to recorded samples before they
//! reach the decision engine, which trusts its input.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
