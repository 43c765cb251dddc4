//! Request-level checks applied before calling the store.

mod validation;
pub use validation::{RequestValidator, MAX_TEXT_LENGTH};
