//! HTTP handlers for item and soldier CRUD.

pub mod items;
pub mod soldiers;
pub use items::*;
pub use soldiers::*;
