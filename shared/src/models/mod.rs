//! Data models
//!
//! Application-side types (camelCase JSON) shared between the server and the
//! menu frontend. Store row types with snake_case columns live next to the
//! repository that reads them.

pub mod cart;
pub mod dish;
pub mod order;

// Re-exports
pub use cart::*;
pub use dish::*;
pub use order::*;
