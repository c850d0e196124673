//! Data models
//!
//! Shared between the menu service and its clients (via API).
//! Documents use camelCase field names; ids are store-assigned strings.

pub mod menu;
pub mod restaurant;
pub mod serde_helpers;

// Re-exports
pub use menu::*;
pub use restaurant::*;
