//! Shared types for the QR menu platform
//!
//! Entity model (restaurants, menus, sections, items), slug derivation,
//! the unified error system and small utilities used by the service and its
//! clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
