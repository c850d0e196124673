//! Error codes and the HTTP error type shared by the menu services
//!
//! Codes are grouped by leading digit: 0xxx general, 2xxx permission,
//! 3xxx restaurant, 4xxx menu, 5xxx billing, 65xx upload, 9xxx system.
//! Handlers return [`AppError`]; axum renders it as an [`ErrorBody`] with the
//! status chosen by [`ErrorCode::http_status`].
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::validation("Section name is required").with_detail("field", "name");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.error_code(), Some(ErrorCode::ValidationFailed));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
