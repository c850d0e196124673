//! Status code for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::RestaurantNotFound | Self::MenuNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::MenuAlreadyExists | Self::MenuVersionConflict => {
                StatusCode::CONFLICT
            }
            Self::FeatureNotAvailable => StatusCode::FORBIDDEN,
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DatabaseError
            | Self::PaymentSetupFailed
            | Self::ImageProcessingFailed
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,
            // caller mistakes
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let cases = [
            (ErrorCode::MenuNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::RestaurantNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::MenuAlreadyExists, StatusCode::CONFLICT),
            (ErrorCode::MenuVersionConflict, StatusCode::CONFLICT),
            (ErrorCode::FeatureNotAvailable, StatusCode::FORBIDDEN),
            (ErrorCode::FileTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (ErrorCode::PaymentSetupFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::InvalidSignature, StatusCode::BAD_REQUEST),
            (ErrorCode::InvalidThemeColor, StatusCode::BAD_REQUEST),
            (ErrorCode::UnsupportedFileFormat, StatusCode::BAD_REQUEST),
        ];
        for (code, status) in cases {
            assert_eq!(code.http_status(), status, "code {code}");
        }
    }

    #[test]
    fn test_system_errors_are_server_side() {
        for code in ErrorCode::ALL {
            if code.category() == crate::error::ErrorCategory::System {
                assert!(code.http_status().is_server_error(), "code {code}");
            }
        }
    }
}
