//! Numeric error codes returned in every error body

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried as a bare number on the wire
///
/// The leading digit selects the [`ErrorCategory`](super::ErrorCategory).
/// Values are stable; gaps are left where codes were retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx general
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,
    InvalidFormat = 6,
    RequiredField = 7,
    ValueOutOfRange = 8,

    // 2xxx permission
    /// Free account asked for a premium feature
    FeatureNotAvailable = 2002,

    // 3xxx restaurant
    RestaurantNotFound = 3001,
    /// Name has no letter or digit to build a slug from
    InvalidSlug = 3002,
    InvalidThemeColor = 3003,

    // 4xxx menu
    MenuNotFound = 4001,
    MenuAlreadyExists = 4002,
    /// Stale `expectedVersion`
    MenuVersionConflict = 4003,
    InvalidPrice = 4005,

    // 5xxx billing
    InvalidSignature = 5001,
    PaymentSetupFailed = 5002,

    // 65xx upload
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    InvalidImageFile = 6503,
    NoFileProvided = 6504,
    EmptyFile = 6505,
    ImageProcessingFailed = 6508,
    FileStorageFailed = 6509,

    // 9xxx system
    DatabaseError = 9002,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 25] = [
        Self::ValidationFailed,
        Self::NotFound,
        Self::AlreadyExists,
        Self::InvalidRequest,
        Self::InvalidFormat,
        Self::RequiredField,
        Self::ValueOutOfRange,
        Self::FeatureNotAvailable,
        Self::RestaurantNotFound,
        Self::InvalidSlug,
        Self::InvalidThemeColor,
        Self::MenuNotFound,
        Self::MenuAlreadyExists,
        Self::MenuVersionConflict,
        Self::InvalidPrice,
        Self::InvalidSignature,
        Self::PaymentSetupFailed,
        Self::FileTooLarge,
        Self::UnsupportedFileFormat,
        Self::InvalidImageFile,
        Self::NoFileProvided,
        Self::EmptyFile,
        Self::ImageProcessingFailed,
        Self::FileStorageFailed,
        Self::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Message used when the error is built without one
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field is missing",
            Self::ValueOutOfRange => "Value is out of range",
            Self::FeatureNotAvailable => "Feature requires a premium subscription",
            Self::RestaurantNotFound => "Restaurant not found",
            Self::InvalidSlug => "Restaurant name must contain a letter or digit",
            Self::InvalidThemeColor => "Theme color must be a #RRGGBB hex color",
            Self::MenuNotFound => "Menu not found",
            Self::MenuAlreadyExists => "Menu already exists for this restaurant",
            Self::MenuVersionConflict => "Menu was modified by another session",
            Self::InvalidPrice => "Price must not be negative",
            Self::InvalidSignature => "Invalid signature",
            Self::PaymentSetupFailed => "Failed to create checkout session",
            Self::FileTooLarge => "File is too large",
            Self::UnsupportedFileFormat => "Unsupported file format",
            Self::InvalidImageFile => "Invalid image file",
            Self::NoFileProvided => "No file provided",
            Self::EmptyFile => "Empty file",
            Self::ImageProcessingFailed => "Image processing failed",
            Self::FileStorageFailed => "Failed to store file",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
