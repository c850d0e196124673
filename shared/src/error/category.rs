//! Domain of an error code, derived from its numeric range

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Permission,
    Restaurant,
    Menu,
    Billing,
    Upload,
    /// Infrastructure failures; logged when rendered
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 | 2 => Self::Permission,
            3 => Self::Restaurant,
            4 => Self::Menu,
            5 => Self::Billing,
            6 => Self::Upload,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
