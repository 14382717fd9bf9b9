use thiserror::Error;

/// User-facing failures. Each variant carries the exact text shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Missing or unusable configuration; fatal at startup.
    #[error("{0}")]
    Configuration(String),
    /// A required form field was blank. Raised before any remote call.
    #[error("{0}")]
    Validation(String),
    /// The one-shot generation call failed or returned something unusable.
    #[error("{0}")]
    Generation(String),
    /// A chat turn failed. Rendered inline in the transcript.
    #[error("{0}")]
    Send(String),
}

pub const GENERATION_FAILED: &str =
    "Không thể tạo nội dung lúc này. Vui lòng kiểm tra lại thông tin và thử lại sau.";
pub const SEND_FAILED: &str = "Không thể nhận phản hồi từ AI lúc này.";

impl AppError {
    pub fn generation() -> Self {
        AppError::Generation(GENERATION_FAILED.to_string())
    }

    pub fn send() -> Self {
        AppError::Send(SEND_FAILED.to_string())
    }

    pub fn missing_api_key() -> Self {
        AppError::Configuration(format!(
            "{} environment variable is not set",
            crate::constants::API_KEY_VAR
        ))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
