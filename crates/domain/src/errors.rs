//! 领域模型错误定义
//!
//! 定义领域层所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 参数无效错误
    #[error("invalid {field}: {message}")]
    InvalidArgument { field: String, message: String },

    /// 会话标识错误
    #[error("conversation error: {message}")]
    ConversationError { message: String },

    /// 验证错误
    #[error("validation failed: {message}")]
    ValidationError { message: String },
}

impl DomainError {
    /// 创建参数无效错误
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建会话标识错误
    pub fn conversation_error(message: impl Into<String>) -> Self {
        Self::ConversationError {
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
