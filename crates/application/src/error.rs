use domain::DomainError;
use thiserror::Error;

use crate::repository::{AuthError, StoreError};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("authorization failed: {0}")]
    Authorization(String),
}

impl ApplicationError {
    /// 创建授权错误
    pub fn authorization(action: impl Into<String>) -> Self {
        ApplicationError::Authorization(action.into())
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
