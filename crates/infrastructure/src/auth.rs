//! 内存实现的认证网关
//!
//! 本地替身，模拟托管认证服务的客户端可见行为：邮箱唯一的账户表、
//! 带 `guest_` 前缀标识的匿名账户、联合登录桩账户，以及通过
//! watch 通道推送的当前会话观察者。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use application::{AuthAccount, AuthError, AuthGateway, SnapshotStream};
use domain::{DisplayName, UserEmail, UserId};

/// 注册账户的凭据记录。
struct AccountRecord {
    uid: UserId,
    password: String,
}

/// 内存认证网关。
pub struct MemoryAuthGateway {
    accounts: Mutex<HashMap<String, AccountRecord>>,
    current: watch::Sender<Option<AuthAccount>>,
    /// 联合登录桩返回的显示名称（可选预置）。
    federated_name: Mutex<Option<DisplayName>>,
}

impl Default for MemoryAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthGateway {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current,
            federated_name: Mutex::new(None),
        }
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, AccountRecord>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 预置联合登录桩返回的显示名称。
    pub fn set_federated_name(&self, name: DisplayName) {
        *self
            .federated_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(name);
    }

    fn new_uid(prefix: &str) -> Result<UserId, AuthError> {
        UserId::parse(format!("{prefix}{}", Uuid::new_v4().simple()))
            .map_err(|err| AuthError::Backend(err.to_string()))
    }

    fn announce(&self, account: AuthAccount) -> AuthAccount {
        self.current.send_replace(Some(account.clone()));
        account
    }
}

#[async_trait]
impl AuthGateway for MemoryAuthGateway {
    async fn sign_in(&self, email: &UserEmail, password: &str) -> Result<AuthAccount, AuthError> {
        let accounts = self.accounts();
        let record = accounts
            .get(email.as_str())
            .ok_or(AuthError::InvalidCredentials)?;
        if record.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        let account = AuthAccount {
            uid: record.uid.clone(),
            email: Some(email.clone()),
            display_name: None,
            is_anonymous: false,
        };
        drop(accounts);
        info!(email = %email, "用户登录");
        Ok(self.announce(account))
    }

    async fn sign_up(&self, email: &UserEmail, password: &str) -> Result<AuthAccount, AuthError> {
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }
        let uid = Self::new_uid("user_")?;
        {
            let mut accounts = self.accounts();
            if accounts.contains_key(email.as_str()) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            accounts.insert(
                email.as_str().to_owned(),
                AccountRecord {
                    uid: uid.clone(),
                    password: password.to_owned(),
                },
            );
        }
        let account = AuthAccount {
            uid,
            email: Some(email.clone()),
            display_name: None,
            is_anonymous: false,
        };
        info!(email = %email, "新账户已注册");
        Ok(self.announce(account))
    }

    async fn sign_in_anonymously(&self) -> Result<AuthAccount, AuthError> {
        let account = AuthAccount {
            uid: Self::new_uid("guest_")?,
            email: None,
            display_name: None,
            is_anonymous: true,
        };
        info!(uid = %account.uid, "匿名会话已创建");
        Ok(self.announce(account))
    }

    async fn sign_in_federated(
        &self,
        _provider: application::FederatedProvider,
    ) -> Result<AuthAccount, AuthError> {
        let display_name = self
            .federated_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let account = AuthAccount {
            uid: Self::new_uid("fed_")?,
            email: None,
            display_name,
            is_anonymous: false,
        };
        Ok(self.announce(account))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.current.send_replace(None);
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), AuthError> {
        let current = self.current.borrow().clone();
        let Some(account) = current else {
            return Err(AuthError::NotSignedIn);
        };
        if let Some(email) = &account.email {
            self.accounts().remove(email.as_str());
        }
        self.current.send_replace(None);
        info!(uid = %account.uid, "账户已删除");
        Ok(())
    }

    fn observe(&self) -> SnapshotStream<Option<AuthAccount>> {
        SnapshotStream::new(self.current.subscribe())
    }
}
