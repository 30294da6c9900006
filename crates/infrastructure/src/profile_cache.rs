//! 本地档案缓存
//!
//! 本地设备存储中的单键缓存：保存最后一次登录的用户档案，启动时在
//! 认证观察者首次触发之前读取，登出时删除。文件实现对应浏览器里的
//! localStorage 单键；内存实现用于测试。

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::warn;

use application::{ProfileCache, StoreError};
use domain::UserProfile;

/// 把档案存成一个 JSON 文件的缓存实现。
pub struct JsonFileProfileCache {
    path: PathBuf,
}

impl JsonFileProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileCache for JsonFileProfileCache {
    async fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Backend(err.to_string())),
        };
        match serde_json::from_slice(&bytes) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                // 损坏的缓存按"没有缓存"降级处理
                warn!(path = %self.path.display(), error = %err, "本地档案缓存无法解析");
                Ok(None)
            }
        }
    }

    async fn store(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(profile)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::Backend(err.to_string()))?;
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Backend(err.to_string())),
        }
    }
}

/// 测试用的内存缓存实现。
#[derive(Default)]
pub struct MemoryProfileCache {
    slot: Mutex<Option<UserProfile>>,
}

impl MemoryProfileCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileCache for MemoryProfileCache {
    async fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn store(&self, profile: &UserProfile) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(profile.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
