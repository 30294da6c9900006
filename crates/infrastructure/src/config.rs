//! 应用配置
//!
//! 加载优先级：内置默认值 -> 可选配置文件（`APP_CONFIG_FILE`，按扩展名
//! 识别 toml/yaml/json）-> 环境变量（`APP_*`，`__` 分隔嵌套字段）。

use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::UserEmail;

/// 管理员配置。
///
/// 管理员能力令牌通过比较登录邮箱与该地址签发。这只是客户端提示，
/// 真正的强制执行必须配置在托管后端的访问规则里。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminConfig {
    #[validate(email)]
    pub email: String,
}

/// 本地缓存配置。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CacheConfig {
    /// 单键档案缓存的文件路径。
    #[validate(length(min = 1))]
    pub profile_path: String,
}

/// 聊天行为配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// 私聊场景的用户列表是否排除游客账户。
    #[serde(default = "default_exclude_guests")]
    pub exclude_guests_in_direct: bool,
}

fn default_exclude_guests() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exclude_guests_in_direct: default_exclude_guests(),
        }
    }
}

/// 顶层应用配置。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub admin: AdminConfig,
    #[validate(nested)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig {
                email: "admin@notice.com".into(),
            },
            cache: CacheConfig {
                profile_path: ".local/chat_user.json".into(),
            },
            chat: ChatConfig::default(),
        }
    }
}

impl AppConfig {
    /// 按 默认值 -> 可选文件（APP_CONFIG_FILE）-> 环境变量（APP_*）加载。
    pub fn load() -> anyhow::Result<Self> {
        let mut fig = figment::Figment::new().merge(figment::providers::Serialized::defaults(
            AppConfig::default(),
        ));
        if let Ok(path) = std::env::var("APP_CONFIG_FILE") {
            if path.ends_with(".yml") || path.ends_with(".yaml") {
                fig = fig.merge(Yaml::file(path));
            } else if path.ends_with(".json") {
                fig = fig.merge(Json::file(path));
            } else {
                fig = fig.merge(Toml::file(path));
            }
        }
        fig = fig.merge(Env::prefixed("APP_").split("__"));

        let cfg: AppConfig = fig.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 解析配置的管理员邮箱。
    pub fn admin_email(&self) -> anyhow::Result<UserEmail> {
        Ok(UserEmail::parse(self.admin.email.clone())?)
    }
}
