//! banking-config - 配置加载库
//!
//! 加载顺序：`default.toml` → `{APP_ENV}.toml` → `BANKING_` 前缀环境变量（`__` 分隔层级）

use std::collections::{BTreeMap, HashMap};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "BANKING_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Connection string `{0}` is not configured")]
    MissingConnectionString(String),
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    /// 命名连接字符串，键不区分大小写
    #[serde(default, deserialize_with = "lowercase_keys")]
    pub connection_strings: HashMap<String, Secret<String>>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_name() -> String {
    "bank-repository".to_string()
}

fn default_app_env() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

// figment 的字典按键排序，环境变量产生的小写键排在文件中的混合大小写键之后，
// 因此同名时环境变量覆盖文件。
fn lowercase_keys<'de, D>(deserializer: D) -> Result<HashMap<String, Secret<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Secret<String>>::deserialize(deserializer)?;
    let mut normalized = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        normalized.insert(key.to_ascii_lowercase(), value);
    }
    Ok(normalized)
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let config: Self = Self::figment(config_dir, &env).extract()?;
        Ok(config)
    }

    /// 构建配置源
    pub fn figment(config_dir: &str, env: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 获取命名连接字符串
    ///
    /// 缺失或为空都视为启动期配置错误。
    pub fn connection_string(&self, name: &str) -> Result<&Secret<String>, ConfigError> {
        self.connection_strings
            .get(&name.to_ascii_lowercase())
            .filter(|value| !value.expose_secret().trim().is_empty())
            .ok_or_else(|| ConfigError::MissingConnectionString(name.to_string()))
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
