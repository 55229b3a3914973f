//! PostgreSQL 配置模块
//!
//! 单连接模式下的连接参数。SSL 和 search_path 通过 URL 的
//! `sslmode` / `options` 查询参数传入。

use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

/// PostgreSQL 配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// 数据库 URL
    pub url: String,
    /// 应用名称（用于连接标识）
    pub application_name: Option<String>,
    /// 语句缓存大小
    pub statement_cache_size: usize,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            application_name: None,
            statement_cache_size: 100,
        }
    }
}

impl PostgresConfig {
    /// 从 URL 创建配置
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 设置应用名称
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// 解析为 sqlx 连接参数
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let mut options = PgConnectOptions::from_str(&self.url)?
            .statement_cache_capacity(self.statement_cache_size);

        if let Some(ref app_name) = self.application_name {
            options = options.application_name(app_name);
        }

        Ok(options)
    }
}
