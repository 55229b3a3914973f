//! StoreConnection trait 定义

use async_trait::async_trait;
use thiserror::Error;

use crate::{StoreCommand, StoreRow};

/// 存储层错误，保留数据库原始错误码（PostgreSQL 下为 SQLSTATE）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store error [{}]: {message}", .code.as_deref().unwrap_or("-"))]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// 无错误码的错误（连接断开、解码失败等）
    pub fn without_code(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn connection_closed() -> Self {
        Self::without_code("connection is not open")
    }
}

/// 单个存储连接
///
/// 连接不支持并发使用：同一时刻只能有一个调用者持有 `&mut self`。
/// 调用方负责在每次操作前 `open`、结束后 `close`。
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait StoreConnection: Send {
    /// 打开连接，已打开时直接返回
    async fn open(&mut self) -> Result<(), StoreError>;

    /// 执行语句并返回全部结果行
    async fn query(&mut self, command: &StoreCommand) -> Result<Vec<StoreRow>, StoreError>;

    /// 执行不返回结果集的语句，返回受影响行数
    async fn execute(&mut self, command: &StoreCommand) -> Result<u64, StoreError>;

    /// 关闭连接，未打开时为空操作
    async fn close(&mut self);
}
