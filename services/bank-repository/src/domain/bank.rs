//! 银行实体

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Status;

/// 银行 ID，由存储在创建时分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct BankId(pub Uuid);

impl BankId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// 是否为空 ID（全零）
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

/// 创建银行的输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub acronym: String,
}

impl Bank {
    pub fn new(name: impl Into<String>, acronym: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            acronym: acronym.into(),
        }
    }
}

/// 读取到的银行信息
///
/// `status` 为 `None` 表示存储中的值无法识别为已知状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInformation {
    pub id: BankId,
    pub name: String,
    pub acronym: String,
    pub status: Option<Status>,
}
