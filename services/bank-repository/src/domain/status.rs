//! 银行状态

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 银行生命周期状态
///
/// 对外以名称（`"Created"` / `"Active"`）传递，写入存储时使用序号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Created = 0,
    Active = 1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bank status: {0}")]
pub struct ParseStatusError(pub String);

impl Status {
    pub const ALL: [Status; 2] = [Status::Created, Status::Active];

    /// 存储使用的序号
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| i64::from(status.ordinal()) == ordinal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Active => "Active",
        }
    }

    /// 宽松解析存储中的状态值：名称（区分大小写）或序号
    ///
    /// 无法识别时返回 `None`，不视为错误。
    pub fn parse_stored(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(status) = value.parse::<Status>() {
            return Some(status);
        }
        value.parse::<i64>().ok().and_then(Self::from_ordinal)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Status::Created),
            "Active" => Ok(Status::Active),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
