//! 存储语句与参数值

use uuid::Uuid;

/// 存储层的标量值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    Null,
    Uuid(Uuid),
    Text(String),
    Int(i32),
    BigInt(i64),
}

impl StoreValue {
    /// 读取 UUID，文本值会尝试解析
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(value) => Some(*value),
            Self::Text(value) => Uuid::parse_str(value.trim()).ok(),
            _ => None,
        }
    }

    /// 转为文本表示，`Null` 返回 `None`
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Uuid(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
            Self::Int(value) => Some(value.to_string()),
            Self::BigInt(value) => Some(value.to_string()),
        }
    }
}

impl From<Uuid> for StoreValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for StoreValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl<T: Into<StoreValue>> From<Option<T>> for StoreValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// 语句类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// 原始 SQL 文本
    Text,
    /// 存储过程 / 函数，`text` 为其名称
    Procedure,
}

/// 命名参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreParam {
    pub name: String,
    pub value: StoreValue,
}

/// 参数化语句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCommand {
    pub kind: CommandKind,
    pub text: String,
    pub params: Vec<StoreParam>,
}

impl StoreCommand {
    /// 原始 SQL 语句
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Text,
            text: sql.into(),
            params: Vec::new(),
        }
    }

    /// 存储过程调用
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Procedure,
            text: name.into(),
            params: Vec::new(),
        }
    }

    /// 追加命名参数，顺序即绑定顺序
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<StoreValue>) -> Self {
        self.params.push(StoreParam {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// 按名称查找参数
    pub fn param(&self, name: &str) -> Option<&StoreValue> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }

    pub fn is_procedure(&self, name: &str) -> bool {
        self.kind == CommandKind::Procedure && self.text == name
    }
}
