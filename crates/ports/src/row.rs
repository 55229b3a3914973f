//! 原始结果行

use crate::StoreValue;

/// 一行查询结果，列名查找不区分大小写
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRow {
    columns: Vec<(String, StoreValue)>,
}

impl StoreRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一列
    pub fn with(mut self, column: impl Into<String>, value: impl Into<StoreValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<StoreValue>) {
        self.columns.push((column.into(), value.into()));
    }

    /// 按列名取值
    pub fn get(&self, column: &str) -> Option<&StoreValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }
}
