//! 存储错误映射工具
//!
//! 仓储中唯一检查数据库错误码的地方

use banking_ports::StoreError;
use tracing::warn;

use crate::error::BankRepositoryError;

/// PostgreSQL 唯一约束违规 (unique_violation)
pub const UNIQUE_VIOLATION: &str = "23505";

/// 将存储错误转换为领域错误
///
/// 结果总是错误：唯一约束冲突映射为 `DuplicateResource`，其余映射为 `Store`。
/// 不写日志，由调用方决定如何记录。
pub fn classify_store_error(error: StoreError) -> BankRepositoryError {
    if error.code.as_deref() == Some(UNIQUE_VIOLATION) {
        BankRepositoryError::DuplicateResource { source: error }
    } else {
        BankRepositoryError::Store { source: error }
    }
}

/// 同 [`classify_store_error`]，通用失败额外记录一条 `warn`
pub fn translate_store_error(error: StoreError) -> BankRepositoryError {
    let translated = classify_store_error(error);
    if let BankRepositoryError::Store { source } = &translated {
        warn!(
            code = source.code.as_deref().unwrap_or("-"),
            message = %source.message,
            "Store operation failed"
        );
    }
    translated
}
