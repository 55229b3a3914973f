use banking_errors::AppError;
use banking_ports::StoreError;
use thiserror::Error;

use crate::domain::{BankId, Status};

/// 仓储错误
///
/// 对外消息是固定文本，存储层原始错误只作为 `source` 保留并写入日志。
#[derive(Debug, Error)]
pub enum BankRepositoryError {
    #[error("Resource already exist")]
    DuplicateResource {
        #[source]
        source: StoreError,
    },

    #[error("Failed to create {acronym}")]
    ResourceCreationFailed { acronym: String },

    #[error("StatusUpdateFailed. Id:{id}, Status:{status}, Message:{message}")]
    ResourceUpdateFailed {
        id: BankId,
        status: Status,
        message: String,
    },

    #[error("An error occured")]
    Store {
        #[source]
        source: StoreError,
    },
}

pub type BankResult<T> = Result<T, BankRepositoryError>;

impl From<BankRepositoryError> for AppError {
    fn from(error: BankRepositoryError) -> Self {
        match error {
            BankRepositoryError::DuplicateResource { .. } => AppError::conflict(error.to_string()),
            _ => AppError::database(error.to_string()),
        }
    }
}
