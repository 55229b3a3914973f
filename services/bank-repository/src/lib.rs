//! bank-repository - 银行数据访问层
//!
//! 对银行记录提供列表、查询、创建和状态变更四个操作，
//! 存储失败统一翻译为 [`BankRepositoryError`]

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::*;
pub use error::*;
pub use infrastructure::persistence::{BANK_DB_CONNECTION, BankingRepository};
