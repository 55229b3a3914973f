//! banking-ports - 抽象 trait 层
//!
//! 定义存储连接的抽象接口，仓储只通过这些类型与数据库交互

mod command;
mod row;
mod store;

pub use command::*;
pub use row::*;
pub use store::*;
