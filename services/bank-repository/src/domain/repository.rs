//! 银行 Repository trait

use async_trait::async_trait;

use super::{Bank, BankId, BankInformation, Status};
use crate::error::BankResult;

#[async_trait]
pub trait BankRepository: Send + Sync {
    /// 查询全部银行
    async fn list_banks(&self) -> BankResult<Vec<BankInformation>>;

    /// 根据 ID 查找银行，不存在时返回 `None`
    async fn fetch_bank(&self, id: &BankId) -> BankResult<Option<BankInformation>>;

    /// 创建银行，返回存储分配的 ID
    async fn create_bank(&self, bank: &Bank) -> BankResult<BankId>;

    /// 修改银行状态
    ///
    /// ID 不存在时同样视为成功。
    async fn change_bank_status(&self, id: &BankId, status: Status) -> BankResult<()>;
}
