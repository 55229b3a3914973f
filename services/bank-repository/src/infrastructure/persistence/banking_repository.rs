use async_trait::async_trait;
use banking_adapter_postgres::{PgStoreConnection, PostgresConfig};
use banking_config::AppConfig;
use banking_errors::{AppError, AppResult};
use banking_ports::{StoreCommand, StoreConnection, StoreError, StoreRow, StoreValue};
use secrecy::ExposeSecret;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, warn};

use super::error_mapper::{classify_store_error, translate_store_error};
use crate::domain::{Bank, BankId, BankInformation, BankRepository, Status};
use crate::error::{BankRepositoryError, BankResult};

/// 连接字符串配置键
pub const BANK_DB_CONNECTION: &str = "BankDB";

pub const LIST_BANKS_SQL: &str = "SELECT id, name, acronym, status FROM banks";
pub const GET_BANK_PROCEDURE: &str = "get_bank";
pub const CREATE_BANK_PROCEDURE: &str = "create_bank";
pub const CHANGE_BANK_STATUS_PROCEDURE: &str = "change_bank_status";

/// 银行仓储
///
/// 整个生命周期只持有一个连接，每个操作都在锁内完成 打开 → 执行 → 关闭，
/// 并发调用会被串行化。关闭在所有退出路径上执行，包括打开失败；
/// 调用在打开后被取消时，由下一个调用在打开前补上关闭。
pub struct BankingRepository<C> {
    connection: Mutex<ScopedConnection<C>>,
}

struct ScopedConnection<C> {
    inner: C,
    /// 已调用 open 但尚未 close
    in_use: bool,
}

impl BankingRepository<PgStoreConnection> {
    /// 从应用配置创建，`BankDB` 连接字符串缺失时立即失败
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let url = config
            .connection_string(BANK_DB_CONNECTION)
            .map_err(|e| AppError::internal(e.to_string()))?;

        let postgres = PostgresConfig::new(url.expose_secret().as_str())
            .with_application_name(config.app_name.as_str());

        Ok(Self::new(PgStoreConnection::new(&postgres)?))
    }
}

impl<C: StoreConnection> BankingRepository<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection: Mutex::new(ScopedConnection {
                inner: connection,
                in_use: false,
            }),
        }
    }

    /// 加锁并关闭被取消的调用遗留的连接
    async fn acquire(&self) -> MutexGuard<'_, ScopedConnection<C>> {
        let mut scoped = self.connection.lock().await;
        if scoped.in_use {
            warn!("Closing connection left open by a cancelled call");
            scoped.inner.close().await;
            scoped.in_use = false;
        }
        scoped
    }

    async fn query_scoped(&self, command: &StoreCommand) -> Result<Vec<StoreRow>, StoreError> {
        let mut scoped = self.acquire().await;
        scoped.in_use = true;
        let result = match scoped.inner.open().await {
            Ok(()) => scoped.inner.query(command).await,
            Err(e) => Err(e),
        };
        scoped.inner.close().await;
        scoped.in_use = false;
        result
    }

    async fn execute_scoped(&self, command: &StoreCommand) -> Result<u64, StoreError> {
        let mut scoped = self.acquire().await;
        scoped.in_use = true;
        let result = match scoped.inner.open().await {
            Ok(()) => scoped.inner.execute(command).await,
            Err(e) => Err(e),
        };
        scoped.inner.close().await;
        scoped.in_use = false;
        result
    }
}

#[async_trait]
impl<C: StoreConnection> BankRepository for BankingRepository<C> {
    async fn list_banks(&self) -> BankResult<Vec<BankInformation>> {
        debug!("Listing banks");

        let rows = self
            .query_scoped(&StoreCommand::text(LIST_BANKS_SQL))
            .await
            .map_err(translate_store_error)?;

        // 行映射失败已在 map_bank_row 中记录
        rows.iter()
            .map(map_bank_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(classify_store_error)
    }

    async fn fetch_bank(&self, id: &BankId) -> BankResult<Option<BankInformation>> {
        debug!("Fetching bank by id: {}", id);

        let command = StoreCommand::procedure(GET_BANK_PROCEDURE).with_param("id", id.as_uuid());
        let rows = self
            .query_scoped(&command)
            .await
            .map_err(translate_store_error)?;

        rows.first()
            .map(map_bank_row)
            .transpose()
            .map_err(classify_store_error)
    }

    async fn create_bank(&self, bank: &Bank) -> BankResult<BankId> {
        debug!("Creating bank: {}", bank.acronym);

        let command = StoreCommand::procedure(CREATE_BANK_PROCEDURE)
            .with_param("acronym", bank.acronym.as_str())
            .with_param("name", bank.name.as_str());

        // 创建失败只在这里记录一次
        let rows = self.query_scoped(&command).await.map_err(|e| {
            error!(
                code = e.code.as_deref().unwrap_or("-"),
                message = %e.message,
                "Failed to create bank {}",
                bank.acronym
            );
            classify_store_error(e)
        })?;

        rows.first()
            .and_then(|row| row.get("Id"))
            .and_then(StoreValue::as_uuid)
            .map(BankId::from_uuid)
            .filter(|id| !id.is_nil())
            .ok_or_else(|| BankRepositoryError::ResourceCreationFailed {
                acronym: bank.acronym.clone(),
            })
    }

    async fn change_bank_status(&self, id: &BankId, status: Status) -> BankResult<()> {
        debug!("Changing status of bank {} to {}", id, status);

        let command = StoreCommand::procedure(CHANGE_BANK_STATUS_PROCEDURE)
            .with_param("id", id.as_uuid())
            .with_param("status", status.ordinal());

        self.execute_scoped(&command)
            .await
            .map_err(|e| BankRepositoryError::ResourceUpdateFailed {
                id: *id,
                status,
                message: e.message,
            })?;

        Ok(())
    }
}

fn map_bank_row(row: &StoreRow) -> Result<BankInformation, StoreError> {
    let id = row
        .get("Id")
        .and_then(StoreValue::as_uuid)
        .ok_or_else(|| {
            error!(row = ?row, "Bank row has a malformed id");
            StoreError::without_code("bank row has a malformed id")
        })?;

    Ok(BankInformation {
        id: BankId::from_uuid(id),
        name: text_column(row, "Name"),
        acronym: text_column(row, "Acronym"),
        status: row.get("Status").and_then(parse_status),
    })
}

fn text_column(row: &StoreRow, column: &str) -> String {
    row.get(column)
        .and_then(StoreValue::to_text)
        .unwrap_or_default()
}

// 未知状态返回 None，不让整行失败
fn parse_status(value: &StoreValue) -> Option<Status> {
    match value {
        StoreValue::Int(ordinal) => Status::from_ordinal(i64::from(*ordinal)),
        StoreValue::BigInt(ordinal) => Status::from_ordinal(*ordinal),
        other => other.to_text().as_deref().and_then(Status::parse_stored),
    }
}
