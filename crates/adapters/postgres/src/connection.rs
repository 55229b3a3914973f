//! PostgreSQL 单连接实现
//!
//! 存储过程按命名参数调用：
//! - 返回结果集：`SELECT * FROM name(p => $1, ...)`
//! - 不返回结果集：`CALL name(p => $1, ...)`

use async_trait::async_trait;
use banking_errors::{AppError, AppResult};
use banking_ports::{CommandKind, StoreCommand, StoreConnection, StoreError, StoreRow, StoreValue};
use sqlx::postgres::{PgArguments, PgColumn, PgConnectOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, PgConnection, Postgres, Row, TypeInfo};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::PostgresConfig;

/// 语句的结果形态，决定存储过程的调用方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Rows,
    NoRows,
}

/// 基于单个 `PgConnection` 的存储连接
///
/// 连接在 `open` 时建立、`close` 时释放，不在操作之间保持。
pub struct PgStoreConnection {
    options: PgConnectOptions,
    connection: Option<PgConnection>,
}

impl PgStoreConnection {
    pub fn new(config: &PostgresConfig) -> AppResult<Self> {
        let options = config
            .connect_options()
            .map_err(|e| AppError::validation(format!("Invalid database url: {}", e)))?;
        Ok(Self::from_options(options))
    }

    pub fn from_options(options: PgConnectOptions) -> Self {
        Self {
            options,
            connection: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&mut self) -> Result<&mut PgConnection, StoreError> {
        self.connection
            .as_mut()
            .ok_or_else(StoreError::connection_closed)
    }
}

#[async_trait]
impl StoreConnection for PgStoreConnection {
    async fn open(&mut self) -> Result<(), StoreError> {
        if self.connection.is_some() {
            return Ok(());
        }

        debug!(
            host = self.options.get_host(),
            database = self.options.get_database().unwrap_or_default(),
            "Opening database connection"
        );
        let connection = PgConnection::connect_with(&self.options)
            .await
            .map_err(map_sqlx_error)?;
        self.connection = Some(connection);
        Ok(())
    }

    async fn query(&mut self, command: &StoreCommand) -> Result<Vec<StoreRow>, StoreError> {
        let sql = render_sql(command, Shape::Rows)?;
        let connection = self.connection()?;

        let rows = bind_params(sqlx::query(&sql), command)
            .fetch_all(&mut *connection)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&mut self, command: &StoreCommand) -> Result<u64, StoreError> {
        let sql = render_sql(command, Shape::NoRows)?;
        let connection = self.connection()?;

        let result = bind_params(sqlx::query(&sql), command)
            .execute(&mut *connection)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close().await {
                warn!(error = %e, "Failed to close database connection cleanly");
            }
        }
    }
}

/// 将 sqlx 错误转换为存储错误，数据库错误保留 SQLSTATE
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => StoreError::new(code.into_owned(), db_err.message()),
            None => StoreError::without_code(db_err.message()),
        },
        other => StoreError::without_code(other.to_string()),
    }
}

fn render_sql(command: &StoreCommand, shape: Shape) -> Result<String, StoreError> {
    match command.kind {
        CommandKind::Text => Ok(command.text.clone()),
        CommandKind::Procedure => {
            if !is_identifier(&command.text, true) {
                return Err(StoreError::without_code(format!(
                    "invalid procedure name `{}`",
                    command.text
                )));
            }

            let mut args = Vec::with_capacity(command.params.len());
            for (index, param) in command.params.iter().enumerate() {
                if !is_identifier(&param.name, false) {
                    return Err(StoreError::without_code(format!(
                        "invalid parameter name `{}`",
                        param.name
                    )));
                }
                args.push(format!("{} => ${}", param.name, index + 1));
            }

            let call = format!("{}({})", command.text, args.join(", "));
            Ok(match shape {
                Shape::Rows => format!("SELECT * FROM {}", call),
                Shape::NoRows => format!("CALL {}", call),
            })
        }
    }
}

// 允许 schema 限定名（`banking.get_bank`）
fn is_identifier(value: &str, allow_qualified: bool) -> bool {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    if allow_qualified {
        let parts: Vec<&str> = value.split('.').collect();
        parts.len() <= 2 && parts.iter().all(|part| valid_part(part))
    } else {
        valid_part(value)
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    command: &StoreCommand,
) -> Query<'q, Postgres, PgArguments> {
    for param in &command.params {
        query = match &param.value {
            StoreValue::Null => query.bind(None::<String>),
            StoreValue::Uuid(value) => query.bind(*value),
            StoreValue::Text(value) => query.bind(value.clone()),
            StoreValue::Int(value) => query.bind(*value),
            StoreValue::BigInt(value) => query.bind(*value),
        };
    }
    query
}

fn decode_row(row: &PgRow) -> Result<StoreRow, StoreError> {
    let mut decoded = StoreRow::new();
    for column in row.columns() {
        let value = decode_value(row, column)?;
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn decode_value(row: &PgRow, column: &PgColumn) -> Result<StoreValue, StoreError> {
    let index = column.ordinal();
    let value = match column.type_info().name() {
        "UUID" => row
            .try_get::<Option<Uuid>, _>(index)
            .map_err(map_sqlx_error)?
            .map(StoreValue::Uuid),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .map_err(map_sqlx_error)?
            .map(StoreValue::Text),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map_err(map_sqlx_error)?
            .map(|v| StoreValue::Int(i32::from(v))),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map_err(map_sqlx_error)?
            .map(StoreValue::Int),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map_err(map_sqlx_error)?
            .map(StoreValue::BigInt),
        other => {
            return Err(StoreError::without_code(format!(
                "unsupported column type `{}` for column `{}`",
                other,
                column.name()
            )));
        }
    };
    Ok(value.unwrap_or(StoreValue::Null))
}
