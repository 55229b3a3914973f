//! 内存存储连接，模拟 banks 表和三个存储过程

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use banking_ports::{CommandKind, StoreCommand, StoreConnection, StoreError, StoreRow, StoreValue};
use uuid::Uuid;

struct StoredBank {
    id: StoreValue,
    name: String,
    acronym: String,
    status: StoreValue,
}

impl StoredBank {
    fn to_row(&self) -> StoreRow {
        StoreRow::new()
            .with("id", self.id.clone())
            .with("name", self.name.as_str())
            .with("acronym", self.acronym.as_str())
            .with("status", self.status.clone())
    }
}

/// create_bank 的异常返回
#[derive(Clone, Copy)]
enum CreateAnomaly {
    NilId,
    NullId,
    NoRow,
}

#[derive(Default)]
struct State {
    banks: Vec<StoredBank>,
    open: bool,
    opens: usize,
    closes: usize,
    active: usize,
    max_active: usize,
    fail_next_open: Option<StoreError>,
    fail_next_statement: Option<StoreError>,
    create_anomaly: Option<CreateAnomaly>,
    commands: Vec<StoreCommand>,
}

/// 可克隆的内存连接，克隆共享同一份状态
#[derive(Clone, Default)]
pub struct InMemoryStoreConnection {
    state: Arc<Mutex<State>>,
}

impl InMemoryStoreConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绕过存储过程直接写入一行
    pub fn insert_raw(
        &self,
        id: impl Into<StoreValue>,
        name: &str,
        acronym: &str,
        status: impl Into<StoreValue>,
    ) {
        self.state.lock().unwrap().banks.push(StoredBank {
            id: id.into(),
            name: name.to_string(),
            acronym: acronym.to_string(),
            status: status.into(),
        });
    }

    pub fn fail_next_open(&self, error: StoreError) {
        self.state.lock().unwrap().fail_next_open = Some(error);
    }

    pub fn fail_next_statement(&self, error: StoreError) {
        self.state.lock().unwrap().fail_next_statement = Some(error);
    }

    /// create_bank 返回全零 ID
    pub fn return_nil_ids(&self) {
        self.state.lock().unwrap().create_anomaly = Some(CreateAnomaly::NilId);
    }

    /// create_bank 返回 NULL ID
    pub fn return_null_ids(&self) {
        self.state.lock().unwrap().create_anomaly = Some(CreateAnomaly::NullId);
    }

    /// create_bank 不返回任何行
    pub fn return_no_rows(&self) {
        self.state.lock().unwrap().create_anomaly = Some(CreateAnomaly::NoRow);
    }

    pub fn opens(&self) -> usize {
        self.state.lock().unwrap().opens
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    /// 同时处于打开状态的操作数峰值
    pub fn max_concurrent(&self) -> usize {
        self.state.lock().unwrap().max_active
    }

    pub fn bank_count(&self) -> usize {
        self.state.lock().unwrap().banks.len()
    }

    pub fn commands(&self) -> Vec<StoreCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    fn begin_statement(state: &mut State, command: &StoreCommand) -> Result<(), StoreError> {
        if !state.open {
            return Err(StoreError::connection_closed());
        }
        state.commands.push(command.clone());
        match state.fail_next_statement.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn uuid_param(command: &StoreCommand, name: &str) -> Result<Uuid, StoreError> {
    command
        .param(name)
        .and_then(StoreValue::as_uuid)
        .ok_or_else(|| StoreError::new("22023", format!("missing uuid parameter `{}`", name)))
}

fn text_param(command: &StoreCommand, name: &str) -> Result<String, StoreError> {
    command
        .param(name)
        .and_then(StoreValue::to_text)
        .ok_or_else(|| StoreError::new("22023", format!("missing text parameter `{}`", name)))
}

fn undefined(command: &StoreCommand) -> StoreError {
    StoreError::new("42883", format!("{} does not exist", command.text))
}

#[async_trait]
impl StoreConnection for InMemoryStoreConnection {
    async fn open(&mut self) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.opens += 1;
        if let Some(error) = state.fail_next_open.take() {
            return Err(error);
        }
        state.open = true;
        state.active += 1;
        state.max_active = state.max_active.max(state.active);
        Ok(())
    }

    async fn query(&mut self, command: &StoreCommand) -> Result<Vec<StoreRow>, StoreError> {
        // 给其它任务插入执行的机会
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        Self::begin_statement(&mut state, command)?;

        match command.kind {
            CommandKind::Text if command.text.trim_start().starts_with("SELECT") => {
                Ok(state.banks.iter().map(StoredBank::to_row).collect())
            }
            CommandKind::Procedure if command.text == "get_bank" => {
                let id = uuid_param(command, "id")?;
                Ok(state
                    .banks
                    .iter()
                    .filter(|bank| bank.id.as_uuid() == Some(id))
                    .map(StoredBank::to_row)
                    .collect())
            }
            CommandKind::Procedure if command.text == "create_bank" => {
                let acronym = text_param(command, "acronym")?;
                let name = text_param(command, "name")?;
                if state.banks.iter().any(|bank| bank.acronym == acronym) {
                    return Err(StoreError::new(
                        "23505",
                        "duplicate key value violates unique constraint \"uq_banks_acronym\"",
                    ));
                }
                let id = match state.create_anomaly {
                    Some(CreateAnomaly::NoRow) => return Ok(Vec::new()),
                    Some(CreateAnomaly::NullId) => StoreValue::Null,
                    Some(CreateAnomaly::NilId) => StoreValue::Uuid(Uuid::nil()),
                    None => StoreValue::Uuid(Uuid::new_v4()),
                };
                state.banks.push(StoredBank {
                    id: id.clone(),
                    name,
                    acronym,
                    status: StoreValue::Int(0),
                });
                Ok(vec![StoreRow::new().with("id", id)])
            }
            _ => Err(undefined(command)),
        }
    }

    async fn execute(&mut self, command: &StoreCommand) -> Result<u64, StoreError> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        Self::begin_statement(&mut state, command)?;

        if !command.is_procedure("change_bank_status") {
            return Err(undefined(command));
        }

        let id = uuid_param(command, "id")?;
        let status = command
            .param("status")
            .cloned()
            .unwrap_or(StoreValue::Null);
        let mut affected = 0;
        for bank in state.banks.iter_mut().filter(|bank| bank.id.as_uuid() == Some(id)) {
            bank.status = status.clone();
            affected += 1;
        }
        Ok(affected)
    }

    async fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        if state.open {
            state.open = false;
            state.active -= 1;
        }
    }
}
