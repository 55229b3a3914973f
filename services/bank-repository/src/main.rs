//! Bank Repository CLI - 银行仓储命令行入口

use std::process::ExitCode;

use bank_repository::{Bank, BankId, BankRepository, BankingRepository, Status};
use banking_config::AppConfig;
use banking_errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "bank-repository", version, about = "Manage bank records")]
struct Cli {
    /// 配置目录
    #[arg(long, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all banks
    List,
    /// Fetch a bank by id
    Get { id: Uuid },
    /// Create a bank
    Create { name: String, acronym: String },
    /// Change the status of a bank (Created | Active)
    SetStatus { id: Uuid, status: Status },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Get { .. } => "get",
            Command::Create { .. } => "create",
            Command::SetStatus { .. } => "set-status",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.name();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, command, "Command failed");
            let problem = err.to_problem_details().with_instance(command);
            match serde_json::to_string_pretty(&problem) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config =
        AppConfig::load(&cli.config_dir).map_err(|e| AppError::internal(e.to_string()))?;

    if config.is_production() {
        banking_telemetry::init_tracing_json(&config.telemetry.log_level);
    } else {
        banking_telemetry::init_tracing(&config.telemetry.log_level);
    }
    info!(app = %config.app_name, env = %config.app_env, "Starting bank repository");

    let repository = BankingRepository::from_config(&config)?;

    match cli.command {
        Command::List => print_json(&repository.list_banks().await?),
        Command::Get { id } => {
            let id = BankId::from_uuid(id);
            let bank = repository
                .fetch_bank(&id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Bank {} not found", id)))?;
            print_json(&bank)
        }
        Command::Create { name, acronym } => {
            let id = repository.create_bank(&Bank::new(name, acronym)).await?;
            info!("Bank created: {}", id);
            print_json(&json!({ "id": id }))
        }
        Command::SetStatus { id, status } => {
            let id = BankId::from_uuid(id);
            repository.change_bank_status(&id, status).await?;
            print_json(&json!({ "id": id, "status": status }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let body = serde_json::to_string_pretty(value).map_err(|e| AppError::internal(e.to_string()))?;
    println!("{}", body);
    Ok(())
}
