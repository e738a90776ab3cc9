//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `stockroom_core` wiring: config, logging, database bootstrap.
//! - Run one named gateway operation and print its JSON result.
//!
//! Usage: `stockroom_cli [<operation> [<json-args>]]`. Without an operation
//! the registered operation names are listed.

use log::info;
use serde_json::Value;
use std::error::Error;
use std::process::ExitCode;
use stockroom_core::db::open_db_from_config;
use stockroom_core::{
    core_version, init_logging_from_config, registry, Config, OperationGateway, SqliteStore,
};

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stockroom_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    init_logging_from_config(&config.logging)?;
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let Some(operation) = args.first() else {
        println!("stockroom_core version={}", core_version());
        for spec in registry().operations() {
            println!("{}", spec.name);
        }
        return Ok(());
    };

    let operation_args: Value = match args.get(1) {
        Some(raw) => serde_json::from_str(raw)?,
        None => Value::Null,
    };

    let conn = open_db_from_config(&config.database)?;
    let gateway = OperationGateway::new(SqliteStore::try_new(&conn)?);
    let output = gateway.execute(operation, &operation_args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
