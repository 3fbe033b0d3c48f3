use anyhow::Result;

use swiss_predictor::cli::Command;
use swiss_predictor::{handle_check, handle_predict, handle_rewind, handle_trf, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Predict {
            input,
            round,
            pool,
            engine,
            format,
            out_dir,
            time_budget_ms,
        } => handle_predict(
            input,
            *round,
            pool.clone(),
            *engine,
            *format,
            out_dir.as_deref(),
            *time_budget_ms,
        ),
        Command::Rewind { input, round, output } => handle_rewind(input, *round, output.as_deref()),
        Command::Trf { input, round, pool } => handle_trf(input, *round, pool.as_deref()),
        Command::Check { input } => handle_check(input),
    }
}
