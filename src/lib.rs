pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pairing;
pub mod report;
pub mod services;
pub mod store;
pub mod trf;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;
use std::path::Path;
use std::time::Duration;

use crate::cli::{Command, Engine, Format};
use crate::config::AppConfig;
use crate::services::{PredictionRequest, PredictionService};
use crate::store::{SnapshotStore, load_raw_state, load_state, write_json};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_predict(
    input: &Path,
    round: Option<u32>,
    pool: Option<Vec<u32>>,
    engine: Engine,
    format: Format,
    out_dir: Option<&Path>,
    time_budget_ms: Option<u64>,
) -> Result<()> {
    let config = AppConfig::new().with_time_budget(time_budget_ms.map(Duration::from_millis));
    let state = load_state(input)?;
    let service = PredictionService::new(config);

    let request = PredictionRequest {
        round,
        pool,
        engine: engine.into(),
    };
    let report = service.predict(&state, &request)?;

    if let Some(dir) = out_dir {
        let store = SnapshotStore::new(dir)?;
        store.save(&format!("round-{}-prediction", report.target_round), &report)?;
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Table => print!("{}", report::render_table(&report)),
    }
    Ok(())
}

pub fn handle_rewind(input: &Path, round: u32, output: Option<&Path>) -> Result<()> {
    let state = load_state(input)?;
    let service = PredictionService::new(AppConfig::new());
    let rewound = service.rewind(&state, round)?;

    match output {
        Some(path) => {
            write_json(path, &rewound)?;
            info!("  → Written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&rewound)?),
    }
    Ok(())
}

pub fn handle_trf(input: &Path, round: Option<u32>, pool: Option<&[u32]>) -> Result<()> {
    let state = load_state(input)?;
    let service = PredictionService::new(AppConfig::new());
    print!("{}", service.trf(&state, round, pool)?);
    Ok(())
}

pub fn handle_check(input: &Path) -> Result<()> {
    let state = load_raw_state(input)?;
    print!("{}", report::render_issues(&state.history_issues()));
    state.validate()?;
    Ok(())
}
