use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::services::EngineKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Swiss-system pairing predictor")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Built-in Dutch system approximation
    Dutch,
    /// External program fed with a TRF file
    External,
}

impl From<Engine> for EngineKind {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Dutch => EngineKind::Dutch,
            Engine::External => EngineKind::External,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Predict the pairings of the next round, or replay an earlier one
    Predict {
        /// Tournament snapshot (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// Round to pair (defaults to the next unplayed round)
        #[arg(short, long)]
        round: Option<u32>,
        /// Comma separated start numbers allowed into the round
        #[arg(long, value_delimiter = ',')]
        pool: Option<Vec<u32>>,
        #[arg(short, long, value_enum, default_value_t = Engine::Dutch)]
        engine: Engine,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Also store the report as JSON in this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Give up when pairing takes longer than this
        #[arg(long)]
        time_budget_ms: Option<u64>,
    },
    /// Reconstruct the tournament as it stood before a round
    Rewind {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        round: u32,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the TRF16 file handed to an external pairing engine
    Trf {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        round: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        pool: Option<Vec<u32>>,
    },
    /// Report inconsistencies in a snapshot's history
    Check {
        #[arg(short, long)]
        input: PathBuf,
    },
}
