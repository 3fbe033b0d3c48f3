pub mod prediction;

pub use prediction::{
    EngineKind, HistoryEntry, PlayerDetail, PredictionReport, PredictionRequest, PredictionService, Standing,
};
