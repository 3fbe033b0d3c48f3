use std::path::PathBuf;
use std::time::Duration;

/// Weights and search bounds of the Dutch pairing engine
#[derive(Debug, Clone)]
pub struct PairingSettings {
    /// Penalty per pair of players who already met
    pub repeat_penalty: u64,
    pub absolute_color_weight: u64,
    pub strong_color_weight: u64,
    pub mild_color_weight: u64,
    /// Largest half size searched exhaustively
    pub exhaustive_limit: usize,
    pub max_permutations: usize,
    pub max_combinations: usize,
    pub heterogeneous_max_floaters: usize,
    pub heterogeneous_max_natives: usize,
    pub heterogeneous_extra_natives: usize,
    /// At most this many bottom players are tried as downfloaters, never
    /// reaching above the lower half of the bracket
    pub downfloat_window: usize,
    pub downfloat_current_weight: u64,
    pub lookahead_color_weight: u64,
    pub lookahead_no_partner_penalty: u64,
    /// Swap passes per paired position in the local search
    pub swap_passes_factor: usize,
    pub time_budget: Option<Duration>,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            repeat_penalty: 10_000,
            absolute_color_weight: 100,
            strong_color_weight: 10,
            mild_color_weight: 1,
            exhaustive_limit: 8,
            max_permutations: 40_320, // 8!
            max_combinations: 200,
            heterogeneous_max_floaters: 3,
            heterogeneous_max_natives: 8,
            heterogeneous_extra_natives: 6,
            downfloat_window: 6,
            downfloat_current_weight: 100,
            lookahead_color_weight: 10,
            lookahead_no_partner_penalty: 100,
            swap_passes_factor: 3,
            time_budget: None,
        }
    }
}

/// Command line of the external rules engine fed with TRF files
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub program: String,
    pub jar_path: PathBuf,
    pub extra_args: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            jar_path: PathBuf::from("vendor/javafo.jar"),
            extra_args: vec!["-p".to_string()],
        }
    }
}

impl EngineSettings {
    /// Defaults overridden by `SWISS_ENGINE_JAVA` and `SWISS_ENGINE_JAR`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            program: std::env::var("SWISS_ENGINE_JAVA").unwrap_or(defaults.program),
            jar_path: std::env::var("SWISS_ENGINE_JAR")
                .map(PathBuf::from)
                .unwrap_or(defaults.jar_path),
            extra_args: defaults.extra_args,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub pairing: PairingSettings,
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            pairing: PairingSettings::default(),
            engine: EngineSettings::from_env(),
        }
    }

    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.pairing.time_budget = budget;
        self
    }
}
