use log::{debug, info};
use std::borrow::Cow;
use std::io::Write;
use std::process::Command;

use crate::config::EngineSettings;
use crate::domain::{Player, TournamentState, rewind_to_round};
use crate::errors::PredictionError;
use crate::pairing::{ByeRecord, PairingEngine, PairingRequest, PlayerSummary, PredictedPairing, Prediction};

use super::TrfWriter;

/// Delegates pairing to an external program reading TRF16 files
#[derive(Debug, Clone, Default)]
pub struct ExternalPairer {
    settings: EngineSettings,
}

impl ExternalPairer {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    fn run(&self, trf: &str) -> Result<String, PredictionError> {
        let mut file = tempfile::Builder::new().prefix("trf").suffix(".trf").tempfile()?;
        file.write_all(trf.as_bytes())?;
        file.flush()?;

        debug!(
            "Running {} -jar {} {}",
            self.settings.program,
            self.settings.jar_path.display(),
            file.path().display()
        );
        let output = Command::new(&self.settings.program)
            .arg("-jar")
            .arg(&self.settings.jar_path)
            .arg(file.path())
            .args(&self.settings.extra_args)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PredictionError::EngineFailed {
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

impl PairingEngine for ExternalPairer {
    fn name(&self) -> &'static str {
        "external"
    }

    fn predict(&self, request: &PairingRequest<'_>) -> Result<Prediction, PredictionError> {
        if request.target_round == 0 {
            return Err(PredictionError::InvalidRound {
                round: 0,
                total: request.state.tournament.total_rounds,
            });
        }
        let trf = TrfWriter::new(request.state, request.target_round, request.pool).render();
        let output = self.run(&trf)?;

        // summaries carry the scores as they stood before the target round
        let view = if request.target_round == request.state.tournament.next_round() {
            Cow::Borrowed(request.state)
        } else {
            Cow::Owned(rewind_to_round(request.state, request.target_round)?)
        };
        let prediction = parse_output(&output, &view, request.target_round)?;
        info!(
            "External engine paired round {} on {} boards",
            prediction.next_round,
            prediction.pairings.len()
        );
        Ok(prediction)
    }
}

/// Read the pairing list: a pair count, then `white black` per line with `0`
/// standing for the bye. Boards are numbered in output order.
pub fn parse_output(output: &str, state: &TournamentState, next_round: u32) -> Result<Prediction, PredictionError> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next().ok_or(PredictionError::EngineNoOutput)?;
    let count: usize = header
        .parse()
        .map_err(|_| PredictionError::EngineOutput(format!("expected a pair count, got {header:?}")))?;

    let mut prediction = Prediction {
        next_round,
        pairings: Vec::with_capacity(count),
        bye: None,
        unpaired: Vec::new(),
    };

    for line in lines.take(count) {
        let numbers: Vec<u32> = line
            .split_whitespace()
            .take(2)
            .map(|n| {
                n.parse()
                    .map_err(|_| PredictionError::EngineOutput(format!("bad pairing line {line:?}")))
            })
            .collect::<Result<_, _>>()?;
        let &[white, black] = numbers.as_slice() else {
            continue;
        };

        if white == 0 || black == 0 {
            let player = lookup(state, white.max(black))?;
            prediction.bye = Some(ByeRecord::from(player));
            continue;
        }

        prediction.pairings.push(PredictedPairing {
            board: prediction.pairings.len() as u32 + 1,
            white: PlayerSummary::from(lookup(state, white)?),
            black: PlayerSummary::from(lookup(state, black)?),
        });
    }

    Ok(prediction)
}

fn lookup(state: &TournamentState, start_no: u32) -> Result<&Player, PredictionError> {
    state
        .player(start_no)
        .ok_or_else(|| PredictionError::EngineOutput(format!("unknown player {start_no}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TournamentInfo;

    fn state() -> TournamentState {
        let roster = (1..=5).map(|no| Player::new(no, format!("P{no}"), 1800));
        TournamentState::from_rounds(TournamentInfo::new("Open", 0, 5), roster, Vec::new())
    }

    #[test]
    fn pairs_and_bye_are_read_in_order() {
        let state = state();
        let prediction = parse_output("3\n4 1\n2 5\n3 0\n", &state, 1).unwrap();

        assert_eq!(prediction.pairings.len(), 2);
        assert_eq!(prediction.pairings[0].board, 1);
        assert_eq!(prediction.pairings[0].white.start_no, 4);
        assert_eq!(prediction.pairings[1].black.start_no, 5);
        assert_eq!(prediction.bye.map(|b| b.player_no), Some(3));
    }

    #[test]
    fn empty_output_is_an_error() {
        let err = parse_output("  \n\n", &state(), 1).unwrap_err();
        assert!(matches!(err, PredictionError::EngineNoOutput));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_output("two\n", &state(), 1),
            Err(PredictionError::EngineOutput(_))
        ));
        assert!(matches!(
            parse_output("1\n1 x\n", &state(), 1),
            Err(PredictionError::EngineOutput(_))
        ));
        assert!(matches!(
            parse_output("1\n1 9\n", &state(), 1),
            Err(PredictionError::EngineOutput(_))
        ));
    }

    #[test]
    fn failing_program_reports_exit_code() {
        let pairer = ExternalPairer::new(EngineSettings {
            program: "false".to_string(),
            ..EngineSettings::default()
        });
        let state = state();
        let err = pairer.predict(&PairingRequest::next_round(&state)).unwrap_err();
        assert!(matches!(err, PredictionError::EngineFailed { .. } | PredictionError::Io(_)));
    }
}
