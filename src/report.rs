use colored::Colorize;
use std::fmt::Write;

use crate::domain::HistoryIssue;
use crate::pairing::PlayerSummary;
use crate::services::PredictionReport;

const NAME_WIDTH: usize = 28;

/// Human readable pairing table
pub fn render_table(report: &PredictionReport) -> String {
    let prediction = &report.prediction;
    let mut out = String::new();

    let title = format!(
        "{} - round {} ({} engine{})",
        report.tournament.name,
        report.target_round,
        report.engine,
        if report.replayed { ", replay" } else { "" }
    );
    let _ = writeln!(out, "{}", title.bold());
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:>5}  {:>4} {:<NAME_WIDTH$} {:>5}    {:>4} {:<NAME_WIDTH$} {:>5}",
            "Board", "No", "White", "Pts", "No", "Black", "Pts"
        )
        .underline()
    );

    for pairing in &prediction.pairings {
        let _ = writeln!(
            out,
            "{:>5}  {}  -  {}",
            pairing.board,
            player_cell(&pairing.white),
            player_cell(&pairing.black)
        );
    }

    if let Some(bye) = &prediction.bye {
        let _ = writeln!(out, "{} {} {}", "Bye:".yellow(), bye.player_no, bye.player_name);
    }
    if !prediction.unpaired.is_empty() {
        let names: Vec<String> = prediction
            .unpaired
            .iter()
            .map(|p| format!("{} {}", p.start_no, p.name))
            .collect();
        let _ = writeln!(out, "{} {}", "Unpaired:".red().bold(), names.join(", "));
    }
    out
}

fn player_cell(player: &PlayerSummary) -> String {
    let name: String = player.name.chars().take(NAME_WIDTH).collect();
    format!("{:>4} {:<NAME_WIDTH$} {:>5}", player.start_no, name, player.score.to_string())
}

/// Listing for the `check` command
pub fn render_issues(issues: &[HistoryIssue]) -> String {
    if issues.is_empty() {
        return format!("{}\n", "History is consistent".green());
    }
    let mut out = format!("{}\n", format!("{} inconsistent history entries", issues.len()).red().bold());
    for issue in issues {
        let _ = writeln!(out, "  {issue}");
    }
    out
}
