use std::fmt::Write as _;

use crate::types::{HistoryRow, WeekClassification};

fn amount(v: Option<f64>, decimals: usize) -> String {
    v.map(|x| format!("{x:.decimals$}")).unwrap_or_else(|| "-".to_string())
}

/// Tekstrapport av ukehistorikken (nyeste først, som radene kommer).
pub fn render_week_report(name: &str, rows: &[HistoryRow]) -> String {
    let mia = rows
        .iter()
        .filter(|r| r.classification == WeekClassification::Mia)
        .count();

    let mut out = String::new();
    let _ = writeln!(out, "--- Week Report: {name} ---");
    let _ = writeln!(
        out,
        "{:<10} {:>9} {:>11} {:>9} {:>11}  Result",
        "Week", "Goal (km)", "Actual (km)", "Goal Reps", "Actual Reps"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<10} {:>9} {:>11} {:>9} {:>11}  {}",
            r.week_id.to_string(),
            amount(r.goal_distance, 1),
            amount(r.actual_distance, 1),
            amount(r.goal_reps, 0),
            amount(r.actual_reps, 0),
            r.result
        );
    }
    let _ = writeln!(out, "MIA weeks: {mia}");
    out
}

pub fn print_week_report(name: &str, rows: &[HistoryRow]) {
    print!("{}", render_week_report(name, rows));
}
