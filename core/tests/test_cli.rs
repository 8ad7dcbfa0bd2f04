use chrono::NaiveDate;

use fithud_core::cli::render_week_report;
use fithud_core::summary::weekly_history;
use fithud_core::{WeekId, WeeklyRecord};

#[test]
fn test_week_report_lists_rows_and_mia_total() {
    let w = |s: &str| s.parse::<WeekId>().unwrap();
    let records = vec![WeeklyRecord::new(w("2025-W01")).with_goal(10.0, 100.0).with_actual(12.5, 80.0)];
    let today = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
    let rows = weekly_history(&records, w("2024-W51"), today).unwrap();

    let text = render_week_report("Ada", &rows);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "--- Week Report: Ada ---");
    assert!(lines[1].starts_with("Week"));
    // nyeste først: W02, W01, W52, W51
    assert!(lines[2].starts_with("2025-W02") && lines[2].ends_with("Pending"));
    assert!(lines[3].contains("12.5") && lines[3].ends_with("+2.50 km, -20.00 reps"));
    assert!(lines[4].ends_with("MIA"));
    assert_eq!(lines.last(), Some(&"MIA weeks: 2"));
}
