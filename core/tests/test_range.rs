// core/tests/test_range.rs
use chrono::NaiveDate;

use fithud_core::range::{filter_by_range, RangeFilter};
use fithud_core::{Cfg, PointEntry, WeekId};

fn w(s: &str) -> WeekId {
    s.parse().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn entries(weeks: &[&str]) -> Vec<PointEntry> {
    weeks
        .iter()
        .map(|s| PointEntry { week_id: w(s), points: 1.0 })
        .collect()
}

fn kept(v: &[PointEntry]) -> Vec<String> {
    v.iter().map(|e| e.week_id.to_string()).collect()
}

#[test]
fn parse_and_defaults() {
    assert_eq!("30d".parse::<RangeFilter>().unwrap(), RangeFilter::Days30);
    assert_eq!("90d".parse::<RangeFilter>().unwrap(), RangeFilter::Days90);
    assert_eq!("1y".parse::<RangeFilter>().unwrap(), RangeFilter::Year);
    assert_eq!("all".parse::<RangeFilter>().unwrap(), RangeFilter::All);
    assert!("7d".parse::<RangeFilter>().is_err());

    assert_eq!(RangeFilter::default(), RangeFilter::Days90);
    assert_eq!(Cfg::default().default_range(), RangeFilter::Days90);
    let cfg = Cfg { reps_per_point: None, default_range: Some("1y".into()) };
    assert_eq!(cfg.default_range(), RangeFilter::Year);
    let bad = Cfg { reps_per_point: None, default_range: Some("week".into()) };
    assert_eq!(bad.default_range(), RangeFilter::Days90);

    assert_eq!(serde_json::to_string(&RangeFilter::Days30).unwrap(), "\"30d\"");
    assert_eq!(RangeFilter::Year.to_string(), "1y");
}

#[test]
fn window_sizes_in_weeks() {
    assert_eq!(RangeFilter::Days30.max_weeks(), Some(4));
    assert_eq!(RangeFilter::Days90.max_weeks(), Some(12));
    assert_eq!(RangeFilter::Year.max_weeks(), Some(52));
    assert_eq!(RangeFilter::All.max_weeks(), None);
}

#[test]
fn thirty_days_keeps_four_weeks_back() {
    // 2025-03-05 ligger i 2025-W10
    let series = entries(&["2025-W05", "2025-W06", "2025-W09", "2025-W10"]);
    let out = filter_by_range(series, RangeFilter::Days30, d(2025, 3, 5)).unwrap();
    assert_eq!(kept(&out), vec!["2025-W06", "2025-W09", "2025-W10"]);
}

#[test]
fn window_spans_year_boundary() {
    // 2025-01-08 ligger i 2025-W02
    let series = entries(&["2024-W40", "2024-W49", "2024-W50", "2025-W01"]);
    let out = filter_by_range(series, RangeFilter::Days30, d(2025, 1, 8)).unwrap();
    assert_eq!(kept(&out), vec!["2024-W50", "2025-W01"]);
}

#[test]
fn window_counts_week_53() {
    // 2021-01-06 ligger i 2021-W01; 2020 har 53 uker
    let series = entries(&["2020-W49", "2020-W50", "2020-W53"]);
    let out = filter_by_range(series, RangeFilter::Days30, d(2021, 1, 6)).unwrap();
    assert_eq!(kept(&out), vec!["2020-W50", "2020-W53"]);
}

#[test]
fn year_and_all() {
    let series = entries(&["2023-W09", "2023-W10", "2024-W10", "2025-W10"]);
    let year = filter_by_range(series.clone(), RangeFilter::Year, d(2024, 3, 6)).unwrap();
    // 2024-03-06 ligger i 2024-W10; 2023 har 52 uker
    assert_eq!(kept(&year), vec!["2023-W10", "2024-W10", "2025-W10"]);

    let all = filter_by_range(series.clone(), RangeFilter::All, d(2024, 3, 6)).unwrap();
    assert_eq!(all.len(), series.len());
}

#[test]
fn filter_works_on_plain_week_ids() {
    let out = filter_by_range(vec![w("2025-W01"), w("2025-W20")], RangeFilter::Days90, d(2025, 5, 14))
        .unwrap();
    // 2025-05-14 ligger i 2025-W20
    assert_eq!(out, vec![w("2025-W20")]);
}
