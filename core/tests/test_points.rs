// core/tests/test_points.rs
use fithud_core::points::{
    aggregate_by_week, aggregate_population, points_of, points_with, population_entries, user_points,
    REPS_PER_POINT,
};
use fithud_core::{Cfg, WeekId, WeeklyRecord};

fn w(s: &str) -> WeekId {
    s.parse().unwrap()
}

fn actual(week: &str, distance: f64, reps: f64) -> WeeklyRecord {
    WeeklyRecord::new(w(week)).with_goal(1.0, 1.0).with_actual(distance, reps)
}

#[test]
fn points_formula() {
    assert_eq!(REPS_PER_POINT, 20.0);
    assert!((points_of(&actual("2025-W01", 10.0, 40.0)) - 12.0).abs() < 1e-12);
    assert_eq!(points_of(&WeeklyRecord::new(w("2025-W01"))), 0.0);

    let mut only_reps = WeeklyRecord::new(w("2025-W01"));
    only_reps.actual_reps = Some(50.0);
    assert!((points_of(&only_reps) - 2.5).abs() < 1e-12);
}

#[test]
fn points_ignore_negative_and_non_finite_amounts() {
    let mut rec = WeeklyRecord::new(w("2025-W01"));
    rec.actual_distance = Some(f64::NAN);
    rec.actual_reps = Some(-40.0);
    assert_eq!(points_of(&rec), 0.0);

    rec.actual_distance = Some(f64::INFINITY);
    assert_eq!(points_of(&rec), 0.0);
}

#[test]
fn points_are_monotone_in_distance_and_reps() {
    let steps = [0.0, 0.5, 1.0, 7.5, 20.0, 100.0, 1000.0];
    for pair in steps.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        for other in steps {
            let by_dist = (points_of(&actual("2025-W01", lo, other)), points_of(&actual("2025-W01", hi, other)));
            assert!(by_dist.0 < by_dist.1, "distance {lo} -> {hi}, reps {other}");
            let by_reps = (points_of(&actual("2025-W01", other, lo)), points_of(&actual("2025-W01", other, hi)));
            assert!(by_reps.0 < by_reps.1, "reps {lo} -> {hi}, distance {other}");
        }
    }
}

#[test]
fn custom_divisor_and_invalid_divisor_fallback() {
    let rec = actual("2025-W01", 0.0, 40.0);
    assert!((points_with(&rec, 10.0) - 4.0).abs() < 1e-12);
    assert!((points_with(&rec, 0.0) - 2.0).abs() < 1e-12);
    assert!((points_with(&rec, f64::NAN) - 2.0).abs() < 1e-12);

    let cfg = Cfg {
        reps_per_point: Some(40.0),
        default_range: None,
    };
    assert!((cfg.reps_per_point() - 40.0).abs() < 1e-12);
    assert_eq!(Cfg::default().reps_per_point(), REPS_PER_POINT);
    assert_eq!(
        Cfg { reps_per_point: Some(-1.0), default_range: None }.reps_per_point(),
        REPS_PER_POINT
    );
}

#[test]
fn aggregate_sorts_across_year_boundary() {
    let entries = vec![
        (w("2025-W01"), Some(3.0)),
        (w("2024-W52"), Some(1.0)),
        (w("2025-W01"), Some(5.0)),
        (w("2024-W10"), Some(2.0)),
    ];
    let stats = aggregate_by_week(&entries);
    let weeks: Vec<String> = stats.iter().map(|s| s.week_id.to_string()).collect();
    assert_eq!(weeks, vec!["2024-W10", "2024-W52", "2025-W01"]);
    assert_eq!(stats[2].average_points, Some(4.0));
    assert_eq!(stats[2].contributors, 2);
}

#[test]
fn aggregate_reports_no_data_instead_of_zero() {
    let entries = vec![
        (w("2025-W01"), None),
        (w("2025-W01"), None),
        (w("2025-W02"), Some(0.0)),
        (w("2025-W02"), Some(f64::NAN)),
    ];
    let stats = aggregate_by_week(&entries);
    assert_eq!(stats[0].average_points, None, "ingen aktive");
    assert_eq!(stats[0].contributors, 0);
    assert_eq!(stats[1].average_points, Some(0.0), "alle fikk 0");
    assert_eq!(stats[1].contributors, 1);
}

#[test]
fn population_average_excludes_inactive_users() {
    // 3 brukere i 2025-W01, bare 2 har faktiske tall (5.0 og 7.0)
    let u1 = vec![actual("2025-W01", 5.0, 0.0)];
    let u2 = vec![actual("2025-W01", 6.0, 20.0)];
    let u3 = vec![WeeklyRecord::new(w("2025-W01")).with_goal(10.0, 100.0)];

    let users = [u1.as_slice(), u2.as_slice(), u3.as_slice()];
    let entries = population_entries(users, &Cfg::default());
    assert_eq!(entries.len(), 3);

    let stats = aggregate_population(users, &Cfg::default());
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].week_id, w("2025-W01"));
    assert_eq!(stats[0].contributors, 2);
    assert!((stats[0].average_points.unwrap() - 6.0).abs() < 1e-12);
}

#[test]
fn user_points_are_chronological_and_skip_weeks_without_actuals() {
    let records = vec![
        actual("2025-W02", 4.0, 0.0),
        WeeklyRecord::new(w("2025-W03")).with_goal(5.0, 5.0),
        actual("2024-W52", 2.0, 20.0),
    ];
    let pts = user_points(&records, &Cfg::default());
    let got: Vec<(String, f64)> = pts.iter().map(|p| (p.week_id.to_string(), p.points)).collect();
    assert_eq!(got, vec![("2024-W52".to_string(), 3.0), ("2025-W02".to_string(), 4.0)]);
}

#[test]
fn lenient_json_amounts() {
    let rec: WeeklyRecord = serde_json::from_str(
        r#"{"weekId":"2025-W01","goalDistance":10,"goalReps":"lots","actualDistance":-3,"actualReps":40}"#,
    )
    .unwrap();
    assert_eq!(rec.goal_distance, Some(10.0));
    assert_eq!(rec.goal_reps, None);
    assert_eq!(rec.actual_distance, None);
    assert_eq!(rec.actual_reps, Some(40.0));
    assert!((points_of(&rec) - 2.0).abs() < 1e-12);
}
