use std::collections::BTreeMap;

use crate::mia::index_records;
use crate::models::WeeklyRecord;
use crate::types::{Cfg, PointEntry, WeekStat};
use crate::week::WeekId;

/// Reps per distanse-ekvivalent poeng.
pub const REPS_PER_POINT: f64 = 20.0;

/// Poeng = faktisk distanse + faktiske reps / 20 (manglende teller som 0).
pub fn points_of(record: &WeeklyRecord) -> f64 {
    points_with(record, REPS_PER_POINT)
}

/// Som `points_of`, med egen normaliseringsdivisor. Ugyldig divisor → standard.
pub fn points_with(record: &WeeklyRecord, reps_per_point: f64) -> f64 {
    let div = if reps_per_point.is_finite() && reps_per_point > 0.0 {
        reps_per_point
    } else {
        REPS_PER_POINT
    };
    record.actual_distance().unwrap_or(0.0) + record.actual_reps().unwrap_or(0.0) / div
}

/// Grupper på uke og ta snitt. `None`-poeng (bruker uten faktiske tall)
/// teller verken i sum eller antall. Uke uten bidragsytere → `average_points = None`.
/// Sortert kronologisk på (år, uke).
pub fn aggregate_by_week(entries: &[(WeekId, Option<f64>)]) -> Vec<WeekStat> {
    let mut by_week: BTreeMap<WeekId, (f64, usize)> = BTreeMap::new();

    for (week, points) in entries {
        let slot = by_week.entry(*week).or_insert((0.0, 0));
        match points {
            Some(p) if p.is_finite() => {
                slot.0 += p;
                slot.1 += 1;
            }
            Some(p) => log::warn!("ignoring non-finite points {p} in {week}"),
            None => {}
        }
    }

    by_week
        .into_iter()
        .map(|(week_id, (sum, n))| WeekStat {
            week_id,
            average_points: if n == 0 { None } else { Some(sum / n as f64) },
            contributors: n,
        })
        .collect()
}

/// Én oppføring per bruker per uke: `Some(poeng)` hvis brukeren har faktiske tall.
pub fn population_entries<'a, I>(users: I, cfg: &Cfg) -> Vec<(WeekId, Option<f64>)>
where
    I: IntoIterator<Item = &'a [WeeklyRecord]>,
{
    let div = cfg.reps_per_point();
    let mut out = Vec::new();
    for records in users {
        for (week, rec) in index_records(records) {
            let points = rec.has_any_actual().then(|| points_with(rec, div));
            out.push((week, points));
        }
    }
    out
}

/// Lag-/globalkurve: snitt per uke over en populasjon.
pub fn aggregate_population<'a, I>(users: I, cfg: &Cfg) -> Vec<WeekStat>
where
    I: IntoIterator<Item = &'a [WeeklyRecord]>,
{
    aggregate_by_week(&population_entries(users, cfg))
}

/// Poeng per uke for én bruker, kun uker med faktiske tall. Kronologisk.
pub fn user_points(records: &[WeeklyRecord], cfg: &Cfg) -> Vec<PointEntry> {
    let div = cfg.reps_per_point();
    index_records(records)
        .into_iter()
        .filter(|(_, rec)| rec.has_any_actual())
        .map(|(week_id, rec)| PointEntry {
            week_id,
            points: points_with(rec, div),
        })
        .collect()
}
