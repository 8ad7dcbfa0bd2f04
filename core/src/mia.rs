use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::metrics::{
    classified_weeks_total, duplicate_week_records_total, malformed_week_ids_total, METRICS,
};
use crate::models::WeeklyRecord;
use crate::types::{ClassifiedWeek, WeekClassification};
use crate::week::{full_week_range, week_id_of_instant, WeekId};

/// Slår opp poster på uke. Ugyldig uke-id logges, telles og hoppes over.
/// Ved duplikater vinner den første.
pub(crate) fn index_records(records: &[WeeklyRecord]) -> BTreeMap<WeekId, &WeeklyRecord> {
    let mut by_week = BTreeMap::new();
    for rec in records {
        let week = match rec.week() {
            Ok(w) => w,
            Err(e) => {
                log::warn!("skipping weekly record: {e}");
                malformed_week_ids_total(&METRICS).inc();
                continue;
            }
        };
        if by_week.contains_key(&week) {
            log::warn!("duplicate weekly record for {week}, keeping the first");
            duplicate_week_records_total(&METRICS).inc();
            continue;
        }
        by_week.insert(week, rec);
    }
    by_week
}

/// Klassifiser én uke.
///
/// Uker før innmelding er `NoGoal`. Ellers er uka `Met` når mål og begge
/// faktiske tall finnes; alt annet er `MIA` i passerte uker og `Pending`
/// i inneværende uke.
pub fn classify_week(
    week: WeekId,
    record: Option<&WeeklyRecord>,
    join_week: WeekId,
    current_week: WeekId,
) -> WeekClassification {
    if week < join_week {
        return WeekClassification::NoGoal;
    }
    match record {
        Some(r) if r.has_goal() && r.has_all_actuals() => WeekClassification::Met,
        _ if week < current_week => WeekClassification::Mia,
        _ => WeekClassification::Pending,
    }
}

/// Går hele rekka fra innmeldingsuke til inneværende uke (med hull)
/// og klassifiserer hver uke. Poster utenfor rekka ignoreres.
pub fn classify_weeks(
    records: &[WeeklyRecord],
    join_week: WeekId,
    current_week: WeekId,
) -> Vec<ClassifiedWeek> {
    let by_week = index_records(records);

    let out: Vec<ClassifiedWeek> = full_week_range(join_week, current_week)
        .into_iter()
        .map(|week| {
            let record = by_week.get(&week).copied();
            let classification = classify_week(week, record, join_week, current_week);
            ClassifiedWeek {
                week_id: week,
                classification,
                record: record.cloned(),
            }
        })
        .collect();

    // ett oppslag per klasse, ikke per uke
    for class in [
        WeekClassification::Met,
        WeekClassification::Pending,
        WeekClassification::Mia,
        WeekClassification::NoGoal,
    ] {
        let n = out.iter().filter(|w| w.classification == class).count() as u64;
        if n > 0 {
            classified_weeks_total(&METRICS, class).inc_by(n);
        }
    }

    log::debug!(
        "classified {} weeks ({join_week}..={current_week}) from {} records",
        out.len(),
        records.len()
    );
    out
}

/// Antall MIA-uker, inkludert uker uten noen innsending.
pub fn mia_count(records: &[WeeklyRecord], join_week: WeekId, current_week: WeekId) -> usize {
    classify_weeks(records, join_week, current_week)
        .iter()
        .filter(|w| w.classification == WeekClassification::Mia)
        .count()
}

/// MIA talt kun fra lagrede poster (mål satt, faktiske tall mangler, uka passert).
/// Ser ikke uker uten innsending, og underteller derfor. Brukes som sammenligningsgrunnlag.
pub fn recorded_mia_count(records: &[WeeklyRecord], current_week: WeekId) -> usize {
    index_records(records)
        .into_iter()
        .filter(|(week, rec)| *week < current_week && rec.has_goal() && !rec.has_all_actuals())
        .count()
}

/// Innmeldingsuke: fra `joined_at` hvis satt, ellers tidligste gyldige post.
/// Et `joined_at` utenfor gyldige år logges og behandles som manglende.
pub fn join_week(joined_at: Option<&DateTime<Utc>>, records: &[WeeklyRecord]) -> Option<WeekId> {
    let from_profile = joined_at.and_then(|at| match week_id_of_instant(at) {
        Ok(week) => Some(week),
        Err(e) => {
            log::warn!("ignoring joinedAt {at}: {e}");
            None
        }
    });
    from_profile.or_else(|| records.iter().filter_map(|r| r.week().ok()).min())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    #[test]
    fn index_skips_bad_ids_and_keeps_first_duplicate() {
        let first = WeeklyRecord::new(w("2025-W03")).with_goal(10.0, 100.0);
        let second = WeeklyRecord::new(w("2025-W03")).with_goal(99.0, 99.0);
        let bad = WeeklyRecord {
            week_id: "week three".into(),
            ..Default::default()
        };
        let records = vec![first.clone(), bad, second];

        let idx = index_records(&records);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx[&w("2025-W03")], &first);
    }

    #[test]
    fn weeks_before_join_are_no_goal() {
        let c = classify_week(w("2024-W49"), None, w("2024-W50"), w("2025-W02"));
        assert_eq!(c, WeekClassification::NoGoal);
    }
}
