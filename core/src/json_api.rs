use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::mia::{classify_weeks, join_week};
use crate::models::WeeklyRecord;
use crate::points::aggregate_population;
use crate::range::{filter_by_range, RangeFilter};
use crate::types::{Cfg, ClassifiedWeek, WeekClassification, WeekStat};
use crate::week::{week_id_of, WeekId};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT-REPR
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyIn {
    #[serde(default)]
    records: Vec<WeeklyRecord>,
    // joinWeek vinner over joinedAt; mangler begge brukes tidligste post
    #[serde(default)]
    join_week: Option<WeekId>,
    #[serde(default)]
    joined_at: Option<DateTime<Utc>>,
    today: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOut {
    current_week: WeekId,
    join_week: Option<WeekId>,
    mia_count: usize,
    weeks: Vec<ClassifiedWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateIn {
    /// én liste med ukeposter per bruker
    #[serde(default)]
    users: Vec<Vec<WeeklyRecord>>,
    #[serde(default)]
    range: Option<RangeFilter>,
    today: NaiveDate,
    #[serde(default)]
    cfg: Cfg,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateOut {
    range: RangeFilter,
    weeks: Vec<WeekStat>,
}

fn parse<'a, T: Deserialize<'a>>(json_in: &'a str, what: &str) -> Result<T, String> {
    let mut de = json::Deserializer::from_str(json_in);
    spte::deserialize(&mut de).map_err(|e| format!("parse error ({what}) at {}: {}", e.path(), e))
}

// ──────────────────────────────────────────────────────────────────────────────
// KALL
// ──────────────────────────────────────────────────────────────────────────────

/// "YYYY-MM-DD" → "YYYY-Www"
pub fn week_id_from_date_str(date: &str) -> Result<String, String> {
    let d = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date `{date}`: {e}"))?;
    week_id_of(d)
        .map(|w| w.to_string())
        .map_err(|e| format!("invalid date `{date}`: {e}"))
}

/// Klassifiser en brukers uker. Svarer med hele rekka og MIA-antall.
pub fn call_classify_from_json(json_in: &str) -> Result<String, String> {
    let input: ClassifyIn = parse(json_in, "ClassifyIn")?;
    let current = week_id_of(input.today).map_err(|e| format!("invalid today: {e}"))?;
    let join = input
        .join_week
        .or_else(|| join_week(input.joined_at.as_ref(), &input.records));

    let weeks = match join {
        Some(j) => classify_weeks(&input.records, j, current),
        None => Vec::new(),
    };
    let mia_count = weeks
        .iter()
        .filter(|w| w.classification == WeekClassification::Mia)
        .count();

    let out = ClassifyOut {
        current_week: current,
        join_week: join,
        mia_count,
        weeks,
    };
    json::to_string(&out).map_err(|e| format!("serialize error (ClassifyOut): {e}"))
}

/// Snitt per uke over flere brukere, filtrert på tidsvindu.
pub fn call_aggregate_from_json(json_in: &str) -> Result<String, String> {
    let input: AggregateIn = parse(json_in, "AggregateIn")?;
    let range = input.range.unwrap_or_else(|| input.cfg.default_range());

    let stats = aggregate_population(input.users.iter().map(Vec::as_slice), &input.cfg);
    let out = AggregateOut {
        range,
        weeks: filter_by_range(stats, range, input.today)
            .map_err(|e| format!("invalid today: {e}"))?,
    };
    json::to_string(&out).map_err(|e| format!("serialize error (AggregateOut): {e}"))
}
