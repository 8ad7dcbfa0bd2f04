use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::WeeklyRecord;
use crate::points::REPS_PER_POINT;
use crate::range::RangeFilter;
use crate::week::WeekId;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Cfg {
    /// Hvor mange reps som tilsvarer ett poeng (typ 20)
    pub reps_per_point: Option<f64>,
    /// "30d" | "90d" | "1y" | "all"
    pub default_range: Option<String>,
}

impl Cfg {
    /// Faller tilbake til `REPS_PER_POINT` hvis verdien er ugyldig.
    pub fn reps_per_point(&self) -> f64 {
        match self.reps_per_point {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => REPS_PER_POINT,
        }
    }

    pub fn default_range(&self) -> RangeFilter {
        self.default_range
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekClassification {
    Met,
    Pending,
    #[serde(rename = "MIA")]
    Mia,
    NoGoal,
}

impl WeekClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekClassification::Met => "Met",
            WeekClassification::Pending => "Pending",
            WeekClassification::Mia => "MIA",
            WeekClassification::NoGoal => "NoGoal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedWeek {
    pub week_id: WeekId,
    pub classification: WeekClassification,
    /// `None` for uker uten innsending (hull)
    pub record: Option<WeeklyRecord>,
}

/// Poeng for én bruker én uke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEntry {
    pub week_id: WeekId,
    pub points: f64,
}

/// Snitt for en populasjon én uke. `average_points = None` betyr
/// at ingen hadde faktiske tall den uka (ikke det samme som 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStat {
    pub week_id: WeekId,
    pub average_points: Option<f64>,
    pub contributors: usize,
}

/// Rad i ukehistorikken på profilsiden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub week_id: WeekId,
    pub classification: WeekClassification,
    pub goal_distance: Option<f64>,
    pub actual_distance: Option<f64>,
    pub goal_reps: Option<f64>,
    pub actual_reps: Option<f64>,
    pub result: String,
}

/// Rad i admin-tabellen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub name: String,
    pub joined_at: Option<DateTime<Utc>>,
    pub mia_count: usize,
    pub is_blocked: bool,
}
