use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::WeekError;
use crate::week::WeekId;

/// Én uke for én bruker (`users/{uid}/weekly_distances/{weekId}`).
///
/// Mål settes én gang i mål-fasen, faktiske tall legges til senere
/// samme uke. Ugyldige mengder (ikke-tall, negative, NaN) behandles som fraværende.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    /// Rå dokument-id. Kan være ugyldig; tolkes først når den trengs.
    #[serde(default)]
    pub week_id: String,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub goal_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub goal_reps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub actual_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub actual_reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Gyldig mengde: endelig og ikke-negativ.
#[inline]
pub(crate) fn clean_amount(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x >= 0.0)
}

/// Tolerant parser: alt som ikke er et gyldig, ikke-negativt tall blir `None`.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(clean_amount(raw.as_ref().and_then(Value::as_f64)))
}

impl WeeklyRecord {
    pub fn new(week: WeekId) -> Self {
        Self {
            week_id: week.to_string(),
            ..Default::default()
        }
    }

    pub fn with_goal(mut self, distance: f64, reps: f64) -> Self {
        self.goal_distance = Some(distance);
        self.goal_reps = Some(reps);
        self
    }

    pub fn with_actual(mut self, distance: f64, reps: f64) -> Self {
        self.actual_distance = Some(distance);
        self.actual_reps = Some(reps);
        self
    }

    pub fn week(&self) -> Result<WeekId, WeekError> {
        self.week_id.parse()
    }

    pub fn goal_distance(&self) -> Option<f64> {
        clean_amount(self.goal_distance)
    }

    pub fn goal_reps(&self) -> Option<f64> {
        clean_amount(self.goal_reps)
    }

    pub fn actual_distance(&self) -> Option<f64> {
        clean_amount(self.actual_distance)
    }

    pub fn actual_reps(&self) -> Option<f64> {
        clean_amount(self.actual_reps)
    }

    pub fn has_goal(&self) -> bool {
        self.goal_distance().is_some() || self.goal_reps().is_some()
    }

    pub fn has_all_actuals(&self) -> bool {
        self.actual_distance().is_some() && self.actual_reps().is_some()
    }

    pub fn has_any_actual(&self) -> bool {
        self.actual_distance().is_some() || self.actual_reps().is_some()
    }
}

/// Profil (`user_names/{uid}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_message: Option<String>,
}

/// Lag (`teams/{teamId}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Hele datasettet på disk / i minnet, nøklet som i dokumentlageret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub user_names: BTreeMap<String, UserProfile>,
    /// uid → weekId → record
    #[serde(default)]
    pub weekly_distances: BTreeMap<String, BTreeMap<String, WeeklyRecord>>,
    #[serde(default)]
    pub teams: BTreeMap<String, Team>,
}

impl Snapshot {
    /// Dokument-id er uke-id; fyll inn `week_id` der dokumentet mangler feltet.
    pub fn normalize(&mut self) {
        for weeks in self.weekly_distances.values_mut() {
            for (key, rec) in weeks.iter_mut() {
                if rec.week_id.is_empty() {
                    rec.week_id = key.clone();
                }
            }
        }
    }

    pub fn records_for(&self, user_id: &str) -> Vec<WeeklyRecord> {
        self.weekly_distances
            .get(user_id)
            .map(|weeks| weeks.values().cloned().collect())
            .unwrap_or_default()
    }
}
