use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WeekError;
use crate::mia::{classify_weeks, join_week, mia_count};
use crate::models::{Team, UserProfile, WeeklyRecord};
use crate::points::{aggregate_population, user_points};
use crate::range::{filter_by_range, RangeFilter};
use crate::store::RecordSource;
use crate::types::{
    Cfg, ClassifiedWeek, HistoryRow, PointEntry, UserSummary, WeekClassification, WeekStat,
};
use crate::week::{week_id_of, WeekId};

/// Differanse faktisk − mål med to desimaler, `+` foran ikke-negative.
pub fn format_result(goal: f64, actual: f64, unit: &str) -> String {
    let diff = actual - goal;
    if diff >= 0.0 {
        format!("+{diff:.2} {unit}")
    } else {
        format!("{diff:.2} {unit}")
    }
}

fn result_text(week: &ClassifiedWeek) -> String {
    match week.classification {
        WeekClassification::Mia => "MIA".to_string(),
        WeekClassification::Pending => "Pending".to_string(),
        WeekClassification::NoGoal => "-".to_string(),
        WeekClassification::Met => {
            let Some(rec) = week.record.as_ref() else {
                return "-".to_string();
            };
            let parts: Vec<String> = [
                (rec.goal_distance(), rec.actual_distance(), "km"),
                (rec.goal_reps(), rec.actual_reps(), "reps"),
            ]
            .into_iter()
            .filter_map(|(goal, actual, unit)| Some(format_result(goal?, actual?, unit)))
            .collect();
            parts.join(", ")
        }
    }
}

/// Ukehistorikk fra innmelding til i dag, nyeste først, med MIA-hull.
pub fn weekly_history(
    records: &[WeeklyRecord],
    join: WeekId,
    today: NaiveDate,
) -> Result<Vec<HistoryRow>, WeekError> {
    let mut rows: Vec<HistoryRow> = classify_weeks(records, join, week_id_of(today)?)
        .iter()
        .map(|w| {
            let rec = w.record.as_ref();
            HistoryRow {
                week_id: w.week_id,
                classification: w.classification,
                goal_distance: rec.and_then(WeeklyRecord::goal_distance),
                actual_distance: rec.and_then(WeeklyRecord::actual_distance),
                goal_reps: rec.and_then(WeeklyRecord::goal_reps),
                actual_reps: rec.and_then(WeeklyRecord::actual_reps),
                result: result_text(w),
            }
        })
        .collect();
    rows.reverse();
    Ok(rows)
}

/// Admin-rad for én bruker. Uten innmeldingsuke og uten poster blir MIA 0.
pub fn user_summary(
    user_id: &str,
    profile: &UserProfile,
    records: &[WeeklyRecord],
    today: NaiveDate,
) -> Result<UserSummary, WeekError> {
    let current = week_id_of(today)?;
    let mia = join_week(profile.joined_at.as_ref(), records)
        .map(|join| mia_count(records, join, current))
        .unwrap_or(0);

    Ok(UserSummary {
        user_id: user_id.to_string(),
        name: profile.name.clone(),
        joined_at: profile.joined_at,
        mia_count: mia,
        is_blocked: profile.is_blocked,
    })
}

/// Alle brukere med profil, i kildens rekkefølge.
pub fn admin_rows<S: RecordSource + ?Sized>(
    source: &S,
    today: NaiveDate,
) -> Result<Vec<UserSummary>, WeekError> {
    source
        .user_ids()
        .into_iter()
        .filter_map(|uid| {
            let profile = source.profile(&uid)?;
            let records = source.weekly_records(&uid);
            Some(user_summary(&uid, &profile, &records, today))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

/// Filtre i admin-tabellen. `None` = ikke filtrer på feltet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFilter {
    /// Delstreng i navn, uten hensyn til store/små bokstaver
    pub name: Option<String>,
    pub mia_count: Option<usize>,
    pub status: Option<UserStatus>,
    /// Innmeldingsdato (UTC-dag)
    pub joined_on: Option<NaiveDate>,
}

impl AdminFilter {
    pub fn matches(&self, row: &UserSummary) -> bool {
        let name_ok = match self.name.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => row.name.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        };
        let mia_ok = self.mia_count.map_or(true, |n| row.mia_count == n);
        let status_ok = match self.status {
            Some(UserStatus::Active) => !row.is_blocked,
            Some(UserStatus::Blocked) => row.is_blocked,
            None => true,
        };
        let joined_ok = self
            .joined_on
            .map_or(true, |d| row.joined_at.map(|t| t.date_naive()) == Some(d));

        name_ok && mia_ok && status_ok && joined_ok
    }

    pub fn apply<'a>(&self, rows: &'a [UserSummary]) -> Vec<&'a UserSummary> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Første lag som har brukeren som medlem.
pub fn team_for_user<'a>(teams: &'a [(String, Team)], user_id: &str) -> Option<&'a (String, Team)> {
    teams
        .iter()
        .find(|(_, t)| t.members.iter().any(|m| m == user_id))
}

/// Medlemmer med profil; ukjente får navnet "Unknown".
pub fn team_members<S: RecordSource + ?Sized>(source: &S, team: &Team) -> Vec<(String, UserProfile)> {
    team.members
        .iter()
        .map(|uid| {
            let profile = source.profile(uid).unwrap_or_else(|| UserProfile {
                name: "Unknown".to_string(),
                ..Default::default()
            });
            (uid.clone(), profile)
        })
        .collect()
}

/// Brukerens poengkurve innenfor tidsvinduet.
pub fn user_curve(
    records: &[WeeklyRecord],
    range: RangeFilter,
    today: NaiveDate,
    cfg: &Cfg,
) -> Result<Vec<PointEntry>, WeekError> {
    filter_by_range(user_points(records, cfg), range, today)
}

/// Lagkurve: snittpoeng per uke over lagets medlemmer.
pub fn team_curve<S: RecordSource + ?Sized>(
    source: &S,
    team: &Team,
    range: RangeFilter,
    today: NaiveDate,
    cfg: &Cfg,
) -> Result<Vec<WeekStat>, WeekError> {
    let per_member: Vec<Vec<WeeklyRecord>> = team
        .members
        .iter()
        .map(|uid| source.weekly_records(uid))
        .collect();
    let stats = aggregate_population(per_member.iter().map(Vec::as_slice), cfg);
    filter_by_range(stats, range, today)
}

/// Global kurve over alle brukere.
pub fn global_curve<S: RecordSource + ?Sized>(
    source: &S,
    range: RangeFilter,
    today: NaiveDate,
    cfg: &Cfg,
) -> Result<Vec<WeekStat>, WeekError> {
    let per_user: Vec<Vec<WeeklyRecord>> = source
        .user_ids()
        .iter()
        .map(|uid| source.weekly_records(uid))
        .collect();
    let stats = aggregate_population(per_user.iter().map(Vec::as_slice), cfg);
    filter_by_range(stats, range, today)
}
