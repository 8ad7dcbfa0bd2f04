use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParseRangeError, WeekError};
use crate::types::{ClassifiedWeek, HistoryRow, PointEntry, WeekStat};
use crate::week::{week_id_of, WeekId};

/// Tidsvindu for kurvene. Filtrering skjer på uke-avstand, ikke på tidsstempel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeFilter {
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    #[default]
    Days90,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl RangeFilter {
    /// Maks antall uker tilbake fra inneværende uke. `None` = ingen grense.
    pub fn max_weeks(&self) -> Option<i64> {
        match self {
            RangeFilter::Days30 => Some(4),
            RangeFilter::Days90 => Some(12),
            RangeFilter::Year => Some(52),
            RangeFilter::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeFilter::Days30 => "30d",
            RangeFilter::Days90 => "90d",
            RangeFilter::Year => "1y",
            RangeFilter::All => "all",
        }
    }

    /// Er `week` innenfor vinduet sett fra `current`?
    ///
    /// Avstanden er faktiske ISO-uker mellom mandagene, ikke `årsdiff * 52 + ukediff`,
    /// som bommer med én uke over hvert 53-ukersår.
    pub fn contains(&self, week: WeekId, current: WeekId) -> bool {
        match self.max_weeks() {
            Some(max) => week.weeks_until(current) <= max,
            None => true,
        }
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeFilter {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "30d" => Ok(RangeFilter::Days30),
            "90d" => Ok(RangeFilter::Days90),
            "1y" => Ok(RangeFilter::Year),
            "all" => Ok(RangeFilter::All),
            other => Err(ParseRangeError(other.to_string())),
        }
    }
}

/// Alt som hører til en bestemt uke.
pub trait Weekly {
    fn week_id(&self) -> WeekId;
}

impl Weekly for WeekId {
    fn week_id(&self) -> WeekId {
        *self
    }
}

impl Weekly for WeekStat {
    fn week_id(&self) -> WeekId {
        self.week_id
    }
}

impl Weekly for PointEntry {
    fn week_id(&self) -> WeekId {
        self.week_id
    }
}

impl Weekly for ClassifiedWeek {
    fn week_id(&self) -> WeekId {
        self.week_id
    }
}

impl Weekly for HistoryRow {
    fn week_id(&self) -> WeekId {
        self.week_id
    }
}

/// Behold oppføringer der (inneværende uke − oppføringens uke) ≤ vinduets uker.
/// Inneværende uke utledes fra `reference`.
pub fn filter_by_range<T, I>(
    series: I,
    range: RangeFilter,
    reference: NaiveDate,
) -> Result<Vec<T>, WeekError>
where
    T: Weekly,
    I: IntoIterator<Item = T>,
{
    let current = week_id_of(reference)?;
    Ok(series
        .into_iter()
        .filter(|e| range.contains(e.week_id(), current))
        .collect())
}
