use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WeekError;

/// Laveste/høyeste år vi godtar i tekstform (4 siffer).
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// ISO-8601 uke: `{year}-W{ww}`.
///
/// Sammenligning skjer numerisk på (år, uke), aldri som streng.
/// Feltrekkefølgen er derfor viktig for `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Validerer at uka finnes i ISO-året (1..=52 eller 1..=53).
    pub fn new(year: i32, week: u32) -> Result<Self, WeekError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(WeekError::YearOutOfRange(year));
        }
        if week == 0 || week > iso_weeks_in_year(year) {
            return Err(WeekError::WeekOutOfRange { year, week });
        }
        Ok(Self { year, week })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Mandagen i uka.
    pub fn monday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
            .expect("WeekId is validated on construction")
    }

    /// Neste uke, med korrekt overgang etter uke 52/53.
    pub fn next(&self) -> WeekId {
        if self.week < iso_weeks_in_year(self.year) {
            WeekId { year: self.year, week: self.week + 1 }
        } else {
            WeekId { year: self.year + 1, week: 1 }
        }
    }

    /// Antall hele uker fra `self` til `later` (negativt hvis `later` ligger før).
    pub fn weeks_until(&self, later: WeekId) -> i64 {
        (later.monday() - self.monday()).num_days() / 7
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || WeekError::InvalidFormat(s.to_string());
        let (y, w) = s.trim().split_once("-W").ok_or_else(bad)?;

        let digits = |x: &str, max_len: usize| {
            !x.is_empty() && x.len() <= max_len && x.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(y, 4) || !digits(w, 2) {
            return Err(bad());
        }

        let year: i32 = y.parse().map_err(|_| bad())?;
        let week: u32 = w.parse().map_err(|_| bad())?;
        WeekId::new(year, week)
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Antall ISO-uker i et år: 53 hvis 1. januar er torsdag,
/// eller hvis det er skuddår og 1. januar er onsdag. Ellers 52.
pub fn iso_weeks_in_year(year: i32) -> u32 {
    let Some(jan1) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return 52;
    };
    let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
    match jan1.weekday() {
        Weekday::Thu => 53,
        Weekday::Wed if leap => 53,
        _ => 52,
    }
}

#[inline]
fn ceil_div(n: i64, d: i64) -> i64 {
    -((-n).div_euclid(d))
}

/// Kalenderdato → ISO-uke.
///
/// 1) flytt datoen til torsdagen i sin egen uke (mandag = dag 0)
/// 2) 4. januar i torsdagens år er ankeret for uke 1
/// 3) uke = 1 + ceil((dager fra ankeret - 3 + ankerets ukedag) / 7)
///
/// Datoer tidlig i januar som hører til forrige års siste uke får
/// forrige år via torsdagsflyttingen.
///
/// ISO-år utenfor `MIN_YEAR..=MAX_YEAR` gir `YearOutOfRange`, slik at
/// alt vi returnerer kan skrives og leses tilbake som `YYYY-Www`.
pub fn week_id_of(date: NaiveDate) -> Result<WeekId, WeekError> {
    let wd = date.weekday().num_days_from_sunday() as i64; // 0 = søndag
    let thursday = date
        .checked_add_signed(Duration::days(3 - (wd + 6) % 7))
        .ok_or(WeekError::YearOutOfRange(date.year()))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&thursday.year()) {
        return Err(WeekError::YearOutOfRange(thursday.year()));
    }

    // 4. januar samme år som torsdagen
    let week1 = thursday - Duration::days(thursday.ordinal0() as i64 - 3);
    let week1_wd = week1.weekday().num_days_from_sunday() as i64;

    let days = (thursday - week1).num_days();
    let week = 1 + ceil_div(days - 3 + (week1_wd + 6) % 7, 7);

    Ok(WeekId {
        year: thursday.year(),
        week: week as u32,
    })
}

/// Tidspunkt → ISO-uke. Klokkeslett strippes i tidssonen tidspunktet bærer.
pub fn week_id_of_instant<Tz: TimeZone>(at: &DateTime<Tz>) -> Result<WeekId, WeekError> {
    week_id_of(at.date_naive())
}

/// Alle uker fra `start` til `end`, begge inkludert, uten hull.
/// Mellomliggende år får sitt faktiske antall ISO-uker (52 eller 53).
/// Tom vektor hvis `start > end`.
pub fn full_week_range(start: WeekId, end: WeekId) -> Vec<WeekId> {
    if start > end {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(start.weeks_until(end) as usize + 1);
    for year in start.year..=end.year {
        let first = if year == start.year { start.week } else { 1 };
        let last = if year == end.year { end.week } else { iso_weeks_in_year(year) };
        for week in first..=last {
            out.push(WeekId { year, week });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_div_rounds_towards_positive_infinity() {
        assert_eq!(ceil_div(14, 7), 2);
        assert_eq!(ceil_div(15, 7), 3);
        assert_eq!(ceil_div(0, 7), 0);
        assert_eq!(ceil_div(-3, 7), 0);
    }

    #[test]
    fn next_rolls_over_after_last_week() {
        let w = WeekId::new(2020, 53).unwrap();
        assert_eq!(w.next(), WeekId::new(2021, 1).unwrap());

        let w = WeekId::new(2021, 52).unwrap();
        assert_eq!(w.next(), WeekId::new(2022, 1).unwrap());
    }
}
