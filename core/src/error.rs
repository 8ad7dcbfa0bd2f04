use thiserror::Error;

/// Feil ved tolking/bygging av en WeekId.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekError {
    #[error("invalid week id `{0}` (expected YYYY-Www)")]
    InvalidFormat(String),

    #[error("week {week} does not exist in ISO year {year}")]
    WeekOutOfRange { year: i32, week: u32 },

    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
}

/// Feil ved lesing/skriving av snapshot og konfig.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json error in {path} at {at}: {message}")]
    Json {
        path: String,
        at: String,
        message: String,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Ukjent tidsvindu (forventet "30d", "90d", "1y" eller "all").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown range `{0}` (expected 30d, 90d, 1y or all)")]
pub struct ParseRangeError(pub String);

/// Brudd på livsløpet til en ukepost i lageret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("goal for {0} is already set")]
    GoalAlreadySet(String),

    #[error("no goal submitted for {0}")]
    NoGoal(String),

    #[error("actuals for {0} are already set")]
    ActualAlreadySet(String),

    #[error("amount must be a finite, non-negative number")]
    InvalidAmount,

    #[error("failed to encode record: {0}")]
    Encode(String),
}
