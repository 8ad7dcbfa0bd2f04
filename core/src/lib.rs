//! FitHUD core: ukeregnskap for ukentlige treningsmål.
//!
//! Ren logikk uten I/O: ISO-uker, rekker med hull, MIA-klassifisering,
//! poeng og snitt per uke. Datahenting ligger hos kalleren (se `store`).

pub mod cli;
pub mod error;
pub mod json_api;
pub mod metrics;
pub mod mia;
pub mod models;
pub mod points;
pub mod range;
pub mod storage;
pub mod store;
pub mod summary;
pub mod types;
pub mod week;

#[cfg(feature = "python")]
mod py;

pub use error::{ParseRangeError, StorageError, StoreError, WeekError};
pub use mia::{classify_week, classify_weeks, join_week, mia_count, recorded_mia_count};
pub use models::{Snapshot, Team, UserProfile, WeeklyRecord};
pub use points::{
    aggregate_by_week, aggregate_population, points_of, points_with, user_points, REPS_PER_POINT,
};
pub use range::{filter_by_range, RangeFilter, Weekly};
pub use storage::{load_cfg, load_snapshot, save_cfg, save_snapshot};
pub use store::{MemoryStore, RecordSource};
pub use types::{
    Cfg, ClassifiedWeek, HistoryRow, PointEntry, UserSummary, WeekClassification, WeekStat,
};
pub use week::{full_week_range, iso_weeks_in_year, week_id_of, week_id_of_instant, WeekId};
