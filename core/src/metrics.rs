use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::types::WeekClassification;

/// Tellere for dataintegritet og klassifisering.
pub struct Metrics {
    registry: Registry,
    malformed_week_ids: IntCounter,
    duplicate_week_records: IntCounter,
    classified_weeks: IntCounterVec,
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new();

        let malformed_week_ids = IntCounter::new(
            "fithud_malformed_week_ids_total",
            "Weekly records skipped because their week id did not parse",
        )
        .expect("static counter opts are valid");
        let duplicate_week_records = IntCounter::new(
            "fithud_duplicate_week_records_total",
            "Weekly records ignored because the same user already had one for that week",
        )
        .expect("static counter opts are valid");
        let classified_weeks = IntCounterVec::new(
            Opts::new("fithud_classified_weeks_total", "Weeks classified, by outcome"),
            &["classification"],
        )
        .expect("static counter opts are valid");

        let collectors: [Box<dyn Collector>; 3] = [
            Box::new(malformed_week_ids.clone()),
            Box::new(duplicate_week_records.clone()),
            Box::new(classified_weeks.clone()),
        ];
        for c in collectors {
            if let Err(e) = registry.register(c) {
                log::warn!("metrics: failed to register collector: {e}");
            }
        }

        Self {
            registry,
            malformed_week_ids,
            duplicate_week_records,
            classified_weeks,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

pub fn malformed_week_ids_total(metrics: &Metrics) -> &IntCounter {
    &metrics.malformed_week_ids
}

pub fn duplicate_week_records_total(metrics: &Metrics) -> &IntCounter {
    &metrics.duplicate_week_records
}

pub fn classified_weeks_total(metrics: &Metrics, class: WeekClassification) -> IntCounter {
    metrics.classified_weeks.with_label_values(&[class.as_str()])
}

/// Prometheus tekstformat for alle tellere.
pub fn gather_text() -> String {
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&METRICS.registry.gather(), &mut buf) {
        log::warn!("metrics: encode failed: {e}");
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
