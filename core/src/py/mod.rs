use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::json_api::{call_aggregate_from_json, call_classify_from_json, week_id_from_date_str};

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-FUNKSJONER (JSON inn, JSON ut)
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn week_id_of(date: &str) -> PyResult<String> {
    week_id_from_date_str(date).map_err(PyValueError::new_err)
}

#[pyfunction]
fn classify_weeks_json(json_in: &str) -> PyResult<String> {
    call_classify_from_json(json_in).map_err(PyValueError::new_err)
}

#[pyfunction]
fn aggregate_population_json(json_in: &str) -> PyResult<String> {
    call_aggregate_from_json(json_in).map_err(PyValueError::new_err)
}

#[pyfunction]
fn metrics_text() -> String {
    crate::metrics::gather_text()
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn fithud_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(week_id_of, m)?)?;
    m.add_function(wrap_pyfunction!(classify_weeks_json, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate_population_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
