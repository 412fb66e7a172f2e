use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use serde_path_to_error as spte;

use crate::analyze_session::GaitSession;
use crate::classify::{classify, rating_score};
use crate::config::{GaitConfig, Thresholds};
use crate::types::{ChannelRating, Sample};

fn parse_samples(json_in: &str) -> Result<Vec<Sample>, String> {
    let de = &mut serde_json::Deserializer::from_str(json_in);
    spte::deserialize(de).map_err(|e| format!("parse error (samples) at {}: {}", e.path(), e.inner()))
}

/// Python-håndtak for én økt. Hele strømmen kan sendes inn ved hvert kall.
#[pyclass(name = "GaitSession")]
pub struct PyGaitSession {
    inner: GaitSession,
}

#[pymethods]
impl PyGaitSession {
    #[new]
    #[pyo3(signature = (session_id, config_json=None))]
    fn new(session_id: &str, config_json: Option<&str>) -> PyResult<Self> {
        let cfg = match config_json {
            Some(j) => GaitConfig::from_json_str(j).map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => GaitConfig::default(),
        };
        let inner = GaitSession::new(session_id, cfg).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// JSON-liste med samples inn, JSON-rapport ut.
    fn update_json(&mut self, samples_json: &str) -> PyResult<String> {
        let samples = parse_samples(samples_json).map_err(PyValueError::new_err)?;
        let report = self.inner.update(&samples);
        serde_json::to_string(&report).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    #[getter]
    fn cumulative_steps(&self) -> u64 {
        self.inner.cumulative_steps()
    }
}

#[pyfunction]
fn classify_pressure(value: f64, weak: f64, high: f64) -> PyResult<(String, u8)> {
    if weak > high {
        return Err(PyValueError::new_err("weak må være <= high"));
    }
    let t = Thresholds::new(weak, high);
    let label = match classify(value, t) {
        ChannelRating::Low => "Low",
        ChannelRating::Normal => "Normal",
        ChannelRating::High => "High",
    };
    Ok((label.to_string(), rating_score(value, t)))
}

#[pymodule]
fn gaitgraph_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyGaitSession>()?;
    m.add_function(wrap_pyfunction!(classify_pressure, m)?)?;
    Ok(())
}
