//! Directed, line-tagged connection between two stations

use metro_common::{Error, Result};

/// Weight of a directed graph edge.
///
/// `to` is the destination station id; the graph guarantees it always names a
/// station that is still present.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: String,
    pub distance_km: f64,
    pub time_min: f64,
    pub line: String,
}

impl Edge {
    pub(crate) fn new(
        to: impl Into<String>,
        distance_km: f64,
        time_min: f64,
        line: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            distance_km,
            time_min,
            line: line.into(),
        }
    }

    /// Copy of this edge with the given weights replaced; `None` keeps the current value
    pub(crate) fn with_weights(&self, distance_km: Option<f64>, time_min: Option<f64>) -> Self {
        Self {
            to: self.to.clone(),
            distance_km: distance_km.unwrap_or(self.distance_km),
            time_min: time_min.unwrap_or(self.time_min),
            line: self.line.clone(),
        }
    }
}

/// Reject weights the search cannot handle
pub(crate) fn validate_weight(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidWeight { field, value })
    }
}
