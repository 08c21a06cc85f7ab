//! TOML network files
//!
//! ```toml
//! [[stations]]
//! id = "A"
//! name = "Central"
//!
//! [[routes]]
//! from = "A"
//! to = "B"
//! distance_km = 2.0
//! time_min = 4.0
//! line = "Red"
//! bidirectional = true   # optional, defaults to true
//! ```
//!
//! Files are only ever read; the graph built from them lives for one run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use metro_routing::sample::sample_network;
use metro_routing::TransitGraph;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkFile {
    #[serde(default)]
    pub stations: Vec<StationEntry>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub time_min: f64,
    pub line: String,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

fn default_bidirectional() -> bool {
    true
}

impl NetworkFile {
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse network file")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read network file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid network file {}", path.display()))
    }

    /// Build a fresh graph; the first bad route aborts with its position and endpoints
    pub fn build(&self) -> Result<TransitGraph> {
        let mut graph = TransitGraph::new();

        for entry in &self.stations {
            let existing = graph.station_by_id(&entry.id).map(|s| s.name().to_string());
            if let Some(name) = existing {
                warn!(id = %entry.id, kept = %name, ignored = %entry.name, "duplicate station id");
                continue;
            }
            graph.add_station(&entry.id, &entry.name);
        }

        for (i, route) in self.routes.iter().enumerate() {
            graph
                .add_route(
                    &route.from,
                    &route.to,
                    route.distance_km,
                    route.time_min,
                    &route.line,
                    route.bidirectional,
                )
                .with_context(|| {
                    format!(
                        "Route #{} ({} -> {} on {}) is invalid",
                        i + 1,
                        route.from,
                        route.to,
                        route.line
                    )
                })?;
        }

        Ok(graph)
    }
}

/// Graph from `path`, or the built-in sample network when no file is given
pub fn load_graph(path: Option<&Path>) -> Result<TransitGraph> {
    let graph = match path {
        Some(path) => NetworkFile::load(path)?.build()?,
        None => sample_network(),
    };
    info!(
        stations = graph.station_count(),
        edges = graph.edge_count(),
        lines = graph.lines().len(),
        "network loaded"
    );
    Ok(graph)
}
