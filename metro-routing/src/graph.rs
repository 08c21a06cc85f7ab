//! Transit network store: stations and their line-tagged routes

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use metro_common::{suggest_station, Error, Result};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::edge::{validate_weight, Edge};
use crate::station::Station;

/// Labeled multigraph of stations.
///
/// Stations are kept in insertion order through `node_map`. Removing a node
/// from the stable graph drops its incident edges, so every edge's `to` names
/// a station that is present.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    pub(crate) graph: StableDiGraph<Station, Edge>,
    pub(crate) node_map: IndexMap<String, NodeIndex>,
}

impl TransitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a station, or return the existing one unchanged if `id` is taken
    pub fn add_station(&mut self, id: &str, name: &str) -> &Station {
        let graph = &mut self.graph;
        let idx = *self.node_map.entry(id.to_string()).or_insert_with(|| {
            debug!(id, name, "station added");
            graph.add_node(Station::new(id, name))
        });
        &self.graph[idx]
    }

    /// Remove a station and every edge touching it. Returns false if absent.
    pub fn remove_station(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_map.shift_remove(id) else {
            return false;
        };

        let before = self.graph.edge_count();
        self.graph.remove_node(idx);
        let stripped = before - self.graph.edge_count();

        debug!(id, stripped, "station removed");
        true
    }

    /// Add a route from `from` to `to`, plus the mirrored edge when `bidirectional`.
    ///
    /// Duplicate routes are kept as parallel options.
    pub fn add_route(
        &mut self,
        from: &str,
        to: &str,
        distance_km: f64,
        time_min: f64,
        line: &str,
        bidirectional: bool,
    ) -> Result<()> {
        let (a, b) = self.endpoints(from, to)?;
        validate_weight("distance_km", distance_km)?;
        validate_weight("time_min", time_min)?;

        self.graph
            .add_edge(a, b, Edge::new(to, distance_km, time_min, line));
        if bidirectional {
            self.graph
                .add_edge(b, a, Edge::new(from, distance_km, time_min, line));
        }

        debug!(from, to, line, distance_km, time_min, bidirectional, "route added");
        Ok(())
    }

    /// Remove every `from -> to` and `to -> from` edge on `line`.
    ///
    /// Both directions are tried whether or not the route was added as
    /// bidirectional. Returns `Ok(true)` if anything was removed.
    pub fn remove_route(&mut self, from: &str, to: &str, line: &str) -> Result<bool> {
        let (a, b) = self.endpoints(from, to)?;

        let removed = self
            .route_edges(a, b, line)
            .into_iter()
            .filter_map(|e| self.graph.remove_edge(e))
            .count();

        debug!(from, to, line, removed, "route removal");
        Ok(removed > 0)
    }

    /// Replace the weights of every edge on `line` between `from` and `to`, both directions.
    ///
    /// `None` keeps the current value. Returns `Ok(true)` if at least one edge matched.
    pub fn update_route(
        &mut self,
        from: &str,
        to: &str,
        line: &str,
        new_distance_km: Option<f64>,
        new_time_min: Option<f64>,
    ) -> Result<bool> {
        let (a, b) = self.endpoints(from, to)?;
        if let Some(d) = new_distance_km {
            validate_weight("distance_km", d)?;
        }
        if let Some(t) = new_time_min {
            validate_weight("time_min", t)?;
        }

        let mut updated = 0;
        for e in self.route_edges(a, b, line) {
            if let Some(edge) = self.graph.edge_weight_mut(e) {
                *edge = edge.with_weights(new_distance_km, new_time_min);
                updated += 1;
            }
        }

        debug!(from, to, line, updated, "route update");
        Ok(updated > 0)
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        self.node_map
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Case-insensitive lookup against name or id.
    ///
    /// An exact id wins; otherwise the first matching station in insertion order.
    pub fn station_by_name(&self, query: &str) -> Option<&Station> {
        let query = query.trim();
        self.station_by_id(query)
            .or_else(|| self.all_stations().find(|s| s.matches(query)))
    }

    /// Like [`station_by_name`](Self::station_by_name), but a miss becomes
    /// [`Error::StationNotFound`] with a fuzzy suggestion.
    pub fn resolve(&self, query: &str) -> Result<&Station> {
        self.station_by_name(query).ok_or_else(|| {
            let candidates = self.all_stations().flat_map(|s| [s.name(), s.id()]);
            Error::StationNotFound {
                query: query.to_string(),
                suggestion: suggest_station(query, candidates),
            }
        })
    }

    /// Outgoing edges of `station_id` in the order they were added, empty if
    /// the station is unknown
    pub fn neighbors(&self, station_id: &str) -> Vec<&Edge> {
        let Some(&idx) = self.node_map.get(station_id) else {
            return Vec::new();
        };
        // petgraph walks a node's adjacency list newest first
        let mut edges: Vec<&Edge> = self.graph.edges(idx).map(|e| e.weight()).collect();
        edges.reverse();
        edges
    }

    pub fn all_stations(&self) -> impl Iterator<Item = &Station> {
        self.node_map
            .values()
            .filter_map(|&idx| self.graph.node_weight(idx))
    }

    pub fn station_count(&self) -> usize {
        self.node_map.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Distinct line labels, sorted
    pub fn lines(&self) -> Vec<&str> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_weight(e))
            .map(|e| e.line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Node handles of both route endpoints; either missing fails before anything changes
    fn endpoints(&self, from: &str, to: &str) -> Result<(NodeIndex, NodeIndex)> {
        let index_of = |id: &str| self.index_of(id).ok_or_else(|| Error::station_not_found(id));
        Ok((index_of(from)?, index_of(to)?))
    }

    /// Edges on `line` from `a` to `b` and from `b` to `a`, each listed once
    fn route_edges(&self, a: NodeIndex, b: NodeIndex, line: &str) -> Vec<EdgeIndex> {
        let mut found: Vec<EdgeIndex> = self.edges_on_line(a, b, line).collect();
        if a != b {
            found.extend(self.edges_on_line(b, a, line));
        }
        found
    }

    fn edges_on_line<'a>(
        &'a self,
        src: NodeIndex,
        dst: NodeIndex,
        line: &'a str,
    ) -> impl Iterator<Item = EdgeIndex> + 'a {
        self.graph
            .edges(src)
            .filter(move |e| e.target() == dst && e.weight().line == line)
            .map(|e| e.id())
    }
}

impl fmt::Display for TransitGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stations and routes:")?;
        for station in self.all_stations() {
            writeln!(f, "{station}:")?;
            for edge in self.neighbors(station.id()) {
                let to = self
                    .station_by_id(&edge.to)
                    .map_or(edge.to.as_str(), Station::name);
                writeln!(
                    f,
                    "  -> {} | line={} | dist={:.2}km | time={:.1}min",
                    to, edge.line, edge.distance_km, edge.time_min
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stations() -> TransitGraph {
        let mut g = TransitGraph::new();
        g.add_station("A", "Central");
        g.add_station("B", "Park Street");
        g
    }

    #[test]
    fn test_add_station_is_idempotent() {
        let mut g = TransitGraph::new();
        let first = g.add_station("A", "Central").clone();
        let second = g.add_station("A", "Renamed").clone();

        assert_eq!(first, second);
        assert_eq!(second.name(), "Central");
        assert_eq!(g.station_count(), 1);
    }

    #[test]
    fn test_add_route_bidirectional_mirrors_edge() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();

        assert_eq!(g.neighbors("A"), vec![&Edge::new("B", 2.0, 4.0, "Red")]);
        assert_eq!(g.neighbors("B"), vec![&Edge::new("A", 2.0, 4.0, "Red")]);
    }

    #[test]
    fn test_add_route_one_way() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", false).unwrap();

        assert_eq!(g.neighbors("A").len(), 1);
        assert!(g.neighbors("B").is_empty());
    }

    #[test]
    fn test_add_route_unknown_station() {
        let mut g = two_stations();
        let err = g.add_route("A", "Z", 1.0, 1.0, "Red", true).unwrap_err();

        assert!(matches!(err, Error::StationNotFound { ref query, .. } if query == "Z"));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_add_route_rejects_negative_weight() {
        let mut g = two_stations();
        let err = g.add_route("A", "B", -1.0, 4.0, "Red", true).unwrap_err();

        assert!(matches!(err, Error::InvalidWeight { field: "distance_km", .. }));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_routes_are_kept() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();

        assert_eq!(g.neighbors("A").len(), 2);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_remove_station_strips_incoming_edges() {
        let mut g = two_stations();
        g.add_station("C", "Lake View");
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();
        g.add_route("C", "B", 3.0, 6.0, "Red", true).unwrap();
        g.add_route("A", "C", 5.0, 9.0, "Blue", false).unwrap();

        assert!(g.remove_station("B"));
        assert!(!g.remove_station("B"));

        for s in g.all_stations() {
            assert!(g.neighbors(s.id()).iter().all(|e| e.to != "B"));
        }
        assert_eq!(g.neighbors("A"), vec![&Edge::new("C", 5.0, 9.0, "Blue")]);
        assert!(g.neighbors("B").is_empty());
    }

    #[test]
    fn test_remove_route_both_directions() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();
        g.add_route("A", "B", 2.0, 4.0, "Blue", true).unwrap();

        assert!(g.remove_route("B", "A", "Red").unwrap());
        assert!(!g.remove_route("B", "A", "Red").unwrap());
        assert_eq!(g.neighbors("A"), vec![&Edge::new("B", 2.0, 4.0, "Blue")]);
        assert_eq!(g.neighbors("B"), vec![&Edge::new("A", 2.0, 4.0, "Blue")]);
    }

    #[test]
    fn test_remove_route_unknown_station() {
        let mut g = two_stations();
        assert!(g.remove_route("A", "Z", "Red").is_err());
    }

    #[test]
    fn test_update_route_mirrors_and_keeps_missing_values() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();

        assert!(g.update_route("A", "B", "Red", None, Some(5.5)).unwrap());
        assert_eq!(g.neighbors("A"), vec![&Edge::new("B", 2.0, 5.5, "Red")]);
        assert_eq!(g.neighbors("B"), vec![&Edge::new("A", 2.0, 5.5, "Red")]);

        assert!(g.update_route("A", "B", "Red", None, None).unwrap());
        assert_eq!(g.neighbors("A"), vec![&Edge::new("B", 2.0, 5.5, "Red")]);

        assert!(!g.update_route("A", "B", "Green", Some(1.0), None).unwrap());
    }

    #[test]
    fn test_update_route_rejects_invalid_weight_without_change() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();

        assert!(g
            .update_route("A", "B", "Red", Some(3.0), Some(f64::NAN))
            .is_err());
        assert_eq!(g.neighbors("A"), vec![&Edge::new("B", 2.0, 4.0, "Red")]);
    }

    #[test]
    fn test_station_by_name() {
        let g = two_stations();

        assert_eq!(g.station_by_name("park STREET").map(Station::id), Some("B"));
        assert_eq!(g.station_by_name("a").map(Station::id), Some("A"));
        assert_eq!(g.station_by_name(" Central ").map(Station::id), Some("A"));
        assert!(g.station_by_name("Airport").is_none());
        assert!(g.station_by_id("b").is_none());
    }

    #[test]
    fn test_station_by_name_folds_non_ascii_case() {
        let mut g = two_stations();
        g.add_station("OS", "Östermalmstorg");

        assert_eq!(g.station_by_name("östermalmstorg").map(Station::id), Some("OS"));
        assert_eq!(g.station_by_name("ÖSTERMALMSTORG").map(Station::id), Some("OS"));
        assert_eq!(g.resolve("östermalmstorg").map(Station::id).ok(), Some("OS"));
    }

    #[test]
    fn test_neighbors_keep_insertion_order() {
        let mut g = two_stations();
        g.add_station("C", "Lake View");
        g.add_route("A", "B", 1.0, 1.0, "Red", false).unwrap();
        g.add_route("A", "C", 2.0, 2.0, "Blue", false).unwrap();
        g.add_route("A", "B", 3.0, 3.0, "Green", false).unwrap();
        assert!(g.remove_route("A", "C", "Blue").unwrap());

        let lines: Vec<&str> = g.neighbors("A").into_iter().map(|e| e.line.as_str()).collect();
        assert_eq!(lines, vec!["Red", "Green"]);
    }

    #[test]
    fn test_loop_route_is_removed_once() {
        let mut g = two_stations();
        g.add_route("A", "A", 1.0, 1.0, "Shuttle", true).unwrap();
        assert_eq!(g.edge_count(), 2);

        assert!(g.update_route("A", "A", "Shuttle", Some(4.0), None).unwrap());
        assert!(g.neighbors("A").iter().all(|e| e.distance_km == 4.0));
        assert!(g.remove_route("A", "A", "Shuttle").unwrap());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_station_slot_is_not_confused_after_removal() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", true).unwrap();
        assert!(g.remove_station("A"));
        g.add_station("C", "Lake View");
        g.add_route("C", "B", 1.0, 1.0, "Blue", false).unwrap();

        assert_eq!(g.station_by_id("C").map(Station::name), Some("Lake View"));
        assert!(g.station_by_id("A").is_none());
        assert!(g.neighbors("B").is_empty());
        assert_eq!(g.neighbors("C"), vec![&Edge::new("B", 1.0, 1.0, "Blue")]);
        assert_eq!(
            g.all_stations().map(Station::id).collect::<Vec<_>>(),
            vec!["B", "C"]
        );
    }

    #[test]
    fn test_resolve_suggests_close_name() {
        let g = two_stations();
        let err = g.resolve("Centrl").unwrap_err();

        match err {
            Error::StationNotFound { query, suggestion } => {
                assert_eq!(query, "Centrl");
                assert_eq!(suggestion.as_deref(), Some("Central"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_neighbors_of_unknown_station_is_empty() {
        let g = two_stations();
        assert!(g.neighbors("Z").is_empty());
    }

    #[test]
    fn test_lines_sorted_and_distinct() {
        let mut g = two_stations();
        g.add_route("A", "B", 1.0, 1.0, "Red", true).unwrap();
        g.add_route("A", "B", 1.0, 1.0, "Blue", false).unwrap();

        assert_eq!(g.lines(), vec!["Blue", "Red"]);
    }

    #[test]
    fn test_display_lists_stations_and_edges() {
        let mut g = two_stations();
        g.add_route("A", "B", 2.0, 4.0, "Red", false).unwrap();

        let listing = g.to_string();
        assert!(listing.starts_with("Stations and routes:\n"));
        assert!(listing.contains("Central (A):\n  -> Park Street | line=Red | dist=2.00km | time=4.0min\n"));
        assert!(listing.contains("Park Street (B):\n"));
    }
}
