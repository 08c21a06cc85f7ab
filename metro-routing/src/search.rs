//! Interchange-aware shortest route search
//!
//! Dijkstra over the transit graph with a composite key: the chosen metric
//! first, then the number of line changes. The second criterion only orders
//! the frontier and breaks ties between equal-cost relaxations; per-station
//! bests are not split by arrival line, so a cost-optimal route with fewer
//! interchanges can still be missed when it reaches an intermediate station on
//! a different line than the one recorded there.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use metro_common::{Error, Result};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace};

use crate::edge::Edge;
use crate::graph::TransitGraph;
use crate::station::Station;

/// Costs closer than this are treated as equal.
pub const COST_EPSILON: f64 = 1e-9;

/// Weight dimension minimised by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Time,
    Distance,
}

impl Metric {
    pub fn weight(self, edge: &Edge) -> f64 {
        match self {
            Metric::Time => edge.time_min,
            Metric::Distance => edge.distance_km,
        }
    }
}

/// Lenient parse: `"distance"` in any case selects [`Metric::Distance`],
/// everything else falls back to [`Metric::Time`].
impl From<&str> for Metric {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("distance") {
            Metric::Distance
        } else {
            Metric::Time
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Time => write!(f, "time"),
            Metric::Distance => write!(f, "distance"),
        }
    }
}

/// One hop of a route, taken on a single line
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub from: Station,
    pub to: Station,
    pub line: String,
    pub distance_km: f64,
    pub time_min: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Stations visited, endpoints included
    pub path: Vec<Station>,
    pub legs: Vec<Leg>,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    pub interchanges: u32,
}

impl RouteResult {
    fn at(station: &Station) -> Self {
        Self {
            path: vec![station.clone()],
            legs: Vec::new(),
            total_distance_km: 0.0,
            total_time_min: 0.0,
            interchanges: 0,
        }
    }

    fn from_legs(legs: Vec<Leg>) -> Self {
        let mut path = Vec::with_capacity(legs.len() + 1);
        if let Some(first) = legs.first() {
            path.push(first.from.clone());
        }
        path.extend(legs.iter().map(|leg| leg.to.clone()));

        let interchanges = legs.windows(2).filter(|w| w[0].line != w[1].line).count() as u32;

        Self {
            path,
            total_distance_km: legs.iter().map(|l| l.distance_km).sum(),
            total_time_min: legs.iter().map(|l| l.time_min).sum(),
            interchanges,
            legs,
        }
    }

    pub fn station_names(&self) -> Vec<&str> {
        self.path.iter().map(Station::name).collect()
    }

    /// Lines ridden, in order, with consecutive repeats collapsed
    pub fn line_sequence(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.legs.iter().map(|l| l.line.as_str()).collect();
        lines.dedup();
        lines
    }
}

// Frontier entry
#[derive(Debug, Clone)]
struct SearchState<'g> {
    node: NodeIndex,
    cost: f64,
    interchanges: u32,
    line: Option<&'g str>,
}

impl PartialEq for SearchState<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchState<'_> {}

impl PartialOrd for SearchState<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchState<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.interchanges.cmp(&self.interchanges))
    }
}

// Best label per station. `via` is the predecessor node and the exact edge taken
// from it, so parallel edges are told apart.
#[derive(Debug, Clone, Copy)]
struct Label {
    cost: f64,
    interchanges: u32,
    via: Option<(NodeIndex, EdgeIndex)>,
}

impl Label {
    fn is_improved_by(&self, cost: f64, interchanges: u32) -> bool {
        cost < self.cost - COST_EPSILON
            || ((cost - self.cost).abs() < COST_EPSILON && interchanges < self.interchanges)
    }
}

#[derive(Debug, Default)]
struct SearchStats {
    popped: usize,
    stale: usize,
    edges_explored: usize,
    improvements: usize,
}

/// Find the cheapest route between two stations given by name or id.
///
/// Ties on cost are broken by fewer interchanges. Fails with
/// [`Error::StationNotFound`] if an endpoint does not resolve and
/// [`Error::NoPath`] if the destination is unreachable.
pub fn find_shortest(
    graph: &TransitGraph,
    source: &str,
    destination: &str,
    metric: Metric,
) -> Result<RouteResult> {
    let src = graph.resolve(source)?;
    let dst = graph.resolve(destination)?;

    if src == dst {
        return Ok(RouteResult::at(src));
    }

    let (Some(start), Some(goal)) = (graph.index_of(src.id()), graph.index_of(dst.id())) else {
        return Err(Error::station_not_found(src.id()));
    };

    let labels = dijkstra(graph, start, goal, metric);
    let legs = reconstruct(graph, &labels, start, goal).ok_or_else(|| Error::NoPath {
        from: src.name().to_string(),
        to: dst.name().to_string(),
    })?;

    let result = RouteResult::from_legs(legs);
    debug!(
        from = src.id(),
        to = dst.id(),
        %metric,
        distance_km = result.total_distance_km,
        time_min = result.total_time_min,
        interchanges = result.interchanges,
        "route found"
    );
    Ok(result)
}

fn dijkstra(
    graph: &TransitGraph,
    start: NodeIndex,
    goal: NodeIndex,
    metric: Metric,
) -> HashMap<NodeIndex, Label> {
    let mut stats = SearchStats::default();
    let mut labels: HashMap<NodeIndex, Label> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    labels.insert(
        start,
        Label {
            cost: 0.0,
            interchanges: 0,
            via: None,
        },
    );
    frontier.push(SearchState {
        node: start,
        cost: 0.0,
        interchanges: 0,
        line: None,
    });

    while let Some(current) = frontier.pop() {
        stats.popped += 1;

        if let Some(best) = labels.get(&current.node) {
            if current.cost > best.cost + COST_EPSILON
                || (current.cost == best.cost && current.interchanges > best.interchanges)
            {
                stats.stale += 1;
                continue;
            }
        }

        if current.node == goal {
            break;
        }

        for edge in graph.graph.edges(current.node) {
            stats.edges_explored += 1;
            let weight = edge.weight();
            let neighbor = edge.target();

            let cost = current.cost + metric.weight(weight);
            let interchanges = match current.line {
                Some(line) if line != weight.line => current.interchanges + 1,
                _ => current.interchanges,
            };

            let better = labels
                .get(&neighbor)
                .map_or(true, |best| best.is_improved_by(cost, interchanges));
            if !better {
                continue;
            }

            trace!(
                from = graph.graph[current.node].id(),
                to = weight.to.as_str(),
                line = weight.line.as_str(),
                cost,
                interchanges,
                "relaxed"
            );
            stats.improvements += 1;
            labels.insert(
                neighbor,
                Label {
                    cost,
                    interchanges,
                    via: Some((current.node, edge.id())),
                },
            );
            frontier.push(SearchState {
                node: neighbor,
                cost,
                interchanges,
                line: Some(weight.line.as_str()),
            });
        }
    }

    debug!(
        popped = stats.popped,
        stale = stats.stale,
        edges_explored = stats.edges_explored,
        improvements = stats.improvements,
        "search finished"
    );
    labels
}

/// Walk predecessor edges back from `goal`. `None` if `goal` was never reached.
fn reconstruct(
    graph: &TransitGraph,
    labels: &HashMap<NodeIndex, Label>,
    start: NodeIndex,
    goal: NodeIndex,
) -> Option<Vec<Leg>> {
    let mut legs = Vec::new();
    let mut current = goal;

    while current != start {
        let (prev, via) = labels.get(&current)?.via?;
        let edge = graph.graph.edge_weight(via)?;
        legs.push(Leg {
            from: graph.graph.node_weight(prev)?.clone(),
            to: graph.graph.node_weight(current)?.clone(),
            line: edge.line.clone(),
            distance_km: edge.distance_km,
            time_min: edge.time_min,
        });
        current = prev;
        // A predecessor chain can never be longer than the station count.
        if legs.len() > graph.station_count() {
            return None;
        }
    }

    legs.reverse();
    Some(legs)
}
