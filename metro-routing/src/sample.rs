//! Six-station demo network
//!
//! - Red: Central - Park Street - Lake View - Museum
//! - Blue: Central - Museum - Airport
//! - Green: Park Street - Riverside - Airport
//!
//! Park Street joins Red and Green, Museum joins Red and Blue.

use crate::graph::TransitGraph;

const STATIONS: [(&str, &str); 6] = [
    ("A", "Central"),
    ("B", "Park Street"),
    ("C", "Lake View"),
    ("D", "Museum"),
    ("E", "Airport"),
    ("F", "Riverside"),
];

// (from, to, distance_km, time_min, line)
const ROUTES: [(&str, &str, f64, f64, &str); 7] = [
    ("A", "B", 2.0, 4.0, "Red"),
    ("B", "C", 3.0, 6.0, "Red"),
    ("C", "D", 2.5, 5.0, "Red"),
    ("A", "D", 6.0, 10.0, "Blue"),
    ("D", "E", 8.0, 12.0, "Blue"),
    ("B", "F", 4.0, 7.0, "Green"),
    ("F", "E", 6.0, 11.0, "Green"),
];

/// Build the demo network, every route bidirectional
pub fn sample_network() -> TransitGraph {
    let mut graph = TransitGraph::new();
    for (id, name) in STATIONS {
        graph.add_station(id, name);
    }
    for (from, to, distance_km, time_min, line) in ROUTES {
        graph
            .add_route(from, to, distance_km, time_min, line, true)
            .unwrap_or_else(|e| unreachable!("sample route {from}-{to} is valid: {e}"));
    }
    graph
}
