//! Transit network graph and interchange-aware route search
//!
//! Build a [`TransitGraph`] through its mutation API, then ask
//! [`find_shortest`] for the cheapest route between two stations:
//!
//! ```
//! use metro_routing::{find_shortest, Metric, TransitGraph};
//!
//! let mut graph = TransitGraph::new();
//! graph.add_station("A", "Central");
//! graph.add_station("B", "Park Street");
//! graph.add_route("A", "B", 2.0, 4.0, "Red", true)?;
//!
//! let route = find_shortest(&graph, "central", "park street", Metric::Time)?;
//! assert_eq!(route.total_time_min, 4.0);
//! # Ok::<(), metro_routing::Error>(())
//! ```

pub mod edge;
pub mod graph;
pub mod sample;
pub mod search;
pub mod station;

pub use edge::Edge;
pub use graph::TransitGraph;
pub use metro_common::{Error, Result};
pub use search::{find_shortest, Leg, Metric, RouteResult};
pub use station::Station;
