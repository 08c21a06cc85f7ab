//! Driver layer for metro-route: network files, report formatting and the
//! interactive console. Routing itself lives in `metro-routing`.

pub mod console;
pub mod network;
pub mod report;

pub use console::Console;
pub use network::{load_graph, NetworkFile};
