//! Human-readable output for routes and the sample checks

use std::io::{self, Write};

use metro_routing::{find_shortest, Metric, RouteResult, TransitGraph};

/// Multi-line route report: station chain, then the totals line
pub fn format_route(route: &RouteResult) -> String {
    format!(
        "Route:\n{}\nLines: {}\n{}",
        route.station_names().join(" -> "),
        if route.legs.is_empty() {
            "-".to_string()
        } else {
            route.line_sequence().join(", ")
        },
        format_totals(route)
    )
}

pub fn format_totals(route: &RouteResult) -> String {
    format!(
        "Total distance: {:.2} km | Total time: {:.1} min | Interchanges: {}",
        route.total_distance_km, route.total_time_min, route.interchanges
    )
}

/// One sample query run by [`run_checks`]
struct Check {
    label: &'static str,
    from: &'static str,
    to: &'static str,
    metric: Metric,
}

const CHECKS: [Check; 2] = [
    Check {
        label: "Central->Airport",
        from: "Central",
        to: "Airport",
        metric: Metric::Time,
    },
    Check {
        label: "A->E",
        from: "A",
        to: "E",
        metric: Metric::Distance,
    },
];

/// Run the sample queries against `graph`, writing one line each.
///
/// Returns whether every query found a route.
pub fn run_checks<W: Write>(graph: &TransitGraph, out: &mut W) -> io::Result<bool> {
    writeln!(out, "Running sample checks...")?;
    let mut pass = true;

    for (i, check) in CHECKS.iter().enumerate() {
        match find_shortest(graph, check.from, check.to, check.metric) {
            Ok(route) => {
                let cost = match check.metric {
                    Metric::Time => format!("time={:.1}min", route.total_time_min),
                    Metric::Distance => format!("dist={:.2}km", route.total_distance_km),
                };
                writeln!(
                    out,
                    "Check{}: {} | {} inter={} | path={}",
                    i + 1,
                    check.label,
                    cost,
                    route.interchanges,
                    route.station_names().join("->")
                )?;
            }
            Err(e) => {
                pass = false;
                writeln!(out, "Check{}: {} failed - {}", i + 1, check.label, e)?;
            }
        }
    }

    writeln!(out, "Checks completed. pass={pass}")?;
    Ok(pass)
}
