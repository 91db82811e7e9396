//! Text rendering of comparison results.

use crate::comparison::ComparisonReport;
use crate::correlate::CorrelationResult;
use crate::types::{Direction, FlightRecord};
use std::fmt::Write;

/// Display format for window bounds, e.g. `Oct  4 05:00:00`.
const STAMP: &str = "%b %e %H:%M:%S";

/// Header line plus one line per departure, followed by a blank line.
pub fn render_departures(report: &ComparisonReport) -> String {
    let departures = &report.departures;
    let mut out = format!(
        "{} Departures from {} between {} and {}:\n",
        departures.flights.len(),
        report.airport,
        departures.window.start.format(STAMP),
        departures.window.end.format(STAMP)
    );

    for flight in &departures.flights {
        let _ = writeln!(out, "{}", flight.display(Direction::Departure));
    }
    out.push('\n');

    out
}

/// One block per shared airport, in code order.
pub fn render_correlation(correlation: &CorrelationResult<'_>) -> String {
    if correlation.is_empty() {
        return "No airport has both a departure and an arrival in the given windows\n".to_string();
    }

    let mut out = String::new();
    for (airport, matched) in correlation.sorted() {
        let _ = writeln!(out, "{}:", airport);
        let _ = writeln!(out, "Departures: {}", join(matched.departures, Direction::Departure));
        let _ = writeln!(out, "Arrivals: {}", join(matched.arrivals, Direction::Arrival));
        out.push('\n');
    }
    out
}

fn join(flights: &[FlightRecord], direction: Direction) -> String {
    flights
        .iter()
        .map(|f| f.display(direction).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
