//! Grouping flights by airport and intersecting departure and arrival groupings.

use crate::types::{FlightRecord, KeyRule};
use std::collections::HashMap;

/// Flights bucketed by airport code, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirportGrouping {
    groups: HashMap<String, Vec<FlightRecord>>,
}

impl AirportGrouping {
    pub fn get(&self, code: &str) -> Option<&[FlightRecord]> {
        self.groups.get(code).map(Vec::as_slice)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.groups.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FlightRecord])> {
        self.groups
            .iter()
            .map(|(code, flights)| (code.as_str(), flights.as_slice()))
    }

    /// Number of distinct airports.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Build a grouping in one pass over `flights`, keyed by `rule`.
pub fn group(flights: &[FlightRecord], rule: KeyRule) -> AirportGrouping {
    let mut groups: HashMap<String, Vec<FlightRecord>> = HashMap::new();

    for flight in flights {
        groups
            .entry(rule.extract(flight).to_owned())
            .or_default()
            .push(flight.clone());
    }

    AirportGrouping { groups }
}

/// Departure and arrival lists matched on one airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedFlights<'a> {
    pub departures: &'a [FlightRecord],
    pub arrivals: &'a [FlightRecord],
}

/// Airports present in both a departure grouping and an arrival grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationResult<'a> {
    matches: HashMap<&'a str, MatchedFlights<'a>>,
}

impl<'a> CorrelationResult<'a> {
    pub fn get(&self, code: &str) -> Option<&MatchedFlights<'a>> {
        self.matches.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.matches.contains_key(code)
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &MatchedFlights<'a>)> {
        self.matches.iter().map(|(code, m)| (*code, m))
    }

    /// Entries ordered by airport code.
    pub fn sorted(&self) -> Vec<(&'a str, MatchedFlights<'a>)> {
        let mut entries: Vec<_> = self.matches.iter().map(|(code, m)| (*code, *m)).collect();
        entries.sort_unstable_by_key(|(code, _)| *code);
        entries
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Intersect `departures` (grouped by destination) with `arrivals` (grouped
/// by origin). Airports present on only one side are left out.
pub fn correlate<'a>(
    departures: &'a AirportGrouping,
    arrivals: &'a AirportGrouping,
) -> CorrelationResult<'a> {
    // Probe the larger map with the smaller one's keys.
    let (small, large, small_is_departures) = if departures.len() <= arrivals.len() {
        (&departures.groups, &arrivals.groups, true)
    } else {
        (&arrivals.groups, &departures.groups, false)
    };

    let matches = small
        .iter()
        .filter_map(|(code, mine)| {
            let theirs = large.get(code)?;
            let (departures, arrivals) = if small_is_departures {
                (mine, theirs)
            } else {
                (theirs, mine)
            };
            Some((
                code.as_str(),
                MatchedFlights {
                    departures: departures.as_slice(),
                    arrivals: arrivals.as_slice(),
                },
            ))
        })
        .collect();

    CorrelationResult { matches }
}
