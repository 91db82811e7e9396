//! Core data types for scheduled flights.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Whether a flight list holds departures from or arrivals at the queried airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Departure,
    Arrival,
}

impl Direction {
    /// Value of the provider's `direction` query parameter.
    pub const fn query_value(&self) -> &'static str {
        match self {
            Self::Departure => "d",
            Self::Arrival => "a",
        }
    }

    /// Airport used to bucket flights of this direction.
    ///
    /// Departures are keyed by where they go, arrivals by where they come from.
    pub const fn key_rule(&self) -> KeyRule {
        match self {
            Self::Departure => KeyRule::Destination,
            Self::Arrival => KeyRule::Origin,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Departure => write!(f, "departures"),
            Self::Arrival => write!(f, "arrivals"),
        }
    }
}

/// Selects which airport code of a record is its grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRule {
    Origin,
    Destination,
}

impl KeyRule {
    pub fn extract<'a>(&self, record: &'a FlightRecord) -> &'a str {
        match self {
            Self::Origin => &record.origin_code,
            Self::Destination => &record.destination_code,
        }
    }
}

/// One scheduled flight leg as published by the flight-information service.
///
/// Field names follow the provider's JSON keys. Any modeled field that is
/// missing or `null` decodes to its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlightRecord {
    /// Origin IATA code
    #[serde(rename = "FromAirport", deserialize_with = "null_as_default")]
    pub origin_code: String,
    #[serde(rename = "FromAirportName", deserialize_with = "null_as_default")]
    pub origin_name: String,
    /// Destination IATA code
    #[serde(rename = "ToAirport", deserialize_with = "null_as_default")]
    pub destination_code: String,
    #[serde(rename = "ToAirportName", deserialize_with = "null_as_default")]
    pub destination_name: String,
    #[serde(rename = "AirlineName", deserialize_with = "null_as_default")]
    pub carrier_name: String,
    /// Carrier flight designator, e.g. `SK4675`
    #[serde(rename = "FlightId", deserialize_with = "null_as_default")]
    pub flight_id: String,
    /// Scheduled time in seconds since the Unix epoch
    #[serde(rename = "Timestamp", deserialize_with = "null_as_default")]
    pub scheduled_epoch: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FlightRecord {
    /// True when the flight id and both airport codes are present.
    pub fn is_complete(&self) -> bool {
        !self.flight_id.is_empty()
            && !self.origin_code.is_empty()
            && !self.destination_code.is_empty()
    }

    pub fn scheduled_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.scheduled_epoch, 0).single()
    }

    pub fn scheduled_local(&self) -> Option<DateTime<Local>> {
        self.scheduled_utc().map(|t| t.with_timezone(&Local))
    }

    /// Renders the leg from the point of view of the queried airport: the far
    /// end is the destination for departures and the origin for arrivals.
    pub fn display(&self, direction: Direction) -> FlightLine<'_> {
        FlightLine {
            record: self,
            direction,
        }
    }
}

/// One-line rendering of a flight, `HH:MM - Name (CODE) - Carrier ID`.
pub struct FlightLine<'a> {
    record: &'a FlightRecord,
    direction: Direction,
}

impl fmt::Display for FlightLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        let (name, code) = match self.direction {
            Direction::Departure => (&r.destination_name, &r.destination_code),
            Direction::Arrival => (&r.origin_name, &r.origin_code),
        };

        match r.scheduled_local() {
            Some(t) => write!(f, "{}", t.format("%H:%M"))?,
            None => write!(f, "--:--")?,
        }

        write!(
            f,
            " - {} ({}) - {} {}",
            name, code, r.carrier_name, r.flight_id
        )
    }
}
