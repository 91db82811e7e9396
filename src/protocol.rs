//! Decoder for the flight-information service's JSON responses.

use crate::types::FlightRecord;
use serde::de::Error as _;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed flight list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level field holding the flight array.
const FLIGHTS_FIELD: &str = "Flights";

/// Parse a provider response into its flight records, in source order.
///
/// The root must be a JSON object with a `Flights` array. Unknown fields are
/// ignored; modeled fields missing from a single flight default to zero values.
pub fn parse_flights(data: &[u8]) -> Result<Vec<FlightRecord>, ParseError> {
    // Decoding into a map rejects arrays and scalars at the root.
    let mut root: Map<String, Value> = serde_json::from_slice(data)?;

    let flights = root
        .remove(FLIGHTS_FIELD)
        .ok_or_else(|| serde_json::Error::missing_field(FLIGHTS_FIELD))?;

    let records: Vec<FlightRecord> = serde_json::from_value(flights)?;

    tracing::debug!("Parsed {} flights from {} bytes", records.len(), data.len());

    Ok(records)
}
