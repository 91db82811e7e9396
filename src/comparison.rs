//! Runs the departure and arrival queries and correlates their airports.

use crate::client::{ClientError, FlightSource, TimeWindow};
use crate::correlate::{self, AirportGrouping, CorrelationResult};
use crate::protocol::{self, ParseError};
use crate::types::{Direction, FlightRecord};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("Fetching {direction} failed: {source}")]
    Client {
        direction: Direction,
        #[source]
        source: ClientError,
    },
    #[error("Parsing {direction} failed: {source}")]
    Parse {
        direction: Direction,
        #[source]
        source: ParseError,
    },
}

/// What to compare: one airport, two independent windows.
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    /// IATA code of the queried airport
    pub airport: String,
    /// Window for departures
    pub departures: TimeWindow,
    /// Window for arrivals
    pub arrivals: TimeWindow,
}

/// Flights of one direction together with their airport grouping.
#[derive(Debug, Clone)]
pub struct DirectionResult {
    pub direction: Direction,
    pub window: TimeWindow,
    pub flights: Vec<FlightRecord>,
    pub grouping: AirportGrouping,
    pub bytes_received: usize,
}

/// Output of a completed comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub airport: String,
    pub departures: DirectionResult,
    pub arrivals: DirectionResult,
}

impl ComparisonReport {
    /// Airports reached by a departure and served by an arrival.
    pub fn correlation(&self) -> CorrelationResult<'_> {
        correlate::correlate(&self.departures.grouping, &self.arrivals.grouping)
    }
}

/// Fetches both directions one after the other, then groups them.
pub struct Comparison<S> {
    source: S,
    config: ComparisonConfig,
}

impl<S: FlightSource> Comparison<S> {
    pub fn new(source: S, config: ComparisonConfig) -> Self {
        Self { source, config }
    }

    /// Run the comparison. The first fetch or parse error aborts the run.
    pub async fn run(&self) -> Result<ComparisonReport, ComparisonError> {
        tracing::info!("Comparing departures vs arrivals at {}", self.config.airport);

        let departures = self
            .fetch_and_group(Direction::Departure, self.config.departures)
            .await?;
        let arrivals = self
            .fetch_and_group(Direction::Arrival, self.config.arrivals)
            .await?;

        Ok(ComparisonReport {
            airport: self.config.airport.clone(),
            departures,
            arrivals,
        })
    }

    async fn fetch_and_group(
        &self,
        direction: Direction,
        window: TimeWindow,
    ) -> Result<DirectionResult, ComparisonError> {
        let start = Instant::now();

        let data = self
            .source
            .fetch(&self.config.airport, direction, window)
            .await
            .map_err(|source| ComparisonError::Client { direction, source })?;

        let flights = protocol::parse_flights(&data)
            .map_err(|source| ComparisonError::Parse { direction, source })?;

        let incomplete = flights.iter().filter(|f| !f.is_complete()).count();
        if incomplete > 0 {
            tracing::warn!(
                "{} of {} {} lack a flight id or airport code",
                incomplete,
                flights.len(),
                direction
            );
        }

        let grouping = correlate::group(&flights, direction.key_rule());

        tracing::info!(
            "Fetched {} {} ({} airports) in {:?} ({} bytes)",
            flights.len(),
            direction,
            grouping.len(),
            start.elapsed(),
            data.len()
        );

        Ok(DirectionResult {
            direction,
            window,
            flights,
            grouping,
            bytes_received: data.len(),
        })
    }
}
