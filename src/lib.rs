//! Departure/arrival airport correlation for scheduled flights.
//!
//! This library provides functionality to:
//! - Fetch scheduled departures and arrivals for an airport from Avinor's flight API
//! - Parse the JSON flight lists
//! - Group flights by destination (departures) or origin (arrivals)
//! - Find the airports present in both groupings
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Client    │───▶│  Protocol   │───▶│  Correlate  │
//! │   (HTTP)    │    │  (Parser)   │    │ (Group/Join)│
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                                     │
//!        └─────────────┬───────────────────────┘
//!                      ▼
//!              ┌─────────────┐
//!              │ Comparison  │
//!              │(Orchestrator)│
//!              └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use turnaround::{
//!     client::{ClientConfig, FlightClient, TimeWindow},
//!     comparison::{Comparison, ComparisonConfig},
//! };
//! use chrono::DateTime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FlightClient::new(ClientConfig::default())?;
//!
//!     let config = ComparisonConfig {
//!         airport: "OSL".to_string(),
//!         departures: TimeWindow::new(
//!             DateTime::parse_from_rfc3339("2019-10-04T05:00:00+01:00")?,
//!             DateTime::parse_from_rfc3339("2019-10-04T10:00:00+01:00")?,
//!         ),
//!         arrivals: TimeWindow::new(
//!             DateTime::parse_from_rfc3339("2019-10-06T13:00:00+01:00")?,
//!             DateTime::parse_from_rfc3339("2019-10-06T19:00:00+01:00")?,
//!         ),
//!     };
//!
//!     let report = Comparison::new(client, config).run().await?;
//!
//!     for (airport, matched) in report.correlation().sorted() {
//!         println!("{}: {} out, {} in", airport, matched.departures.len(), matched.arrivals.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod comparison;
pub mod correlate;
pub mod protocol;
pub mod report;
pub mod types;

pub use client::{ClientConfig, FlightClient, FlightSource, TimeWindow};
pub use comparison::{Comparison, ComparisonConfig, ComparisonReport};
pub use correlate::{correlate, group, AirportGrouping, CorrelationResult, MatchedFlights};
pub use protocol::parse_flights;
pub use types::{Direction, FlightRecord, KeyRule};
