//! Shipment-tracking dashboard core: ingest sheet rows, classify and
//! aggregate shipments, and derive the filtered views the dashboard draws.

pub mod auth;
pub mod columns;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod record;
pub mod refresh;
pub mod session;
pub mod source;
pub mod state;
pub mod stats;
pub mod status;
pub mod table;
pub mod trend;
