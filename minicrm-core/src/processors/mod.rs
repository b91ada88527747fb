//! Processors driving the ingestion pipeline.
//!
//! - `DepositIngestor`: receives `RecordDeposit`, writes the analytical row and
//!   the conditional campaign log entry

pub mod ingestor;

pub use ingestor::{DepositIngestor, IngestOutcome, RecordDeposit};
