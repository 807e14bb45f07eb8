//! Shared types for the rollup bridge.
//!
//! Everything that crosses a crate boundary lives here: fixed-width chain
//! identifiers, receipts and their log entries, operation requests and
//! signed transactions, the submission outcome, chain parameters, the
//! cancellation token and the error taxonomy.

pub mod cancel;
pub mod common;
pub mod errors;
pub mod params;
pub mod receipt;
pub mod request;

pub use cancel::CancellationToken;
pub use common::*;
pub use errors::{BridgeError, DecodeError, Result};
pub use params::{ChainParams, TimeTicks};
pub use receipt::{LogEntry, Outcome, Receipt};
pub use request::{OperationRequest, SignedTransaction};
