//! Shared building blocks for the `battcheck` workspace.
//!
//! * [`config`]: the immutable scan configuration threaded through the engine.
//! * [`network`]: address validation, CIDR expansion and address list acquisition.
//! * [`error`]: errors raised while acquiring the scan population.

pub mod config;
pub mod error;
pub mod macros;
pub mod network;

#[doc(hidden)]
pub use tracing;
