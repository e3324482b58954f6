use std::path::PathBuf;

use thiserror::Error;

/// Failures while building the list of addresses to scan.
///
/// Individual malformed lines are not errors; they are counted in
/// [`crate::network::address::AddressList::invalid`]. These variants abort
/// the run before any device is contacted.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read address file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CIDR block '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },

    #[error("CIDR block {input} holds 2^{host_bits} addresses, the limit is 2^{max_bits}")]
    CidrTooLarge {
        input: String,
        host_bits: u8,
        max_bits: u8,
    },
}
