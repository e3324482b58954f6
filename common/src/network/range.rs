//! # CIDR Expansion
//!
//! Turns a block such as `192.168.1.0/24` into every address it contains,
//! network and broadcast addresses included.

use std::net::IpAddr;

use pnet::ipnetwork::IpNetwork;

use crate::error::SourceError;
use crate::network::address::Address;

/// Largest block (in host bits) that will be expanded.
pub const MAX_HOST_BITS: u8 = 20;

/// Parses CIDR notation. A bare address without `/prefix` is rejected.
pub fn parse_cidr(input: &str) -> Result<IpNetwork, SourceError> {
    let input: &str = input.trim();
    if !input.contains('/') {
        return Err(SourceError::InvalidCidr {
            input: input.to_string(),
            reason: "missing '/prefix'".to_string(),
        });
    }

    input
        .parse::<IpNetwork>()
        .map_err(|e| SourceError::InvalidCidr {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Number of host bits in `network`.
pub fn host_bits(network: &IpNetwork) -> u8 {
    let width: u8 = match network {
        IpNetwork::V4(_) => 32,
        IpNetwork::V6(_) => 128,
    };
    width - network.prefix()
}

/// Every address of `network`, from the network address to the last one.
pub fn expand(network: IpNetwork) -> impl Iterator<Item = IpAddr> {
    network.iter()
}

/// Expands a CIDR block into scan addresses, refusing oversized blocks.
pub fn cidr_addresses(input: &str) -> Result<Vec<Address>, SourceError> {
    let network: IpNetwork = parse_cidr(input)?;
    let bits: u8 = host_bits(&network);
    if bits > MAX_HOST_BITS {
        return Err(SourceError::CidrTooLarge {
            input: input.trim().to_string(),
            host_bits: bits,
            max_bits: MAX_HOST_BITS,
        });
    }

    Ok(expand(network).map(Address::from).collect())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
