//! # Device Address Model
//!
//! An [`Address`] is one entry of the scan population: an IPv4 or IPv6
//! literal, optionally followed by a port (`10.0.0.5:8443`, `[fe80::1]:443`).
//! The port never takes part in validation, but it is kept so that requests go
//! to the exact endpoint the operator listed.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::debug;

/// Transport used to reach a device's status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// A validated device address, as written in the source (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    raw: String,
    ip: IpAddr,
}

impl Address {
    /// Validates `candidate` after trimming surrounding whitespace.
    ///
    /// Returns `None` when the host part is not an IP literal.
    pub fn parse(candidate: &str) -> Option<Self> {
        let raw: &str = candidate.trim();
        let ip: IpAddr = host_ip(raw)?;
        Some(Self {
            raw: raw.to_string(),
            ip,
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Root URL of the device for `scheme`, e.g. `https://10.0.0.5/`.
    ///
    /// Bare IPv6 literals are bracketed; forms that already carry a port are
    /// used verbatim.
    pub fn url(&self, scheme: Scheme) -> String {
        let bare_v6: bool = self.ip().is_ipv6() && !self.raw.starts_with('[');
        if bare_v6 {
            format!("{}://[{}]/", scheme.as_str(), self.raw)
        } else {
            format!("{}://{}/", scheme.as_str(), self.raw)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Self {
            raw: ip.to_string(),
            ip,
        }
    }
}

/// Extracts the IP literal from `s`, ignoring any port suffix.
fn host_ip(s: &str) -> Option<IpAddr> {
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Some(ip);
    }

    if let Ok(socket) = s.parse::<SocketAddr>() {
        return Some(socket.ip());
    }

    // Non-numeric suffixes such as "10.0.0.5:http" still validate on the host part.
    let (host, _port) = s.rsplit_once(':')?;
    host.parse::<Ipv4Addr>().ok().map(IpAddr::V4)
}

/// The scan population, split into addresses that will be probed and the
/// rejected candidates.
#[derive(Debug, Default, Clone)]
pub struct AddressList {
    pub valid: Vec<Address>,
    pub invalid: Vec<String>,
}

impl AddressList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one candidate line. A blank line is not an address, so it
    /// counts as invalid like any other malformed entry.
    pub fn push_candidate(&mut self, candidate: &str) {
        let trimmed: &str = candidate.trim();
        match Address::parse(trimmed) {
            Some(address) => self.valid.push(address),
            None => {
                debug!("Invalid address: {trimmed}");
                self.invalid.push(trimmed.to_string());
            }
        }
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AddressList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = AddressList::new();
        for candidate in iter {
            list.push_candidate(candidate.as_ref());
        }
        list
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn parse_accepts_plain_and_ported_literals() {
        let plain = Address::parse("10.1.2.3").unwrap();
        assert_eq!(plain.ip(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));

        let ported = Address::parse("10.1.2.3:8443").unwrap();
        assert_eq!(ported.ip(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(ported.as_str(), "10.1.2.3:8443");

        let named_port = Address::parse("10.1.2.3:http").unwrap();
        assert_eq!(named_port.ip(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));

        let v6 = Address::parse("fe80::1").unwrap();
        assert_eq!(v6.ip(), IpAddr::V6("fe80::1".parse::<Ipv6Addr>().unwrap()));

        let v6_ported = Address::parse("[::1]:443").unwrap();
        assert_eq!(v6_ported.ip(), IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn parse_trims_whitespace() {
        let address = Address::parse("  192.168.0.7 \t").unwrap();
        assert_eq!(address.as_str(), "192.168.0.7");
    }

    #[test]
    fn parse_rejects_non_literals() {
        assert!(Address::parse("not-an-ip").is_none());
        assert!(Address::parse("phone.example.com").is_none());
        assert!(Address::parse("10.0.0.256").is_none());
        assert!(Address::parse("10.0.0").is_none());
        assert!(Address::parse("").is_none());
    }

    #[test]
    fn url_brackets_bare_ipv6() {
        let v4 = Address::parse("10.0.0.5").unwrap();
        assert_eq!(v4.url(Scheme::Https), "https://10.0.0.5/");
        assert_eq!(v4.url(Scheme::Http), "http://10.0.0.5/");

        let v4_ported = Address::parse("10.0.0.5:8080").unwrap();
        assert_eq!(v4_ported.url(Scheme::Http), "http://10.0.0.5:8080/");

        let v6 = Address::parse("::1").unwrap();
        assert_eq!(v6.url(Scheme::Https), "https://[::1]/");

        let v6_ported = Address::parse("[::1]:8443").unwrap();
        assert_eq!(v6_ported.url(Scheme::Https), "https://[::1]:8443/");
    }

    #[test]
    fn list_counts_valid_and_invalid() {
        let list: AddressList = ["10.0.0.1", "not-an-ip", "", "   ", "10.0.0.2:80"]
            .into_iter()
            .collect();

        assert_eq!(list.valid_count(), 2);
        assert_eq!(list.invalid_count(), 3);
        assert_eq!(list.invalid, vec!["not-an-ip", "", ""]);
        let addrs: Vec<&str> = list.valid.iter().map(Address::as_str).collect();
        assert_eq!(addrs, vec!["10.0.0.1", "10.0.0.2:80"]);
    }
}
