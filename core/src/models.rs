use std::fmt;

use battcheck_common::network::address::Address;

/// Health value of a device whose battery reports no problem.
pub const GOOD_HEALTH: &str = "Good";
/// Health sentinel for devices that were unreachable or returned no readable page.
pub const UNKNOWN_HEALTH: &str = "Unknown";

/// Battery status of one device, as written to the reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub address: Address,
    /// `"Good"`, another device-reported string, `"Unknown"`, or empty when
    /// the page carried no health row.
    pub health: String,
    /// Free text such as `"31.0 degrees Celsius"`; empty when not reported.
    pub temperature: String,
}

impl ScanResult {
    pub fn new(address: Address, health: impl Into<String>, temperature: impl Into<String>) -> Self {
        Self {
            address,
            health: health.into(),
            temperature: temperature.into(),
        }
    }

    pub fn unknown(address: Address) -> Self {
        Self::new(address, UNKNOWN_HEALTH, "")
    }

    pub fn is_good(&self) -> bool {
        self.health == GOOD_HEALTH
    }

    pub fn is_unknown(&self) -> bool {
        self.health == UNKNOWN_HEALTH
    }

    /// The report columns: address, health, temperature.
    pub fn csv_record(&self) -> [&str; 3] {
        [self.address.as_str(), &self.health, &self.temperature]
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [health: {}, temperature: {}]",
            self.address, self.health, self.temperature
        )
    }
}

/// What a worker hands to the aggregator for one address.
///
/// Failures travel as data so that only the aggregator ever touches counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Success(ScanResult),
    Unreachable { address: Address, reason: String },
    ParseError { address: Address, reason: String },
}

impl ScanOutcome {
    /// The report row for this outcome; failures become `"Unknown"`.
    pub fn into_result(self) -> ScanResult {
        match self {
            ScanOutcome::Success(result) => result,
            ScanOutcome::Unreachable { address, .. } | ScanOutcome::ParseError { address, .. } => {
                ScanResult::unknown(address)
            }
        }
    }
}
