use std::time::Duration;

pub const DEFAULT_TEMP_THRESHOLD: f64 = 50.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 10;

/// Settings for a single scan run.
///
/// Built once by the caller and handed to the engine by reference; nothing
/// in the engine mutates it after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Battery temperature (°C) above which a device is flagged as running hot.
    pub temp_threshold: f64,
    /// Per-request timeout for every HTTP(S) attempt.
    pub timeout_secs: u64,
    /// Emit per-address tracing.
    pub verbose: bool,
    /// Number of concurrent scan workers.
    pub workers: usize,
    /// Cancel the whole scan on the first unreadable device page instead of
    /// recording it as `Unknown` and moving on.
    pub abort_on_parse_error: bool,
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Worker count, never below one.
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            temp_threshold: DEFAULT_TEMP_THRESHOLD,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            workers: DEFAULT_WORKERS,
            abort_on_parse_error: false,
        }
    }
}
