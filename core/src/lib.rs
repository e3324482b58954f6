//! # battcheck engine
//!
//! Concurrent battery-status scanner for IP desk phones.
//!
//! A scan flows through four stages:
//!
//! * **Work queue** ([`scanner::queue`]): every valid address, loaded up front, closed when full.
//! * **Worker pool** ([`scanner`]): a fixed number of tasks, each owning its own
//!   [`http::PageFetcher`], that fetch a device's status page and run the
//!   [`extract::TableExtractor`] on it.
//! * **Aggregator** ([`aggregator`]): the single consumer of worker outcomes; it
//!   classifies devices and owns every counter.
//! * **Reports** ([`report`]): the all-results and bad-only sinks.

pub mod aggregator;
pub mod error;
pub mod extract;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
