//! System-wide constants for the parking lot workspace.
//!
//! Single source of truth for capacity limits and cycle timing.

/// Maximum number of vehicles parked in one lot at the same time.
pub const MAX_CAPACITY: usize = 150;

/// Largest `max_capacity` a lot configuration may request.
pub const MAX_CAPACITY_LIMIT: usize = 100_000;

/// Default scan cycle time in microseconds (10 ms).
pub const CYCLE_TIME_US: u32 = 10_000;

/// Shortest accepted scan cycle [µs].
pub const CYCLE_TIME_US_MIN: u32 = 100;

/// Longest accepted scan cycle [µs].
pub const CYCLE_TIME_US_MAX: u32 = 1_000_000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/parking/lot.toml";
