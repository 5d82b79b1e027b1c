use crate::error::ConfigError;

pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_WINDOW_SIZE: usize = 100;
pub const DEFAULT_WORKER_COUNT: usize = 1;

pub const MAX_WORKER_COUNT: usize = 1024;
/// Each in-flight record owns a channel slot and a reorder slot.
pub const MAX_IN_FLIGHT: usize = 1 << 20;

/// Reorder slots kept per worker when no explicit in-flight window is given.
const IN_FLIGHT_PER_WORKER: usize = 4;

/// Parameters of a single run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub threshold: f64,
    pub window_size: usize,
    pub worker_count: usize,
    pub mask_mode: bool,
    /// Upper bound on records dispatched but not yet emitted.
    pub in_flight: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            mask_mode: false,
            in_flight: None,
        }
    }
}

impl RunConfig {
    /// Builds and validates a configuration.
    pub fn new(
        threshold: f64,
        window_size: usize,
        worker_count: usize,
        mask_mode: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            threshold,
            window_size,
            worker_count,
            mask_mode,
            in_flight: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_in_flight(mut self, in_flight: Option<usize>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if self.worker_count == 0 || self.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKER_COUNT,
            });
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if let Some(in_flight) = self.in_flight {
            if in_flight < self.worker_count {
                return Err(ConfigError::InvalidInFlight {
                    in_flight,
                    workers: self.worker_count,
                });
            }
            if in_flight > MAX_IN_FLIGHT {
                return Err(ConfigError::InFlightTooLarge {
                    in_flight,
                    max: MAX_IN_FLIGHT,
                });
            }
        }
        Ok(())
    }

    /// Size of the reorder slot table, never above `MAX_IN_FLIGHT`.
    pub fn in_flight_window(&self) -> usize {
        let derived = self
            .worker_count
            .checked_mul(IN_FLIGHT_PER_WORKER)
            .unwrap_or(MAX_IN_FLIGHT);
        self.in_flight.unwrap_or(derived).clamp(1, MAX_IN_FLIGHT)
    }
}
