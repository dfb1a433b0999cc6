//! System configuration parameters
//!
//! All tunable parameters for the roomlight controller.  Defaults match the
//! installed hardware; the host build can override them from a JSON file.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Occupancy grace period after the last motion edge (5 minutes).
pub const LIGHT_TIMEOUT_MS: u64 = 300_000;

/// When the OFF write happens for a zone whose timeout just elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffTiming {
    /// The tick that observes the timeout writes OFF.
    #[default]
    SameTick,
    /// The tick that observes the timeout still writes ON; the following
    /// tick writes OFF.  One tick of extra latency.
    NextTick,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Occupancy ---
    /// Milliseconds without motion before a zone goes idle
    pub light_timeout_ms: u64,
    /// OFF write timing on the timeout transition
    pub off_timing: OffTiming,

    // --- Relays ---
    /// Relay modules energise on a LOW input
    pub relay_active_low: bool,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status report interval (seconds)
    pub status_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Occupancy
            light_timeout_ms: LIGHT_TIMEOUT_MS,
            off_timing: OffTiming::SameTick,

            // Relays
            relay_active_low: true,

            // Timing
            control_loop_interval_ms: 1000, // 1 Hz
            status_interval_secs: 60,       // 1/min
        }
    }
}

impl SystemConfig {
    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.light_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("light_timeout_ms must be > 0"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be > 0",
            ));
        }
        if u64::from(self.control_loop_interval_ms) >= self.light_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be shorter than light_timeout_ms",
            ));
        }
        if self.status_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("status_interval_secs must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Control ticks between two status reports.
    pub fn status_every_ticks(&self) -> u64 {
        let interval_ms = u64::from(self.control_loop_interval_ms.max(1));
        (u64::from(self.status_interval_secs) * 1000 / interval_ms).max(1)
    }
}
