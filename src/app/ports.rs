//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ OccupancyController (domain)
//! ```
//!
//! Driven adapters (relay bank, clock, event sinks, config source) implement
//! these traits.  The [`OccupancyController`](super::controller::OccupancyController)
//! consumes them via generics, so the domain core never touches hardware
//! directly and never reasons about electrical polarity.

use crate::config::SystemConfig;

use super::zone::{Relay, RelayLevel};

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command light relays.
pub trait RelayPort {
    /// Drive `relay` to the logical `level`.  Idempotent; never deduplicated
    /// by the caller.
    fn set_relay(&mut self, relay: Relay, level: RelayLevel);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: monotonic clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Must never go backward.
pub trait TimePort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST run [`SystemConfig::validate`] before handing a
/// config back.  A missing source is reported as [`ConfigError::NotFound`]
/// so the caller can fall back to defaults.
pub trait ConfigPort {
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config source present (first boot, unset path).
    NotFound,
    /// The source exists but could not be read.
    Io(std::io::Error),
    /// The source could not be deserialised.
    Parse(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Io(e) => write!(f, "config I/O error: {}", e),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
