//! Outbound application events.
//!
//! The [`OccupancyController`](super::controller::OccupancyController) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them.

use super::zone::Zone;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started; every relay was driven off.
    Started,

    /// A motion edge was recorded for `zone`.
    /// `was_idle` is true when this edge turned the zone occupied.
    MotionDetected { zone: Zone, at_ms: u64, was_idle: bool },

    /// `zone` saw no motion for longer than the timeout and is now idle.
    ZoneTimedOut { zone: Zone, idle_for_ms: u64 },

    /// Periodic status snapshot.
    Status(StatusReport),

    /// Every relay was forced off ahead of process exit.
    Shutdown,
}

/// Per-zone view used in [`StatusReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStatus {
    pub zone: Zone,
    pub occupied: bool,
    /// Milliseconds since the last motion edge; `None` while idle.
    pub since_motion_ms: Option<u64>,
    /// Milliseconds left before the timeout fires; `None` while idle.
    pub remaining_ms: Option<u64>,
}

/// A point-in-time snapshot of every zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub at_ms: u64,
    pub zones: [ZoneStatus; Zone::COUNT],
}
