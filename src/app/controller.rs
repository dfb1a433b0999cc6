//! Occupancy controller — the hexagonal core.
//!
//! [`OccupancyController`] owns one [`ZoneCell`] per zone and turns motion
//! edges and periodic ticks into relay commands.  All I/O flows through
//! port traits injected at call sites, so the controller is testable with
//! mock adapters.
//!
//! ```text
//!  motion edge ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                  │  OccupancyController    │
//!  RelayPort   ◀── │  Room · Bathroom cells  │
//!                  └─────────────────────────┘
//! ```
//!
//! ## Per-zone state machine
//!
//! | From     | Trigger                        | To       |
//! |----------|--------------------------------|----------|
//! | Idle     | `on_motion`                    | Occupied |
//! | Occupied | `on_motion` (refresh timestamp)| Occupied |
//! | Occupied | `tick`, elapsed > timeout      | Idle     |
//! | Idle     | `tick`                         | Idle     |
//!
//! `shutdown` is layered on top: it forces every relay off without
//! touching zone state.
//!
//! Every method takes `&self`.  The simulated sensor and the control loop
//! share one `&'static` controller; zones never block each other.

use log::{debug, info};

use crate::config::{OffTiming, SystemConfig};

use super::events::{AppEvent, StatusReport, ZoneStatus};
use super::ports::{EventSink, RelayPort};
use super::zone::{Relay, RelayAssignment, RelayLevel, Zone, ZoneCell, ZoneState};

/// Drives light relays from per-zone occupancy.
#[derive(Debug)]
pub struct OccupancyController {
    zones: [ZoneCell; Zone::COUNT],
    assignment: RelayAssignment,
    timeout_ms: u64,
    off_timing: OffTiming,
}

impl OccupancyController {
    /// Construct with the standard relay wiring.  Every zone starts idle.
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_assignment(config, RelayAssignment::standard())
    }

    pub fn with_assignment(config: &SystemConfig, assignment: RelayAssignment) -> Self {
        Self {
            zones: [ZoneCell::idle(), ZoneCell::idle()],
            assignment,
            timeout_ms: config.light_timeout_ms,
            off_timing: config.off_timing,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every relay off and announce startup.
    pub fn start(&self, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.all_off(relays);
        sink.emit(&AppEvent::Started);
        info!(
            "OccupancyController started (timeout={}ms, off_timing={:?})",
            self.timeout_ms, self.off_timing
        );
    }

    /// Force every relay off ahead of process exit.
    ///
    /// Zone state is left untouched.  A tick that races past this call may
    /// re-assert ON for an occupied zone; shutdown is best-effort.
    pub fn shutdown(&self, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.all_off(relays);
        sink.emit(&AppEvent::Shutdown);
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Record a motion edge for `zone` observed at `now_ms`.
    ///
    /// Relays are not written here; the next tick applies them.
    pub fn on_motion(&self, zone: Zone, now_ms: u64, sink: &mut impl EventSink) {
        let prev = self.cell(zone).record_motion(now_ms);
        sink.emit(&AppEvent::MotionDetected {
            zone,
            at_ms: now_ms,
            was_idle: !prev.is_occupied(),
        });
    }

    /// Run one evaluation cycle: apply the timeout rule to every zone and
    /// write every assigned relay exactly once.
    pub fn tick(&self, now_ms: u64, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        for zone in Zone::ALL {
            let lit = self.evaluate(zone, now_ms, sink);
            self.drive_zone(zone, RelayLevel::from_lit(lit), relays);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn zone_state(&self, zone: Zone) -> ZoneState {
        self.cell(zone).load()
    }

    pub fn is_occupied(&self, zone: Zone) -> bool {
        self.zone_state(zone).is_occupied()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn off_timing(&self) -> OffTiming {
        self.off_timing
    }

    pub fn assignment(&self) -> &RelayAssignment {
        &self.assignment
    }

    /// Snapshot of every zone relative to `now_ms`.
    pub fn status(&self, now_ms: u64) -> StatusReport {
        let zones = Zone::ALL.map(|zone| match self.zone_state(zone) {
            ZoneState::Idle => ZoneStatus {
                zone,
                occupied: false,
                since_motion_ms: None,
                remaining_ms: None,
            },
            ZoneState::Occupied { last_motion_ms } => {
                let since = now_ms.saturating_sub(last_motion_ms);
                ZoneStatus {
                    zone,
                    occupied: true,
                    since_motion_ms: Some(since),
                    remaining_ms: Some(self.timeout_ms.saturating_sub(since)),
                }
            }
        });
        StatusReport { at_ms: now_ms, zones }
    }

    // ── Internal ──────────────────────────────────────────────

    fn cell(&self, zone: Zone) -> &ZoneCell {
        &self.zones[zone.index()]
    }

    /// Apply the timeout rule and return whether the zone's lights should
    /// be lit for this tick.
    fn evaluate(&self, zone: Zone, now_ms: u64, sink: &mut impl EventSink) -> bool {
        let observed = self.cell(zone).load();
        let ZoneState::Occupied { last_motion_ms } = observed else {
            return false;
        };

        // An edge stamped after `now_ms` was captured reads as zero elapsed.
        let elapsed = now_ms.saturating_sub(last_motion_ms);
        if elapsed <= self.timeout_ms {
            return true;
        }

        if !self.cell(zone).release_if_unchanged(observed) {
            debug!("{}: motion raced the timeout, staying occupied", zone);
            return true;
        }

        sink.emit(&AppEvent::ZoneTimedOut {
            zone,
            idle_for_ms: elapsed,
        });
        match self.off_timing {
            OffTiming::SameTick => false,
            OffTiming::NextTick => true,
        }
    }

    fn drive_zone(&self, zone: Zone, level: RelayLevel, relays: &mut impl RelayPort) {
        for &relay in self.assignment.relays_for(zone) {
            relays.set_relay(relay, level);
        }
    }

    fn all_off(&self, relays: &mut impl RelayPort) {
        for relay in Relay::ALL {
            relays.set_relay(relay, RelayLevel::Off);
        }
    }
}
