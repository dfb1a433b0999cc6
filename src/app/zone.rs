//! Zones, relays, and the per-zone occupancy record.
//!
//! ```text
//!   Zone::Room      ──▶ Relay::Light1, Relay::Light2
//!   Zone::Bathroom  ──▶ Relay::Light3
//! ```
//!
//! Each zone's state lives in a single [`ZoneCell`] — one `AtomicU64`
//! holding the occupied flag in bit 63 and the last-motion timestamp
//! (milliseconds since boot) in bits 0..=62.  The motion source and
//! the control loop can touch the same zone concurrently without a lock,
//! and a reader always sees a whole record.

use core::fmt;
use core::str::FromStr;
use core::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// An independently monitored area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Zone {
    Room = 0,
    Bathroom = 1,
}

impl Zone {
    /// Number of zones — used to size per-zone arrays.
    pub const COUNT: usize = 2;

    /// Evaluation order used by every tick.
    pub const ALL: [Zone; Zone::COUNT] = [Zone::Room, Zone::Bathroom];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Bathroom => "bathroom",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a zone name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownZone(pub String);

impl fmt::Display for UnknownZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown zone '{}' (expected room or bathroom)", self.0)
    }
}

impl std::error::Error for UnknownZone {}

impl FromStr for Zone {
    type Err = UnknownZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "room" | "r" => Ok(Self::Room),
            "bathroom" | "bath" | "b" => Ok(Self::Bathroom),
            other => Err(UnknownZone(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// A relay output driving one light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Relay {
    Light1 = 0,
    Light2 = 1,
    Light3 = 2,
}

impl Relay {
    pub const COUNT: usize = 3;

    pub const ALL: [Relay; Relay::COUNT] = [Relay::Light1, Relay::Light2, Relay::Light3];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Logical relay command.  Physical polarity is the GPIO driver's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayLevel {
    On,
    Off,
}

impl RelayLevel {
    pub const fn from_lit(lit: bool) -> Self {
        if lit { Self::On } else { Self::Off }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

// ---------------------------------------------------------------------------
// Relay assignment
// ---------------------------------------------------------------------------

/// Static mapping from zone to the relays it drives.  Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayAssignment {
    relays: [&'static [Relay]; Zone::COUNT],
}

const ROOM_RELAYS: &[Relay] = &[Relay::Light1, Relay::Light2];
const BATHROOM_RELAYS: &[Relay] = &[Relay::Light3];

impl RelayAssignment {
    /// Room → Light1 + Light2, Bathroom → Light3.
    pub const fn standard() -> Self {
        Self {
            relays: [ROOM_RELAYS, BATHROOM_RELAYS],
        }
    }

    pub fn relays_for(&self, zone: Zone) -> &'static [Relay] {
        self.relays[zone.index()]
    }

    /// Zone that owns `relay`, if any.
    pub fn zone_of(&self, relay: Relay) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|zone| self.relays_for(*zone).contains(&relay))
    }
}

impl Default for RelayAssignment {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Zone state
// ---------------------------------------------------------------------------

/// Occupancy of one zone.  The timestamp only exists while occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    Idle,
    Occupied { last_motion_ms: u64 },
}

const OCCUPIED_BIT: u64 = 1 << 63;
const TIMESTAMP_MASK: u64 = OCCUPIED_BIT - 1;

impl ZoneState {
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied { .. })
    }

    const fn pack(self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Occupied { last_motion_ms } => OCCUPIED_BIT | (last_motion_ms & TIMESTAMP_MASK),
        }
    }

    const fn unpack(raw: u64) -> Self {
        if raw & OCCUPIED_BIT == 0 {
            Self::Idle
        } else {
            Self::Occupied {
                last_motion_ms: raw & TIMESTAMP_MASK,
            }
        }
    }
}

/// Lock-free storage for one [`ZoneState`].
#[derive(Debug)]
pub struct ZoneCell(AtomicU64);

impl ZoneCell {
    pub const fn idle() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn load(&self) -> ZoneState {
        ZoneState::unpack(self.0.load(Ordering::Acquire))
    }

    /// Mark occupied at `at_ms`, returning the previous state.
    pub fn record_motion(&self, at_ms: u64) -> ZoneState {
        let next = ZoneState::Occupied {
            last_motion_ms: at_ms,
        };
        ZoneState::unpack(self.0.swap(next.pack(), Ordering::AcqRel))
    }

    /// Flip to idle only if the cell still holds `observed`.
    ///
    /// Returns `false` when a motion edge landed after `observed` was
    /// loaded; the zone then stays occupied with the fresher timestamp.
    pub fn release_if_unchanged(&self, observed: ZoneState) -> bool {
        self.0
            .compare_exchange(
                observed.pack(),
                ZoneState::Idle.pack(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Default for ZoneCell {
    fn default() -> Self {
        Self::idle()
    }
}
