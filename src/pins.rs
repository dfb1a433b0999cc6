//! GPIO pin assignments for the roomlight controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::app::zone::{Relay, Zone};

// ---------------------------------------------------------------------------
// PIR motion sensors (HC-SR501, digital HIGH while motion is detected)
// ---------------------------------------------------------------------------

/// Room PIR output.  Rising edge = new motion.
pub const PIR_ROOM_GPIO: i32 = 17;
/// Bathroom PIR output.  Rising edge = new motion.
pub const PIR_BATHROOM_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Relay module inputs (opto-isolated, usually active LOW)
// ---------------------------------------------------------------------------

/// Room ceiling light.
pub const RELAY_LIGHT1_GPIO: i32 = 4;
/// Room desk / secondary light.
pub const RELAY_LIGHT2_GPIO: i32 = 5;
/// Bathroom light.
pub const RELAY_LIGHT3_GPIO: i32 = 6;

/// PIR input pin for a zone.
pub const fn pir_gpio(zone: Zone) -> i32 {
    match zone {
        Zone::Room => PIR_ROOM_GPIO,
        Zone::Bathroom => PIR_BATHROOM_GPIO,
    }
}

/// Output pin driving a relay.
pub const fn relay_gpio(relay: Relay) -> i32 {
    match relay {
        Relay::Light1 => RELAY_LIGHT1_GPIO,
        Relay::Light2 => RELAY_LIGHT2_GPIO,
        Relay::Light3 => RELAY_LIGHT3_GPIO,
    }
}
