//! Relay bank adapter — bridges the relay drivers to [`RelayPort`].
//!
//! Owns one [`RelayDriver`] per light.  This is the only module that turns
//! a domain relay command into a pin write; on non-espidf targets the
//! underlying pins are simulated.

use log::debug;

use crate::app::ports::RelayPort;
use crate::app::zone::{Relay, RelayLevel};
use crate::drivers::gpio::OutputGpio;
use crate::drivers::relay::RelayDriver;
use crate::pins;

/// Concrete adapter that puts every light relay behind [`RelayPort`].
pub struct RelayBank {
    relays: [RelayDriver<OutputGpio>; Relay::COUNT],
}

impl RelayBank {
    /// Claim the relay pins and drive every relay off.
    pub fn new(active_low: bool) -> Self {
        Self {
            relays: Relay::ALL.map(|relay| {
                let pin = OutputGpio::new(pins::relay_gpio(relay));
                let Ok(driver) = RelayDriver::new(pin, active_low);
                driver
            }),
        }
    }

    pub fn level(&self, relay: Relay) -> RelayLevel {
        self.relays[relay.index()].level()
    }

    /// Logical level of every relay, indexed by [`Relay::index`].
    pub fn levels(&self) -> [RelayLevel; Relay::COUNT] {
        Relay::ALL.map(|relay| self.level(relay))
    }
}

impl RelayPort for RelayBank {
    fn set_relay(&mut self, relay: Relay, level: RelayLevel) {
        let driver = &mut self.relays[relay.index()];
        if driver.level() != level {
            debug!("relay {:?} -> {:?}", relay, level);
        }
        // OutputGpio writes are infallible.
        let Ok(()) = driver.set(level);
    }
}
