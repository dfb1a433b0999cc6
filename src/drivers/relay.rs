//! Light relay driver.
//!
//! Translates the logical [`RelayLevel`] into the physical pin level the
//! relay module expects.  Most opto-isolated relay boards energise the coil
//! when their input is pulled LOW, so `active_low` defaults to true.
//!
//! This is the only place in the firmware that knows about polarity.
//!
//! ## Dual-target design
//!
//! Generic over any `embedded-hal` [`OutputPin`]: the board build passes
//! [`OutputGpio`](super::gpio::OutputGpio), tests pass an in-memory pin.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::zone::RelayLevel;

pub struct RelayDriver<P> {
    pin: P,
    active_low: bool,
    level: RelayLevel,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Wrap `pin` and drive it to the OFF level immediately.
    pub fn new(pin: P, active_low: bool) -> Result<Self, P::Error> {
        let mut driver = Self {
            pin,
            active_low,
            level: RelayLevel::Off,
        };
        driver.set(RelayLevel::Off)?;
        Ok(driver)
    }

    pub fn set(&mut self, level: RelayLevel) -> Result<(), P::Error> {
        self.pin.set_state(self.pin_state(level))?;
        self.level = level;
        Ok(())
    }

    pub fn level(&self) -> RelayLevel {
        self.level
    }

    pub fn is_on(&self) -> bool {
        self.level.is_on()
    }

    /// Physical pin state for a logical level.
    pub fn pin_state(&self, level: RelayLevel) -> PinState {
        PinState::from(level.is_on() != self.active_low)
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
