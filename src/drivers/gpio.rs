//! Raw GPIO output pin exposed through `embedded-hal`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the pin via [`hw_init::gpio_write`].
//! On host/sim: tracks the level in-memory only.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::drivers::hw_init;

/// A configured output pin, identified by its GPIO number.
#[derive(Debug)]
pub struct OutputGpio {
    gpio: i32,
    high: bool,
}

impl OutputGpio {
    /// Wrap a pin already configured as an output by [`hw_init`].
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    fn write(&mut self, high: bool) {
        hw_init::gpio_write(self.gpio, high);
        self.high = high;
    }
}

impl ErrorType for OutputGpio {
    type Error = Infallible;
}

impl OutputPin for OutputGpio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

impl StatefulOutputPin for OutputGpio {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}
