//! One-shot hardware peripheral initialization.
//!
//! Configures the PIR inputs, the relay outputs, and the GPIO ISR service
//! using raw ESP-IDF sys calls.  Called once from `main()` before the
//! control loop starts; any failure here aborts startup.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use core::sync::atomic::{AtomicBool, Ordering};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed { gpio: i32, rc: i32 },
    IsrInstallFailed(i32),
    IsrRegisterFailed { gpio: i32, rc: i32 },
    ShutdownHookFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed { gpio, rc } => {
                write!(f, "GPIO{} config failed (rc={})", gpio, rc)
            }
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrRegisterFailed { gpio, rc } => {
                write!(f, "GPIO{} ISR registration failed (rc={})", gpio, rc)
            }
            Self::ShutdownHookFailed(rc) => write!(f, "shutdown hook registration failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::zone::{Relay, Zone};
use crate::pins;

/// Relay polarity captured at init so the restart hook can find the
/// inactive level without access to the relay bank.
static RELAY_ACTIVE_LOW: AtomicBool = AtomicBool::new(true);

/// Physical level that leaves a relay de-energised.
fn relay_off_level() -> bool {
    RELAY_ACTIVE_LOW.load(Ordering::Relaxed)
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(relay_active_low: bool) -> Result<(), HwInitError> {
    RELAY_ACTIVE_LOW.store(relay_active_low, Ordering::Relaxed);
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_pir_inputs()?;
        init_relay_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(relay_active_low: bool) -> Result<(), HwInitError> {
    RELAY_ACTIVE_LOW.store(relay_active_low, Ordering::Relaxed);
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_pir_inputs() -> Result<(), HwInitError> {
    for zone in Zone::ALL {
        let gpio = pins::pir_gpio(zone);
        // PIR modules drive a clean push-pull output; the pull-down keeps
        // the line quiet while a sensor is unplugged.
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        let rc = unsafe { gpio_config(&cfg) };
        if rc != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed { gpio, rc });
        }
    }

    info!("hw_init: PIR inputs configured (rising edge)");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_relay_outputs() -> Result<(), HwInitError> {
    let off = relay_off_level();
    for relay in Relay::ALL {
        let gpio = pins::relay_gpio(relay);
        // Latch the OFF level before switching the pin to output so the
        // relay never clicks on during boot.
        unsafe { gpio_set_level(gpio, u32::from(off)) };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let rc = unsafe { gpio_config(&cfg) };
        if rc != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed { gpio, rc });
        }
        unsafe { gpio_set_level(gpio, u32::from(off)) };
    }

    info!("hw_init: relay outputs configured (all off)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_relay_outputs().
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    log::trace!("gpio(sim): GPIO{} <- {}", pin, if high { "HIGH" } else { "LOW" });
}

/// Drive every relay pin to its inactive level, bypassing the relay bank.
/// Used by the restart hook where no owned driver is reachable.
pub fn force_relays_inactive() {
    let off = relay_off_level();
    for relay in Relay::ALL {
        gpio_write(pins::relay_gpio(relay), off);
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Zone encoded in the ISR user argument.
fn zone_from_isr_arg(arg: usize) -> Zone {
    if arg == Zone::Bathroom.index() {
        Zone::Bathroom
    } else {
        Zone::Room
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pir_gpio_isr(arg: *mut core::ffi::c_void) {
    use crate::events::{MOTION_EDGES, MotionEdge};

    let zone = zone_from_isr_arg(arg as usize);
    // SAFETY: esp_timer_get_time is a RTC counter read; safe in ISR context.
    let at_ms = (unsafe { esp_timer_get_time() } / 1_000) as u64;
    MOTION_EDGES.push(MotionEdge { zone, at_ms });
}

/// Install the GPIO ISR service and register the PIR edge handlers.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler only stamps
    // the time and pushes to the non-blocking edge queue.
    unsafe {
        let rc = gpio_install_isr_service(0);
        if rc != ESP_OK as i32 && rc != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(rc));
        }

        for zone in Zone::ALL {
            let gpio = pins::pir_gpio(zone);
            let rc = gpio_isr_handler_add(
                gpio,
                Some(pir_gpio_isr),
                zone.index() as *mut core::ffi::c_void,
            );
            if rc != ESP_OK as i32 {
                return Err(HwInitError::IsrRegisterFailed { gpio, rc });
            }
            gpio_intr_enable(gpio);
        }

        info!("hw_init: ISR service installed (pir room, pir bathroom)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped, motion comes from stdin");
    Ok(())
}

// ── Restart hook ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn relays_off_on_restart() {
    force_relays_inactive();
}

/// Make sure `esp_restart()` (panic, OTA, watchdog) leaves every light off.
#[cfg(target_os = "espidf")]
pub fn register_restart_hook() -> Result<(), HwInitError> {
    // SAFETY: registers a static function with no captured state.
    let rc = unsafe { esp_register_shutdown_handler(Some(relays_off_on_restart)) };
    if rc != ESP_OK as i32 {
        return Err(HwInitError::ShutdownHookFailed(rc));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn register_restart_hook() -> Result<(), HwInitError> {
    Ok(())
}
