//! Roomlight — Main Entry Point
//!
//! Two-zone occupancy lighting.  PIR motion in a zone lights its relays;
//! five minutes without motion turns them off again.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  RelayBank      LogEventSink   FileConfig    MonotonicClock    │
//! │  (RelayPort)    (EventSink)    (ConfigPort)  (TimePort)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         OccupancyController (pure logic)               │    │
//! │  │         Room cell · Bathroom cell                      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  PIR ISRs → EdgeQueue (espidf) · stdin sim-sensor (host)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use log::{info, warn};
use static_cell::StaticCell;

use roomlight::adapters::config_file::FileConfig;
use roomlight::adapters::log_sink::LogEventSink;
use roomlight::adapters::relays::RelayBank;
use roomlight::adapters::time::MonotonicClock;
use roomlight::app::controller::OccupancyController;
use roomlight::app::events::AppEvent;
use roomlight::app::ports::{ConfigError, ConfigPort, EventSink, TimePort};
use roomlight::config::SystemConfig;
use roomlight::drivers::hw_init;
use roomlight::events::{MOTION_EDGES, SHUTDOWN};

/// The controller is shared with the sim-sensor thread for the life of
/// the process.
static CONTROLLER: StaticCell<OccupancyController> = StaticCell::new();

// ── Logging ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    Ok(())
}

// ── Config ────────────────────────────────────────────────────

fn load_config() -> Result<SystemConfig> {
    let source = FileConfig::from_env();
    match source.load() {
        Ok(cfg) => {
            if let Some(path) = source.path() {
                info!("Config loaded from {}", path.display());
            }
            Ok(cfg)
        }
        Err(ConfigError::NotFound) => {
            info!("No config file, using defaults");
            Ok(SystemConfig::default())
        }
        Err(e) => Err(e).context("loading config"),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Roomlight v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_config()?;

    // ── 3. Hardware ───────────────────────────────────────────
    hw_init::init_peripherals(config.relay_active_low).context("peripheral init")?;
    hw_init::init_isr_service().context("ISR service init")?;
    hw_init::register_restart_hook().context("restart hook")?;

    // Block termination signals before any other thread exists.
    #[cfg(all(unix, not(target_os = "espidf")))]
    let _signals = roomlight::adapters::signals::install()?;

    // ── 4. Adapters + controller ──────────────────────────────
    let clock = MonotonicClock::new();
    let mut relays = RelayBank::new(config.relay_active_low);
    let mut log_sink = LogEventSink::new();

    let controller: &'static OccupancyController =
        CONTROLLER.init(OccupancyController::new(&config));
    controller.start(&mut relays, &mut log_sink);

    #[cfg(not(target_os = "espidf"))]
    let _sensor = roomlight::adapters::sim_sensor::spawn(controller, clock)
        .context("spawning sim-sensor")?;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let interval = std::time::Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let status_every = config.status_every_ticks();
    let mut ticks: u64 = 0;

    while !SHUTDOWN.is_requested() {
        MOTION_EDGES.drain(|edge| controller.on_motion(edge.zone, edge.at_ms, &mut log_sink));

        let dropped = MOTION_EDGES.take_dropped();
        if dropped > 0 {
            warn!("{} motion edges dropped (queue full)", dropped);
        }

        let now = clock.now_ms();
        controller.tick(now, &mut relays, &mut log_sink);

        ticks += 1;
        if ticks % status_every == 0 {
            log_sink.emit(&AppEvent::Status(controller.status(now)));
        }

        std::thread::sleep(interval);
    }

    // ── 6. Shutdown ───────────────────────────────────────────
    controller.shutdown(&mut relays, &mut log_sink);
    info!("Shutdown complete.");
    Ok(())
}
