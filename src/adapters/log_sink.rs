//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger on the board, `env_logger` on the host).

use log::info;

use crate::app::events::{AppEvent, ZoneStatus};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn zone_summary(z: &ZoneStatus) -> String {
    match (z.since_motion_ms, z.remaining_ms) {
        (Some(since), Some(left)) => format!(
            "{}=OCCUPIED (motion {}s ago, off in {}s)",
            z.zone,
            since / 1000,
            left.div_ceil(1000)
        ),
        _ => format!("{}=idle", z.zone),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | all relays off, monitoring for motion");
            }
            AppEvent::MotionDetected { zone, at_ms, was_idle } => {
                if *was_idle {
                    info!("MOTION | motion detected in {} (t={}ms), lights on", zone, at_ms);
                } else {
                    info!("MOTION | motion detected in {} (t={}ms)", zone, at_ms);
                }
            }
            AppEvent::ZoneTimedOut { zone, idle_for_ms } => {
                info!(
                    "TIMEOUT | {} lights timeout - turning off (idle {}s)",
                    zone,
                    idle_for_ms / 1000
                );
            }
            AppEvent::Status(report) => {
                let zones: Vec<String> = report.zones.iter().map(zone_summary).collect();
                info!("STATUS | t={}ms | {}", report.at_ms, zones.join(" | "));
            }
            AppEvent::Shutdown => {
                info!("SHUTDOWN | shutting down lighting system, all lights off");
            }
        }
    }
}
