//! Simulated PIR sensors for the host build.
//!
//! Reads zone names from stdin, one per line (`room`, `bathroom`, `r`,
//! `b`, ...), and records a motion edge for each.  Stands in for the GPIO
//! ISRs so the control loop can be exercised end-to-end without hardware.
//!
//! Edges go straight into the controller from the reader thread, which
//! runs concurrently with the control loop's tick.

use std::io::BufRead;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::adapters::log_sink::LogEventSink;
use crate::app::controller::OccupancyController;
use crate::app::ports::{EventSink, TimePort};
use crate::app::zone::Zone;

/// Outcome of one line of simulated sensor input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorLine {
    Motion(Zone),
    Blank,
    Unknown(String),
}

pub fn parse_line(line: &str) -> SensorLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return SensorLine::Blank;
    }
    match trimmed.parse::<Zone>() {
        Ok(zone) => SensorLine::Motion(zone),
        Err(_) => SensorLine::Unknown(trimmed.to_string()),
    }
}

/// Feed every line of `input` to the controller until EOF.
///
/// Returns the number of motion edges recorded.
pub fn pump<R, C, S>(
    input: R,
    controller: &OccupancyController,
    clock: &C,
    sink: &mut S,
) -> usize
where
    R: BufRead,
    C: TimePort,
    S: EventSink,
{
    let mut edges = 0;
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("sim-sensor: stdin read failed: {}", e);
                break;
            }
        };
        match parse_line(&line) {
            SensorLine::Motion(zone) => {
                controller.on_motion(zone, clock.now_ms(), sink);
                edges += 1;
            }
            SensorLine::Blank => {}
            SensorLine::Unknown(word) => {
                warn!("sim-sensor: unknown zone {:?} (expected room or bathroom)", word);
            }
        }
    }
    edges
}

/// Spawn the stdin reader thread.
pub fn spawn<C>(
    controller: &'static OccupancyController,
    clock: C,
) -> std::io::Result<JoinHandle<()>>
where
    C: TimePort + Send + 'static,
{
    std::thread::Builder::new()
        .name("sim-sensor".into())
        .spawn(move || {
            info!("sim-sensor: type 'room' or 'bathroom' to trigger motion");
            let stdin = std::io::stdin();
            let edges = pump(stdin.lock(), controller, &clock, &mut LogEventSink);
            info!("sim-sensor: stdin closed after {} edges", edges);
        })
}
