//! Integration tests for the OccupancyController → relay pipeline.
//!
//! Drive the controller with explicit timestamps and assert on the relay
//! writes recorded by the mock adapter.

use crate::mock_hw::{MockRelays, RecordingSink};

use roomlight::app::controller::OccupancyController;
use roomlight::app::events::AppEvent;
use roomlight::app::zone::{Relay, RelayLevel, Zone, ZoneState};
use roomlight::config::{LIGHT_TIMEOUT_MS, OffTiming, SystemConfig};

const TIMEOUT: u64 = LIGHT_TIMEOUT_MS;

fn make_controller(off_timing: OffTiming) -> (OccupancyController, MockRelays, RecordingSink) {
    let config = SystemConfig {
        off_timing,
        ..SystemConfig::default()
    };
    let ctl = OccupancyController::new(&config);
    let mut relays = MockRelays::new();
    let mut sink = RecordingSink::new();
    ctl.start(&mut relays, &mut sink);
    (ctl, relays, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_every_relay_off() {
    let (ctl, relays, sink) = make_controller(OffTiming::SameTick);
    for relay in Relay::ALL {
        assert_eq!(relays.level(relay), Some(RelayLevel::Off));
    }
    for zone in Zone::ALL {
        assert_eq!(ctl.zone_state(zone), ZoneState::Idle);
    }
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

// ── Motion → lights on ────────────────────────────────────────

#[test]
fn motion_lights_zone_on_next_tick() {
    for zone in Zone::ALL {
        let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
        relays.clear();
        ctl.on_motion(zone, 10_000, &mut sink);
        // on_motion alone never writes relays.
        assert!(relays.calls.is_empty());

        ctl.tick(10_000 + TIMEOUT - 1, &mut relays, &mut sink);
        assert!(ctl.is_occupied(zone));
        assert!(relays.zone_lit(zone), "{zone} should be lit");
    }
}

#[test]
fn every_tick_writes_every_relay_once() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, 0, &mut sink);
    relays.clear();

    for t in [1_000, 2_000, 3_000] {
        ctl.tick(t, &mut relays, &mut sink);
    }
    for relay in Relay::ALL {
        assert_eq!(relays.writes_to(relay), 3, "{relay:?}");
    }
}

// ── Timeout → lights off ──────────────────────────────────────

#[test]
fn timeout_turns_zone_off_same_tick() {
    for zone in Zone::ALL {
        let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
        ctl.on_motion(zone, 5_000, &mut sink);
        ctl.tick(6_000, &mut relays, &mut sink);
        assert!(relays.zone_lit(zone));

        ctl.tick(5_000 + TIMEOUT + 1, &mut relays, &mut sink);
        assert!(!ctl.is_occupied(zone));
        assert!(relays.zone_dark(zone));
        assert_eq!(sink.timeouts(), vec![zone]);
    }
}

#[test]
fn timeout_turns_zone_off_by_following_tick() {
    for zone in Zone::ALL {
        let (ctl, mut relays, mut sink) = make_controller(OffTiming::NextTick);
        ctl.on_motion(zone, 5_000, &mut sink);

        let t = 5_000 + TIMEOUT + 1;
        ctl.tick(t, &mut relays, &mut sink);
        assert!(!ctl.is_occupied(zone));
        assert!(relays.zone_lit(zone), "transition tick still writes ON");

        ctl.tick(t + 1_000, &mut relays, &mut sink);
        assert!(relays.zone_dark(zone));
        assert_eq!(sink.timeouts(), vec![zone]);
    }
}

#[test]
fn timeout_is_reported_once() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Bathroom, 0, &mut sink);
    for t in (0..10).map(|i| TIMEOUT + 1 + i * 1_000) {
        ctl.tick(t, &mut relays, &mut sink);
    }
    assert_eq!(sink.timeouts(), vec![Zone::Bathroom]);
}

// ── Reference timeline ────────────────────────────────────────

/// Runs the reference timeline and returns whether the Room relays were
/// lit right after the tick that observed the timeout.
fn run_reference_timeline(off_timing: OffTiming) -> bool {
    let (ctl, mut relays, mut sink) = make_controller(off_timing);
    ctl.on_motion(Zone::Room, 0, &mut sink);

    ctl.tick(1_000, &mut relays, &mut sink);
    assert!(relays.zone_lit(Zone::Room));

    ctl.tick(299_999, &mut relays, &mut sink);
    assert!(ctl.is_occupied(Zone::Room));
    assert!(relays.zone_lit(Zone::Room));

    ctl.tick(300_001, &mut relays, &mut sink);
    assert!(!ctl.is_occupied(Zone::Room));
    let lit_at_transition = relays.zone_lit(Zone::Room);

    ctl.tick(301_001, &mut relays, &mut sink);
    assert!(relays.zone_dark(Zone::Room));
    assert!(relays.zone_dark(Zone::Bathroom));

    lit_at_transition
}

#[test]
fn reference_timeline_same_tick_off() {
    assert!(!run_reference_timeline(OffTiming::SameTick));
}

#[test]
fn reference_timeline_next_tick_off() {
    assert!(run_reference_timeline(OffTiming::NextTick));
}

// ── Extension ─────────────────────────────────────────────────

#[test]
fn repeated_motion_extends_window() {
    let t0 = 50_000;
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, t0, &mut sink);
    ctl.on_motion(Zone::Room, t0 + 100, &mut sink);
    ctl.on_motion(Zone::Room, t0 + 200, &mut sink);

    // Past the window of the first edge, inside the window of the last.
    ctl.tick(t0 + TIMEOUT + 1, &mut relays, &mut sink);
    assert!(ctl.is_occupied(Zone::Room));
    assert!(relays.zone_lit(Zone::Room));

    ctl.tick(t0 + 200 + TIMEOUT, &mut relays, &mut sink);
    assert!(ctl.is_occupied(Zone::Room));

    ctl.tick(t0 + 200 + TIMEOUT + 1, &mut relays, &mut sink);
    assert!(!ctl.is_occupied(Zone::Room));
    assert!(relays.zone_dark(Zone::Room));
}

#[test]
fn only_last_motion_edge_reports_idle_transition() {
    let (ctl, _relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, 0, &mut sink);
    ctl.on_motion(Zone::Room, 100, &mut sink);
    let was_idle: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::MotionDetected { was_idle, .. } => Some(*was_idle),
            _ => None,
        })
        .collect();
    assert_eq!(was_idle, vec![true, false]);
}

// ── Zone independence ─────────────────────────────────────────

#[test]
fn zones_are_independent() {
    for (active, other) in [(Zone::Room, Zone::Bathroom), (Zone::Bathroom, Zone::Room)] {
        let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
        ctl.on_motion(active, 0, &mut sink);

        ctl.tick(1_000, &mut relays, &mut sink);
        assert!(relays.zone_lit(active));
        assert!(relays.zone_dark(other));
        assert_eq!(ctl.zone_state(other), ZoneState::Idle);

        ctl.tick(TIMEOUT + 1, &mut relays, &mut sink);
        assert!(relays.zone_dark(active));
        assert!(relays.zone_dark(other));
    }
}

#[test]
fn timeouts_fire_per_zone() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, 0, &mut sink);
    ctl.on_motion(Zone::Bathroom, 60_000, &mut sink);

    ctl.tick(TIMEOUT + 1, &mut relays, &mut sink);
    assert!(relays.zone_dark(Zone::Room));
    assert!(relays.zone_lit(Zone::Bathroom));

    ctl.tick(60_000 + TIMEOUT + 1, &mut relays, &mut sink);
    assert!(relays.zone_dark(Zone::Bathroom));
    assert_eq!(sink.timeouts(), vec![Zone::Room, Zone::Bathroom]);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_forces_all_off_while_occupied() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, 0, &mut sink);
    ctl.on_motion(Zone::Bathroom, 0, &mut sink);
    ctl.tick(1_000, &mut relays, &mut sink);
    assert!(relays.zone_lit(Zone::Room) && relays.zone_lit(Zone::Bathroom));

    ctl.shutdown(&mut relays, &mut sink);
    for relay in Relay::ALL {
        assert_eq!(relays.level(relay), Some(RelayLevel::Off));
    }
    // Zone state is untouched.
    assert!(ctl.is_occupied(Zone::Room));
    assert!(ctl.is_occupied(Zone::Bathroom));
    assert_eq!(sink.events.last(), Some(&AppEvent::Shutdown));
}

#[test]
fn shutdown_when_idle_is_harmless() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::NextTick);
    ctl.shutdown(&mut relays, &mut sink);
    ctl.shutdown(&mut relays, &mut sink);
    assert!(Relay::ALL.iter().all(|&r| !relays.is_on(r)));
}

// ── Idle steady state ─────────────────────────────────────────

#[test]
fn idle_ticks_keep_everything_off() {
    for off_timing in [OffTiming::SameTick, OffTiming::NextTick] {
        let (ctl, mut relays, mut sink) = make_controller(off_timing);
        for i in 0..100u64 {
            ctl.tick(i * 1_000, &mut relays, &mut sink);
            assert!(Relay::ALL.iter().all(|&r| !relays.is_on(r)));
            assert!(Zone::ALL.iter().all(|&z| !ctl.is_occupied(z)));
        }
        assert!(relays.calls.iter().all(|c| c.level == RelayLevel::Off));
        assert!(sink.timeouts().is_empty());
    }
}

// ── Clock edge cases ──────────────────────────────────────────

#[test]
fn edge_stamped_after_tick_time_counts_as_fresh() {
    let (ctl, mut relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Room, 10_000, &mut sink);
    // Tick time captured before the edge landed.
    ctl.tick(9_990, &mut relays, &mut sink);
    assert!(ctl.is_occupied(Zone::Room));
    assert!(relays.zone_lit(Zone::Room));
}

// ── Status ────────────────────────────────────────────────────

#[test]
fn status_reports_remaining_time() {
    let (ctl, _relays, mut sink) = make_controller(OffTiming::SameTick);
    ctl.on_motion(Zone::Bathroom, 1_000, &mut sink);
    let report = ctl.status(61_000);

    assert_eq!(report.at_ms, 61_000);
    let room = report.zones[Zone::Room.index()];
    assert!(!room.occupied);
    assert_eq!(room.remaining_ms, None);

    let bath = report.zones[Zone::Bathroom.index()];
    assert!(bath.occupied);
    assert_eq!(bath.since_motion_ms, Some(60_000));
    assert_eq!(bath.remaining_ms, Some(TIMEOUT - 60_000));
}
