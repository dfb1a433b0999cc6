//! Concurrency tests: motion edges arriving from another thread while the
//! control loop ticks.
//!
//! On the board the edges come from GPIO ISRs; on the host they come from
//! the sim-sensor thread.  Either way the controller is shared by `&`
//! reference and must never lose an edge.

use std::sync::Barrier;
use std::thread;

use crate::mock_hw::{CountingSink, MockRelays, RecordingSink};

use roomlight::app::controller::OccupancyController;
use roomlight::app::zone::{Zone, ZoneState};
use roomlight::config::{LIGHT_TIMEOUT_MS, SystemConfig};
use roomlight::events::{EdgeQueue, MotionEdge};

#[test]
fn motion_racing_a_timeout_is_never_lost() {
    // The zone's only edge is long expired; a fresh edge and a tick land
    // at the same instant.  Whichever wins, the zone must end occupied.
    let now = 10 * LIGHT_TIMEOUT_MS;

    for _ in 0..500 {
        let ctl = OccupancyController::new(&SystemConfig::default());
        ctl.on_motion(Zone::Room, 0, &mut CountingSink::default());
        let barrier = Barrier::new(2);

        thread::scope(|s| {
            s.spawn(|| {
                barrier.wait();
                ctl.on_motion(Zone::Room, now, &mut CountingSink::default());
            });
            s.spawn(|| {
                barrier.wait();
                ctl.tick(now, &mut MockRelays::new(), &mut CountingSink::default());
            });
        });

        assert_eq!(
            ctl.zone_state(Zone::Room),
            ZoneState::Occupied { last_motion_ms: now }
        );

        let mut relays = MockRelays::new();
        ctl.tick(now, &mut relays, &mut RecordingSink::new());
        assert!(relays.zone_lit(Zone::Room));
    }
}

#[test]
fn parallel_edges_on_both_zones_stay_separate() {
    const EDGES: u64 = 10_000;
    let ctl = OccupancyController::new(&SystemConfig::default());

    let counts: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = [(Zone::Room, 0u64), (Zone::Bathroom, 1_000_000u64)]
            .into_iter()
            .map(|(zone, base)| {
                let ctl = &ctl;
                s.spawn(move || {
                    let mut sink = CountingSink::default();
                    for i in 0..EDGES {
                        ctl.on_motion(zone, base + i, &mut sink);
                    }
                    sink.count
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![EDGES as usize, EDGES as usize]);
    assert_eq!(
        ctl.zone_state(Zone::Room),
        ZoneState::Occupied { last_motion_ms: EDGES - 1 }
    );
    assert_eq!(
        ctl.zone_state(Zone::Bathroom),
        ZoneState::Occupied { last_motion_ms: 1_000_000 + EDGES - 1 }
    );
}

#[test]
fn ticks_concurrent_with_fresh_motion_keep_zone_lit() {
    // Every edge is stamped at the tick time, so no tick may ever
    // observe an expired window.
    let now = 3 * LIGHT_TIMEOUT_MS;
    let ctl = OccupancyController::new(&SystemConfig::default());
    ctl.on_motion(Zone::Bathroom, now, &mut CountingSink::default());

    let mut relays = MockRelays::new();
    let mut sink = RecordingSink::new();
    thread::scope(|s| {
        s.spawn(|| {
            let mut sink = CountingSink::default();
            for _ in 0..5_000 {
                ctl.on_motion(Zone::Bathroom, now, &mut sink);
            }
        });
        for _ in 0..5_000 {
            ctl.tick(now, &mut relays, &mut sink);
            assert!(relays.zone_lit(Zone::Bathroom));
        }
    });

    assert!(sink.timeouts().is_empty());
}

#[test]
fn edge_queue_accounts_for_every_push() {
    const PER_PRODUCER: u64 = 2_000;
    let queue = EdgeQueue::new();
    let ctl = OccupancyController::new(&SystemConfig::default());

    let accepted: u64 = thread::scope(|s| {
        let producers: Vec<_> = Zone::ALL
            .into_iter()
            .map(|zone| {
                let queue = &queue;
                s.spawn(move || {
                    (0..PER_PRODUCER)
                        .filter(|&i| queue.push(MotionEdge { zone, at_ms: i }))
                        .count() as u64
                })
            })
            .collect();

        let mut drained = 0u64;
        let mut sink = CountingSink::default();
        while producers.iter().any(|p| !p.is_finished()) {
            queue.drain(|edge| {
                ctl.on_motion(edge.zone, edge.at_ms, &mut sink);
                drained += 1;
            });
        }
        queue.drain(|edge| {
            ctl.on_motion(edge.zone, edge.at_ms, &mut sink);
            drained += 1;
        });

        let accepted: u64 = producers.into_iter().map(|p| p.join().unwrap()).sum();
        assert_eq!(drained, accepted);
        assert_eq!(sink.count as u64, drained);
        accepted
    });

    let dropped = u64::from(queue.take_dropped());
    assert_eq!(accepted + dropped, 2 * PER_PRODUCER);
    assert!(queue.is_empty());
}
