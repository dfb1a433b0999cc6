//! Interrupt-to-thread plumbing.
//!
//! Motion edges are produced by the GPIO ISRs on the PIR pins and consumed
//! by the control loop, which drains the queue into
//! [`OccupancyController::on_motion`](crate::app::controller::OccupancyController::on_motion)
//! right before each tick.  Each edge carries the timestamp taken inside the
//! ISR, so queueing delay never shortens the occupancy window.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Room ISR    │────▶│  EdgeQueue   │────▶│ Control loop │
//! │ Bathroom ISR│────▶│  (bounded)   │     │ drain → tick │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Producers never block and never log; a full queue drops the edge and
//! bumps a counter the loop reports later.  Nothing ever awaits the
//! channel, so a push from interrupt context never has a waker to run.
//!
//! The [`ShutdownFlag`] carries the termination request from the signal
//! listener to the control loop.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::zone::Zone;

/// Maximum number of pending motion edges.
const EDGE_QUEUE_CAP: usize = 16;

/// One motion edge, stamped with the clock at the moment it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEdge {
    pub zone: Zone,
    pub at_ms: u64,
}

// ── Motion edge queue ─────────────────────────────────────────

/// Bounded MPMC queue of motion edges.
pub struct EdgeQueue {
    channel: Channel<CriticalSectionRawMutex, MotionEdge, EDGE_QUEUE_CAP>,
    dropped: AtomicU32,
}

/// Queue shared by the PIR ISRs and the control loop.
/// `static` because ISR callbacks cannot capture state.
pub static MOTION_EDGES: EdgeQueue = EdgeQueue::new();

impl EdgeQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue an edge.  Safe to call from ISR context (never blocks).
    /// Returns `false` if the queue is full (edge dropped).
    pub fn push(&self, edge: MotionEdge) -> bool {
        if self.channel.try_send(edge).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Pop the oldest edge without waiting.
    pub fn try_pop(&self) -> Option<MotionEdge> {
        self.channel.try_receive().ok()
    }

    /// Drain every pending edge into a callback, FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(MotionEdge)) {
        while let Some(edge) = self.try_pop() {
            handler(edge);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Number of edges dropped since the last call; resets the counter.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

impl Default for EdgeQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shutdown request ──────────────────────────────────────────

/// One-way latch set by the signal listener, polled by the control loop.
pub struct ShutdownFlag(AtomicBool);

/// Process-wide termination request.
pub static SHUTDOWN: ShutdownFlag = ShutdownFlag::new();

impl ShutdownFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}
