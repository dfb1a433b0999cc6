//! SIGINT / SIGTERM handling for the host build.
//!
//! The signals are blocked on the calling thread before any other thread is
//! spawned, so every thread inherits the mask and only the dedicated
//! listener ever receives them.  The listener latches [`SHUTDOWN`]; the
//! control loop notices on its next iteration and turns the lights off.

use std::thread::JoinHandle;

use anyhow::Context;
use log::info;
use nix::sys::signal::{SigSet, Signal};

use crate::events::SHUTDOWN;

/// Block SIGINT and SIGTERM and start the listener thread.
///
/// Must be called from `main` before any other thread exists.
pub fn install() -> anyhow::Result<JoinHandle<()>> {
    let mut set = SigSet::empty();
    set.add(Signal::SIGINT);
    set.add(Signal::SIGTERM);
    set.thread_block().context("blocking SIGINT/SIGTERM")?;

    let handle = std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || match set.wait() {
            Ok(sig) => {
                info!("received {:?}, requesting shutdown", sig);
                SHUTDOWN.request();
            }
            Err(e) => {
                log::error!("sigwait failed: {}", e);
                SHUTDOWN.request();
            }
        })
        .context("spawning signal listener")?;
    Ok(handle)
}
