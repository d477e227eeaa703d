//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries until it
//! is told to stop or the cache it serves is dropped.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};

/// Something the sweep task can reclaim expired entries from.
pub(crate) trait Sweep: Send + Sync + 'static {
    /// Removes expired entries and returns how many were removed.
    fn sweep_expired(&self) -> usize;
}

/// Owned handle to a running sweep task.
///
/// Dropping the handle drops the stop sender, which also ends the task.
#[derive(Debug)]
pub(crate) struct SweepHandle {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to stop. Returns false if it was already signalled.
    pub(crate) fn stop(&mut self) -> bool {
        match self.shutdown.take() {
            Some(shutdown) => {
                // The task may already have exited on its own.
                let _ = shutdown.send(());
                true
            }
            None => false,
        }
    }

    /// True while the task has not been signalled and has not exited.
    pub(crate) fn is_running(&self) -> bool {
        self.shutdown.is_some() && !self.handle.is_finished()
    }

    /// Signals the task and waits for it to finish.
    pub(crate) async fn join(mut self) {
        self.stop();
        if let Err(err) = self.handle.await {
            if err.is_panic() {
                warn!("TTL sweep task panicked: {}", err);
            }
        }
    }
}

/// Spawns a background task that sweeps `target` every `interval`.
///
/// The first sweep happens one full interval after spawning. The task holds
/// only a weak reference, so it never keeps the cache alive.
///
/// # Errors
/// - `InvalidConfig` if `interval` is zero
/// - `NoRuntime` if called outside a tokio runtime
pub(crate) fn spawn_sweep_task<S: Sweep>(target: Weak<S>, interval: Duration) -> Result<SweepHandle> {
    if interval.is_zero() {
        return Err(CacheError::InvalidConfig(
            "sweep interval must be greater than zero".to_string(),
        ));
    }
    let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = runtime.spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL sweep task"
        );

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("TTL sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(target) = target.upgrade() else {
                        debug!("Cache dropped, ending TTL sweep task");
                        break;
                    };
                    let removed = target.sweep_expired();
                    drop(target);

                    if removed > 0 {
                        info!(removed, "TTL sweep: removed expired entries");
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }
    });

    Ok(SweepHandle {
        shutdown: Some(shutdown_tx),
        handle,
    })
}
