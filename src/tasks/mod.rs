//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a configured interval

mod sweeper;

pub(crate) use sweeper::{spawn_sweep_task, Sweep, SweepHandle};
