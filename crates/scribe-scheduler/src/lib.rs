//! Cooperative cancellation for restartable background work.
//!
//! A [`Restartable`] hands out one [`RunHandle`] per run. Starting a new run
//! cancels the previous one: its token fires, waking it from any suspension
//! point, and its generation stops being current so it can no longer pass a
//! [`RunHandle::checkpoint`]. Work already running inside a collaborator is not
//! preempted; the run just stops waiting for it.

mod restartable;

pub use restartable::{Restartable, RunHandle};
pub use tokio_util::sync::CancellationToken;

/// Returned from a suspension point when the run it belongs to was superseded
/// or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("run cancelled")]
pub struct Cancelled;
