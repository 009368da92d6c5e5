use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::{CancellationToken, Cancelled};

struct ActiveRun {
    generation: u64,
    token: CancellationToken,
}

struct RestartableInner {
    name: &'static str,
    next_generation: AtomicU64,
    active: Mutex<Option<ActiveRun>>,
}

/// Cancel-and-replace run tracker: at most one run is current at any time.
#[derive(Clone)]
pub struct Restartable {
    inner: Arc<RestartableInner>,
}

impl Restartable {
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Arc::new(RestartableInner {
                name,
                next_generation: AtomicU64::new(1),
                active: Mutex::new(None),
            }),
        }
    }

    /// Starts a new run, cancelling the current one (if any).
    pub fn restart(&self) -> RunHandle {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.inner.active.lock().replace(ActiveRun {
            generation,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
            tracing::debug!(
                target = "scribe.scheduler",
                task = self.inner.name,
                superseded = previous.generation,
                generation,
                "restarted run"
            );
        }

        RunHandle {
            generation,
            token,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Cancels the current run without starting a new one.
    ///
    /// Returns `false` if nothing was running.
    pub fn cancel(&self) -> bool {
        let Some(active) = self.inner.active.lock().take() else {
            return false;
        };
        active.token.cancel();
        true
    }

    /// Generation of the current run, if one is active.
    pub fn current_generation(&self) -> Option<u64> {
        self.inner.active.lock().as_ref().map(|run| run.generation)
    }

    pub fn is_running(&self) -> bool {
        self.inner.active.lock().is_some()
    }
}

/// Handle held by one run of a [`Restartable`].
///
/// Dropping the handle of the current run marks the tracker idle.
pub struct RunHandle {
    generation: u64,
    token: CancellationToken,
    inner: Arc<RestartableInner>,
}

impl RunHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns `true` while no newer run has been started and the run was not
    /// cancelled.
    pub fn is_current(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.inner
            .active
            .lock()
            .as_ref()
            .is_some_and(|run| run.generation == self.generation)
    }

    /// Fails with [`Cancelled`] once this run has been superseded.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Cancelled)
        }
    }

    /// Waits for `delay`, returning early with [`Cancelled`] if the run is
    /// superseded meanwhile.
    pub async fn sleep(&self, delay: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        self.checkpoint()
    }

    /// Drives `fut` until it completes or the run is superseded.
    ///
    /// On cancellation `fut` is dropped; the result of a future that completes
    /// after the run was superseded is discarded as well.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        let output = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(Cancelled),
            output = fut => output,
        };
        self.checkpoint()?;
        Ok(output)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        let mut active = self.inner.active.lock();
        if active
            .as_ref()
            .is_some_and(|run| run.generation == self.generation)
        {
            *active = None;
        }
    }
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("task", &self.inner.name)
            .field("generation", &self.generation)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
