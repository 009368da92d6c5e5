use std::sync::Arc;

use parking_lot::Mutex;
use scribe_core::Region;
use scribe_index::{IndexError, LookupError};
use scribe_scheduler::{Cancelled, Restartable, RunHandle};
use tokio::task::JoinHandle;

use crate::{detect_hints, HintCard, HintError, HintSession, Property, SnippetContext, Trigger};

/// Where the current run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    ScopeCheck,
    Debounce,
    Detecting,
    Emitting,
}

/// Why a run ended without emitting hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuiescentReason {
    NoContexts,
    /// The document has no governing-scope marker.
    ScopeUnavailable,
    /// A newer trigger restarted detection.
    Superseded,
    NoHints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The trigger was caused by this producer and was not acted upon.
    Ignored,
    Quiescent(QuiescentReason),
    Emitted { hints: usize },
}

enum Halt {
    Superseded,
    Failed(LookupError),
}

impl From<Cancelled> for Halt {
    fn from(_: Cancelled) -> Self {
        Halt::Superseded
    }
}

/// Restartable driver of hint detection for one [`HintSession`].
///
/// At most one run is active. Every trigger not caused by this producer
/// cancels the run in flight and starts a new one; a cancelled run stops at
/// its next suspension point and never touches the registry.
#[derive(Clone)]
pub struct HintOrchestrator {
    session: Arc<HintSession>,
    runs: Restartable,
    state: Arc<Mutex<RunState>>,
}

impl HintOrchestrator {
    pub fn new(session: Arc<HintSession>) -> Self {
        Self {
            session,
            runs: Restartable::new("hints"),
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    pub fn session(&self) -> &Arc<HintSession> {
        &self.session
    }

    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Handles `trigger` to completion.
    pub async fn execute(&self, trigger: Trigger) -> Result<RunOutcome, HintError> {
        match self.begin(&trigger) {
            Some(run) => self.finish(run, trigger).await,
            None => Ok(RunOutcome::Ignored),
        }
    }

    /// Handles `trigger` on the current tokio runtime.
    ///
    /// The in-flight run is cancelled before this returns, so triggers take
    /// effect in dispatch order.
    pub fn dispatch(&self, trigger: Trigger) -> JoinHandle<Result<RunOutcome, HintError>> {
        let run = self.begin(&trigger);
        let this = self.clone();
        tokio::spawn(async move {
            match run {
                Some(run) => this.finish(run, trigger).await,
                None => Ok(RunOutcome::Ignored),
            }
        })
    }

    /// Cancels the run in flight and drops all cached session state.
    pub fn shutdown(&self) {
        let cancelled = self.runs.cancel();
        *self.state.lock() = RunState::Idle;
        self.session.clear_caches();
        tracing::debug!(target = "scribe.hints", cancelled, "hint orchestrator shut down");
    }

    fn begin(&self, trigger: &Trigger) -> Option<RunHandle> {
        if trigger.is_caused_by(self.session.owner()) {
            tracing::trace!(
                target = "scribe.hints",
                run_id = %trigger.run_id,
                "ignoring change caused by own hints"
            );
            return None;
        }
        Some(self.runs.restart())
    }

    async fn finish(&self, run: RunHandle, trigger: Trigger) -> Result<RunOutcome, HintError> {
        let result = self.drive(&run, &trigger).await;
        if run.is_current() {
            *self.state.lock() = RunState::Idle;
        }

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    target = "scribe.hints",
                    run_id = %trigger.run_id,
                    generation = run.generation(),
                    ?outcome,
                    "hint run finished"
                );
                Ok(outcome)
            }
            Err(Halt::Superseded) => {
                tracing::debug!(
                    target = "scribe.hints",
                    run_id = %trigger.run_id,
                    generation = run.generation(),
                    "hint run superseded"
                );
                Ok(RunOutcome::Quiescent(QuiescentReason::Superseded))
            }
            Err(Halt::Failed(err)) => {
                tracing::warn!(
                    target = "scribe.hints",
                    run_id = %trigger.run_id,
                    error = %err,
                    "hint run failed"
                );
                Err(err.into())
            }
        }
    }

    async fn drive(&self, run: &RunHandle, trigger: &Trigger) -> Result<RunOutcome, Halt> {
        if trigger.contexts.is_empty() {
            return Ok(RunOutcome::Quiescent(QuiescentReason::NoContexts));
        }

        self.enter(run, RunState::ScopeCheck)?;
        let scope = self.session.current_scope();
        match self.session.index().refresh(scope.as_ref(), run.token()).await {
            Ok(_) => {}
            Err(IndexError::ScopeUnavailable) => {
                return Ok(RunOutcome::Quiescent(QuiescentReason::ScopeUnavailable))
            }
            Err(IndexError::Cancelled(_)) => return Err(Halt::Superseded),
            Err(IndexError::Lookup(err)) => return Err(self.failed(run, err)),
        }

        self.enter(run, RunState::Debounce)?;
        run.sleep(self.session.config().debounce()).await?;

        self.enter(run, RunState::Detecting)?;
        let snapshot = self.session.index().snapshot();
        let mut batches: Vec<(Region, Vec<HintCard>)> = Vec::new();
        for context in &trigger.contexts {
            let Some(properties) = self.applicable_properties(run, context).await? else {
                continue;
            };

            let tokens = run.run(self.session.tokens(&context.text)).await?;
            let candidates = detect_hints(&*snapshot, context.region, &tokens);
            if candidates.is_empty() {
                continue;
            }

            let cards = candidates
                .into_iter()
                .map(|candidate| {
                    HintCard::new(
                        candidate,
                        trigger.run_id.clone(),
                        self.session.owner().clone(),
                        Arc::clone(&properties),
                    )
                })
                .collect();
            batches.push((context.region, cards));
        }

        self.enter(run, RunState::Emitting)?;
        Ok(self.emit(trigger, batches))
    }

    /// Properties that make `context` eligible for hints, or `None` to skip it.
    async fn applicable_properties(
        &self,
        run: &RunHandle,
        context: &SnippetContext,
    ) -> Result<Option<Arc<[Property]>>, Halt> {
        let Some(class_type) = context.asserted_type() else {
            return Ok(None);
        };
        let properties = run
            .run(self.session.applicable_properties(class_type))
            .await?
            .map_err(|err| self.failed(run, err))?;
        Ok((!properties.is_empty()).then_some(properties))
    }

    fn emit(&self, trigger: &Trigger, batches: Vec<(Region, Vec<HintCard>)>) -> RunOutcome {
        let total: usize = batches.iter().map(|(_, cards)| cards.len()).sum();
        if total == 0 {
            return RunOutcome::Quiescent(QuiescentReason::NoHints);
        }

        let registry = self.session.registry();
        let owner = self.session.owner();
        let mut cards = Vec::with_capacity(total);
        for (region, region_cards) in batches {
            registry.remove_hints_in_region(region, &trigger.run_id, owner);
            cards.extend(region_cards);
        }
        registry.add_hints(&trigger.run_id, owner, cards);

        tracing::info!(
            target = "scribe.hints",
            run_id = %trigger.run_id,
            hints = total,
            "emitted hints"
        );
        RunOutcome::Emitted { hints: total }
    }

    fn enter(&self, run: &RunHandle, state: RunState) -> Result<(), Halt> {
        run.checkpoint()?;
        *self.state.lock() = state;
        tracing::trace!(target = "scribe.hints", generation = run.generation(), ?state, "run state");
        Ok(())
    }

    /// Errors of a run that has been superseded meanwhile are dropped.
    fn failed(&self, run: &RunHandle, err: LookupError) -> Halt {
        if run.is_current() {
            Halt::Failed(err)
        } else {
            Halt::Superseded
        }
    }
}

impl std::fmt::Debug for HintOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintOrchestrator")
            .field("owner", self.session.owner())
            .field("state", &self.state())
            .field("generation", &self.runs.current_generation())
            .finish()
    }
}
