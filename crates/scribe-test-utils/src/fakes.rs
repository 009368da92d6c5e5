use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use scribe_core::{OwnerId, Region, RunId, ScopeKey, TextRange};
use scribe_hints::{HintCard, HintRegistry, Property, SchemaSource, ScopeSource};
use scribe_index::{EntityRecord, LookupError, MandateSource};
use tokio::sync::Semaphore;

/// Mandate dataset keyed by scope.
///
/// Scopes without registered records load as empty. Loads can be made to
/// fail, or held until [`FakeMandateSource::release`] is called.
#[derive(Default)]
pub struct FakeMandateSource {
    records: Mutex<HashMap<ScopeKey, Vec<EntityRecord>>>,
    loads: Mutex<Vec<ScopeKey>>,
    failure: Mutex<Option<LookupError>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeMandateSource {
    pub fn with_records(scope: impl Into<ScopeKey>, records: Vec<EntityRecord>) -> Self {
        let source = Self::default();
        source.insert(scope, records);
        source
    }

    pub fn insert(&self, scope: impl Into<ScopeKey>, records: Vec<EntityRecord>) {
        self.records.lock().insert(scope.into(), records);
    }

    pub fn fail_with(&self, failure: Option<LookupError>) {
        *self.failure.lock() = failure;
    }

    /// Holds every subsequent load until [`FakeMandateSource::release`].
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        // Held loads see a closed semaphore and proceed.
        if let Some(gate) = self.gate.lock().take() {
            gate.close();
        }
    }

    /// Scopes loaded so far, in order.
    pub fn loads(&self) -> Vec<ScopeKey> {
        self.loads.lock().clone()
    }
}

#[async_trait]
impl MandateSource for FakeMandateSource {
    async fn load_mandates(&self, scope: &ScopeKey) -> Result<Vec<EntityRecord>, LookupError> {
        self.loads.lock().push(scope.clone());
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
        if let Some(failure) = self.failure.lock().clone() {
            return Err(failure);
        }
        Ok(self.records.lock().get(scope).cloned().unwrap_or_default())
    }
}

/// Schema metadata keyed by class type. Unknown classes have no applicable
/// properties.
#[derive(Default)]
pub struct FakeSchemaSource {
    properties: Mutex<HashMap<String, Vec<Property>>>,
    calls: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<LookupError>>,
}

impl FakeSchemaSource {
    pub fn with_properties(class_type: &str, properties: Vec<Property>) -> Self {
        let source = Self::default();
        source.insert(class_type, properties);
        source
    }

    pub fn insert(&self, class_type: &str, properties: Vec<Property>) {
        self.properties
            .lock()
            .insert(class_type.to_owned(), properties);
    }

    pub fn fail_with(&self, failure: Option<LookupError>) {
        *self.failure.lock() = failure;
    }

    /// `(class type, target range)` of every lookup that reached the source.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SchemaSource for FakeSchemaSource {
    async fn find_applicable_properties(
        &self,
        source_type: &str,
        target_range: &str,
    ) -> Result<Vec<Property>, LookupError> {
        self.calls
            .lock()
            .push((source_type.to_owned(), target_range.to_owned()));
        if let Some(failure) = self.failure.lock().clone() {
            return Err(failure);
        }
        Ok(self
            .properties
            .lock()
            .get(source_type)
            .cloned()
            .unwrap_or_default())
    }
}

/// Document scope marker that tests can change between triggers.
#[derive(Default)]
pub struct FakeScopeSource {
    marker: Mutex<Option<ScopeKey>>,
    queried: Mutex<Vec<String>>,
}

impl FakeScopeSource {
    pub fn new(marker: impl Into<ScopeKey>) -> Self {
        let source = Self::default();
        source.set(Some(marker.into()));
        source
    }

    pub fn set(&self, marker: Option<ScopeKey>) {
        *self.marker.lock() = marker;
    }

    /// Properties the marker was looked up by.
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }
}

impl ScopeSource for FakeScopeSource {
    fn current_scope_marker(&self, property: &str) -> Option<ScopeKey> {
        self.queried.lock().push(property.to_owned());
        self.marker.lock().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    RemoveInRegion {
        region: Region,
        run_id: RunId,
        owner: OwnerId,
    },
    RemoveAtLocation {
        location: TextRange,
        run_id: RunId,
        owner: OwnerId,
    },
    Add {
        run_id: RunId,
        owner: OwnerId,
        cards: Vec<HintCard>,
    },
}

/// Registry that records every mutation.
///
/// `shift` simulates edits made after a run: locations mapped through
/// [`HintRegistry::update_location_to_current_index`] move by that many bytes.
#[derive(Default)]
pub struct RecordingRegistry {
    events: Mutex<Vec<RegistryEvent>>,
    shift: Mutex<u32>,
}

impl RecordingRegistry {
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Batches passed to `add_hints`, in order.
    pub fn added(&self) -> Vec<Vec<HintCard>> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RegistryEvent::Add { cards, .. } => Some(cards.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_shift(&self, shift: u32) {
        *self.shift.lock() = shift;
    }
}

impl HintRegistry for RecordingRegistry {
    fn remove_hints_in_region(&self, region: Region, run_id: &RunId, owner: &OwnerId) {
        self.events.lock().push(RegistryEvent::RemoveInRegion {
            region,
            run_id: run_id.clone(),
            owner: owner.clone(),
        });
    }

    fn remove_hints_at_location(&self, location: TextRange, run_id: &RunId, owner: &OwnerId) {
        self.events.lock().push(RegistryEvent::RemoveAtLocation {
            location,
            run_id: run_id.clone(),
            owner: owner.clone(),
        });
    }

    fn add_hints(&self, run_id: &RunId, owner: &OwnerId, cards: Vec<HintCard>) {
        self.events.lock().push(RegistryEvent::Add {
            run_id: run_id.clone(),
            owner: owner.clone(),
            cards,
        });
    }

    fn update_location_to_current_index(&self, _run_id: &RunId, location: TextRange) -> TextRange {
        location + scribe_core::TextSize::from(*self.shift.lock())
    }
}
