use std::sync::Arc;

use scribe_core::{Originator, OwnerId, RunId, TextRange};
use scribe_index::EntityRecord;

use crate::{HintRegistry, Located, Property};

/// One matching entity for one surviving token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintCandidate {
    /// Relative to the snippet.
    pub location: TextRange,
    /// Absolute; always inside the snippet's region.
    pub normalized_location: TextRange,
    pub entity: Arc<EntityRecord>,
}

impl Located for HintCandidate {
    fn location(&self) -> TextRange {
        self.normalized_location
    }
}

/// A hint as handed to the [`HintRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintCard {
    /// Absolute document location.
    pub location: TextRange,
    pub run_id: RunId,
    pub owner: OwnerId,
    pub entity: Arc<EntityRecord>,
    /// Schema properties applicable to the region the hint was found in.
    pub properties: Arc<[Property]>,
}

/// Result of [`HintCard::retract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retraction {
    /// Where the hinted text is now.
    pub location: TextRange,
    /// Must be attached to the document mutation that replaces the hinted
    /// text, so the resulting change event does not re-trigger detection.
    pub origin: Originator,
}

impl HintCard {
    pub fn new(
        candidate: HintCandidate,
        run_id: RunId,
        owner: OwnerId,
        properties: Arc<[Property]>,
    ) -> Self {
        Self {
            location: candidate.normalized_location,
            run_id,
            owner,
            entity: candidate.entity,
            properties,
        }
    }

    /// One `(entity, property)` pair per way the hint can be applied.
    pub fn insertions(&self) -> impl Iterator<Item = (&EntityRecord, &Property)> + '_ {
        self.properties
            .iter()
            .map(move |property| (self.entity.as_ref(), property))
    }

    /// Removes this card from `registry` before its text is replaced.
    pub fn retract(&self, registry: &dyn HintRegistry) -> Retraction {
        let location = registry.update_location_to_current_index(&self.run_id, self.location);
        registry.remove_hints_at_location(self.location, &self.run_id, &self.owner);
        Retraction {
            location,
            origin: Originator::new(self.owner.clone()),
        }
    }
}
