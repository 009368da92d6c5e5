use std::sync::Arc;

use scribe_config::HintsConfig;
use scribe_core::TextRange;
use scribe_hints::{Collaborators, HintSession};
use scribe_index::EntityRecord;

use crate::{FakeMandateSource, FakeSchemaSource, FakeScopeSource, RecordingRegistry};

/// Extracts a byte range selection from a fixture containing `/*start*/` and
/// `/*end*/` markers.
///
/// Returns the fixture with markers removed and the range of the text that
/// was between them.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start_marker = "/*start*/";
    let end_marker = "/*end*/";

    let start = fixture
        .find(start_marker)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + start_marker.len();
    let end = fixture
        .find(end_marker)
        .expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + end_marker.len()..]);

    let range = TextRange::new(
        (start as u32).into(),
        ((end - start_marker.len()) as u32).into(),
    );
    (text, range)
}

/// A mandate whose role is labelled `label`.
pub fn mandate(id: &str, label: &str) -> EntityRecord {
    EntityRecord::new(
        id,
        label,
        format!("http://data.vlaanderen.be/id/concept/BestuursfunctieCode/{id}"),
        format!("http://data.lblod.info/id/mandaten/{id}"),
    )
}

/// A session wired to fresh fakes, with the fakes kept for assertions.
pub struct TestSession {
    pub session: Arc<HintSession>,
    pub mandates: Arc<FakeMandateSource>,
    pub schema: Arc<FakeSchemaSource>,
    pub scope: Arc<FakeScopeSource>,
    pub registry: Arc<RecordingRegistry>,
}

impl TestSession {
    pub fn new(config: HintsConfig) -> Self {
        Self::with_fakes(
            config,
            Arc::new(FakeMandateSource::default()),
            Arc::new(FakeSchemaSource::default()),
            Arc::new(FakeScopeSource::default()),
        )
    }

    pub fn with_fakes(
        config: HintsConfig,
        mandates: Arc<FakeMandateSource>,
        schema: Arc<FakeSchemaSource>,
        scope: Arc<FakeScopeSource>,
    ) -> Self {
        let registry = Arc::new(RecordingRegistry::default());
        let session = Arc::new(HintSession::new(
            config,
            Collaborators {
                mandates: mandates.clone(),
                schema: schema.clone(),
                scope: scope.clone(),
                registry: registry.clone(),
            },
        ));
        Self {
            session,
            mandates,
            schema,
            scope,
            registry,
        }
    }
}
