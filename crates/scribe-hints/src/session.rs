use std::sync::Arc;

use scribe_cache::{MemoCache, MemoStats};
use scribe_config::HintsConfig;
use scribe_core::{OwnerId, ScopeKey};
use scribe_index::{EntityIndex, LookupError, MandateSource};

use crate::{HintRegistry, Property, SchemaSource, ScopeSource, Token, Tokenizer, WordTokenizer};

/// External collaborators a [`HintSession`] talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub mandates: Arc<dyn MandateSource>,
    pub schema: Arc<dyn SchemaSource>,
    pub scope: Arc<dyn ScopeSource>,
    pub registry: Arc<dyn HintRegistry>,
}

/// Everything that outlives a single detection run: configuration,
/// collaborators, the entity index and the memo caches.
pub struct HintSession {
    config: HintsConfig,
    owner: OwnerId,
    index: EntityIndex,
    schema: Arc<dyn SchemaSource>,
    scope: Arc<dyn ScopeSource>,
    registry: Arc<dyn HintRegistry>,
    tokenizer: Arc<dyn Tokenizer>,
    tokens: MemoCache<String, Arc<[Token]>>,
    /// Keyed by `(trimmed class type, target range)`.
    properties: MemoCache<(String, String), Arc<[Property]>>,
}

impl HintSession {
    pub fn new(config: HintsConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            mandates,
            schema,
            scope,
            registry,
        } = collaborators;
        Self {
            owner: OwnerId::new(&config.owner),
            tokenizer: Arc::new(WordTokenizer::new(config.max_words)),
            config,
            index: EntityIndex::new(mandates),
            schema,
            scope,
            registry,
            tokens: MemoCache::new("tokens"),
            properties: MemoCache::new("applicable-properties"),
        }
    }

    /// Replaces the default [`WordTokenizer`].
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self.tokens.clear();
        self
    }

    pub fn config(&self) -> &HintsConfig {
        &self.config
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn registry(&self) -> &dyn HintRegistry {
        self.registry.as_ref()
    }

    /// Scope marker currently present in the document.
    pub fn current_scope(&self) -> Option<ScopeKey> {
        self.scope.current_scope_marker(&self.config.scope_property)
    }

    /// Tokens of `text`, memoized by text.
    pub async fn tokens(&self, text: &str) -> Arc<[Token]> {
        let tokenizer = Arc::clone(&self.tokenizer);
        let owned = text.to_owned();
        self.tokens
            .get_or_compute(text.to_owned(), || async move {
                Arc::from(tokenizer.tokenize(&owned))
            })
            .await
    }

    /// Properties of `class_type` whose range is the configured target class.
    ///
    /// Successful lookups are memoized; failures are retried on the next call.
    pub async fn applicable_properties(
        &self,
        class_type: &str,
    ) -> Result<Arc<[Property]>, LookupError> {
        let class_type = class_type.trim().to_owned();
        let target_range = self.config.target_range.clone();
        let schema = Arc::clone(&self.schema);
        let key = (class_type.clone(), target_range.clone());

        self.properties
            .get_or_try_compute(key, || async move {
                schema
                    .find_applicable_properties(&class_type, &target_range)
                    .await
                    .map(Arc::from)
            })
            .await
    }

    /// Drops memoized tokens and schema lookups and unloads the index.
    pub fn clear_caches(&self) {
        self.tokens.clear();
        self.properties.clear();
        self.index.clear();
    }

    pub fn token_stats(&self) -> MemoStats {
        self.tokens.stats()
    }

    pub fn property_stats(&self) -> MemoStats {
        self.properties.stats()
    }
}

impl std::fmt::Debug for HintSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintSession")
            .field("owner", &self.owner)
            .field("index", &self.index)
            .field("tokens", &self.tokens)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
