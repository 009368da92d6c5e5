use std::sync::Arc;

use scribe_core::{Region, TextRange};
use scribe_index::{EntityRecord, Matcher};

use crate::{resolve_overlaps, HintCandidate, Located, Token};

struct TokenMatch {
    location: TextRange,
    normalized_location: TextRange,
    entities: Vec<Arc<EntityRecord>>,
}

impl Located for TokenMatch {
    fn location(&self) -> TextRange {
        self.normalized_location
    }
}

/// Matches `tokens` of the snippet at `region` and returns one candidate per
/// (surviving token, entity) pair.
///
/// Overlaps are resolved between tokens, before they are expanded per entity,
/// so all entities matching the most specific span are kept.
pub fn detect_hints(matcher: &impl Matcher, region: Region, tokens: &[Token]) -> Vec<HintCandidate> {
    let matches: Vec<TokenMatch> = tokens
        .iter()
        .filter_map(|token| {
            let entities = matcher.find_by_prefix(&token.sanitized);
            if entities.is_empty() {
                return None;
            }
            let Some(normalized_location) = region
                .normalize(token.location)
                .filter(|location| region.contains_range(*location))
            else {
                tracing::trace!(
                    target = "scribe.hints",
                    token = %token.sanitized,
                    "token extends past its region, dropping"
                );
                return None;
            };
            Some(TokenMatch {
                location: token.location,
                normalized_location,
                entities,
            })
        })
        .collect();

    resolve_overlaps(matches)
        .into_iter()
        .flat_map(|token| {
            let TokenMatch {
                location,
                normalized_location,
                entities,
            } = token;
            entities.into_iter().map(move |entity| HintCandidate {
                location,
                normalized_location,
                entity,
            })
        })
        .collect()
}
