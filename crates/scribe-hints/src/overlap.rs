use scribe_core::TextRange;

/// Anything with a span that can take part in overlap resolution.
pub trait Located {
    fn location(&self) -> TextRange;
}

impl Located for TextRange {
    fn location(&self) -> TextRange {
        *self
    }
}

/// Keeps only the most specific candidates: those not strictly contained in
/// another candidate's span.
///
/// Containment is decided per pair, so in a lattice where `a` and `c` each
/// contain `b` but are disjoint from each other, both `a` and `c` survive.
/// Candidates with identical spans never eliminate each other. Input order is
/// preserved.
pub fn resolve_overlaps<T: Located>(candidates: Vec<T>) -> Vec<T> {
    let spans: Vec<TextRange> = candidates.iter().map(Located::location).collect();
    let dominated: Vec<bool> = spans
        .iter()
        .map(|&span| spans.iter().any(|&other| strictly_contains(other, span)))
        .collect();

    candidates
        .into_iter()
        .zip(dominated)
        .filter_map(|(candidate, dominated)| (!dominated).then_some(candidate))
        .collect()
}

#[inline]
fn strictly_contains(outer: TextRange, inner: TextRange) -> bool {
    outer != inner && outer.contains_range(inner)
}
