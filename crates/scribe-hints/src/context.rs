use scribe_core::{Originator, OwnerId, Region, RunId};

/// Full IRI of `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// One structural assertion enclosing a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// `true` for `a` (the RDFa shorthand) and `rdf:type`.
    pub fn is_type_assertion(&self) -> bool {
        matches!(self.predicate.as_str(), "a" | RDF_TYPE)
    }
}

/// A text snippet the editor wants re-examined, with its absolute region and
/// the structural context it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetContext {
    pub region: Region,
    pub text: String,
    pub triples: Vec<Triple>,
}

impl SnippetContext {
    pub fn new(region: Region, text: impl Into<String>) -> Self {
        Self {
            region,
            text: text.into(),
            triples: Vec::new(),
        }
    }

    pub fn with_triple(mut self, triple: Triple) -> Self {
        self.triples.push(triple);
        self
    }

    /// Class asserted by the trailing triple, trimmed.
    ///
    /// `None` when the last triple is not a type assertion or names a blank
    /// class.
    pub fn asserted_type(&self) -> Option<&str> {
        let last = self.triples.last()?;
        if !last.is_type_assertion() {
            return None;
        }
        let class = last.object.trim();
        (!class.is_empty()).then_some(class)
    }
}

/// A document-change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub run_id: RunId,
    pub contexts: Vec<SnippetContext>,
    /// Producers that caused the change, as attached to the editor mutation.
    pub origin: Vec<Originator>,
}

impl Trigger {
    pub fn new(run_id: impl Into<RunId>, contexts: Vec<SnippetContext>) -> Self {
        Self {
            run_id: run_id.into(),
            contexts,
            origin: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: Originator) -> Self {
        self.origin.push(origin);
        self
    }

    pub fn is_caused_by(&self, owner: &OwnerId) -> bool {
        self.origin.iter().any(|origin| origin.is(owner))
    }
}
