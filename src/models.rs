//! Core data types that flow through the retrieval-and-answering pipeline.
//!
//! Raw store responses are normalized into these types at the ingestion and
//! retrieval boundaries; nothing deeper in the pipeline branches on the
//! store's wire shape.

/// Outcome of ingesting a single file into the store.
///
/// Exactly one variant is produced per file. A failure is recorded here
/// rather than propagated, so a batch of N files always yields N outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// The store accepted the file and assigned it a root URI.
    Success { root_uri: String },
    /// The store rejected the file; `messages` preserves the store's
    /// error messages in order.
    ParseError { messages: Vec<String> },
    /// The store responded without an error but also without a root
    /// identifier.
    Ambiguous,
}

/// One ranked hit returned from the store.
///
/// The store exposes up to three levels of content richness per resource:
/// a short curated `overview`, a longer `abstract_`, and the raw `content`.
/// Empty strings are normalized to `None` at the retrieval boundary.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub uri: String,
    pub score: f64,
    pub overview: Option<String>,
    pub abstract_: Option<String>,
    pub content: Option<String>,
}

impl SearchResult {
    /// The richest available content field, probed in a fixed priority
    /// order: overview, then abstract, then raw content.
    pub fn best_content(&self) -> Option<&str> {
        self.overview
            .as_deref()
            .or(self.abstract_.as_deref())
            .or(self.content.as_deref())
    }
}

/// Ordered search results; insertion order is rank order (the store's
/// contract — scores are not re-sorted here).
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub resources: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// One grounding excerpt attributed to its source resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub source_uri: String,
    pub text: String,
}

/// Assembled grounding material, blocks in rank order.
///
/// A context may legitimately be empty (zero qualifying results); answer
/// generation still proceeds and relies on the grounding directive.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub blocks: Vec<ContextBlock>,
}

impl Context {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the context as a single text blob: each block prefixed with
    /// a source label, blocks separated by blank lines.
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|b| format!("### source: {}\n{}", b.source_uri, b.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A generated answer, taken verbatim from the first completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
}
