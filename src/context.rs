//! Grounding context assembly.
//!
//! Turns ranked search results into the text blob a generation prompt is
//! grounded on. Per-user memory entries are structural, not answerable
//! content, so anything under the reserved memories prefix is dropped.
//! Each remaining result contributes at most one block, chosen by the
//! fixed overview → abstract → content priority.

use tracing::debug;

use crate::models::{Context, ContextBlock, SearchResponse};

/// Reserved prefix for per-user memory collections; never grounded on.
pub const MEMORIES_URI_PREFIX: &str = "viking://user/memories/";

/// Assemble grounding context from ranked results.
///
/// Blocks keep rank order. An empty context is a legitimate outcome and
/// not an error; generation handles it via the grounding directive.
pub fn build(results: &SearchResponse) -> Context {
    let blocks: Vec<ContextBlock> = results
        .resources
        .iter()
        .filter(|r| !r.uri.starts_with(MEMORIES_URI_PREFIX))
        .filter_map(|r| {
            r.best_content().map(|text| ContextBlock {
                source_uri: r.uri.clone(),
                text: text.to_string(),
            })
        })
        .collect();

    debug!(
        results = results.len(),
        blocks = blocks.len(),
        "context assembled"
    );

    Context { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResult;

    fn result(uri: &str) -> SearchResult {
        SearchResult {
            uri: uri.to_string(),
            score: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn memories_uris_never_contribute_blocks() {
        let response = SearchResponse {
            resources: vec![
                SearchResult {
                    overview: Some("remembered preference".into()),
                    ..result("viking://user/memories/2024-01-01")
                },
                SearchResult {
                    overview: Some("contract terms".into()),
                    ..result("viking://resources/contract/a")
                },
            ],
        };

        let context = build(&response);
        assert_eq!(context.blocks.len(), 1);
        assert_eq!(context.blocks[0].source_uri, "viking://resources/contract/a");
    }

    #[test]
    fn content_only_result_uses_raw_content_verbatim() {
        let response = SearchResponse {
            resources: vec![SearchResult {
                content: Some("full raw body".into()),
                ..result("viking://resources/contract/a")
            }],
        };

        let context = build(&response);
        assert_eq!(context.blocks[0].text, "full raw body");
    }

    #[test]
    fn results_without_any_content_are_skipped() {
        let response = SearchResponse {
            resources: vec![
                result("viking://resources/contract/bare"),
                SearchResult {
                    abstract_: Some("summary".into()),
                    ..result("viking://resources/contract/b")
                },
            ],
        };

        let context = build(&response);
        assert_eq!(context.blocks.len(), 1);
        assert_eq!(context.blocks[0].text, "summary");
    }

    #[test]
    fn blocks_preserve_rank_order() {
        let response = SearchResponse {
            resources: vec![
                SearchResult {
                    overview: Some("first".into()),
                    ..result("viking://resources/contract/1")
                },
                SearchResult {
                    overview: Some("second".into()),
                    ..result("viking://resources/contract/2")
                },
                SearchResult {
                    overview: Some("third".into()),
                    ..result("viking://resources/contract/3")
                },
            ],
        };

        let context = build(&response);
        let texts: Vec<&str> = context.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_response_builds_empty_context() {
        let context = build(&SearchResponse::default());
        assert!(context.is_empty());
    }
}
