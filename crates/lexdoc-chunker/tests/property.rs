//! Property tests for the chunk token ceiling.

use lexdoc_chunker::TextChunker;
use proptest::prelude::*;

proptest! {
    /// The token ceiling is hard for every multi-unit chunk; only a
    /// single paragraph/sentence that alone exceeds the budget may go
    /// over, and it is emitted as exactly one chunk.
    #[test]
    fn chunk_tokens_respect_budget(
        paragraphs in proptest::collection::vec("[a-z]{2,8}( [a-z]{2,8}){0,40}", 1..12)
    ) {
        let text = paragraphs.join("\n\n");
        let chunker = TextChunker::builder().max_tokens(60).overlap_tokens(10).build();
        for chunk in chunker.chunk(&text) {
            let single_unit = !chunk.text.contains("\n\n");
            prop_assert!(chunk.token_count <= 60 || single_unit);
        }
    }

    /// Non-empty input always yields at least one chunk, and indices are
    /// strictly increasing from zero.
    #[test]
    fn non_empty_input_yields_ordered_chunks(
        text in "[a-z .]{1,400}"
    ) {
        let chunker = TextChunker::builder().max_tokens(20).overlap_tokens(5).build();
        let chunks = chunker.chunk(&text);
        if !text.trim().is_empty() {
            prop_assert!(!chunks.is_empty());
        }
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
    }
}
