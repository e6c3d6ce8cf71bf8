//! Deterministic token estimation.
//!
//! Every chunk-size decision in the pipeline routes through
//! [`TokenCounter::estimate`] so token budgets are consistent across the
//! chunker, the assembler and the cost estimator.

/// Token counter with a fixed character-class heuristic.
pub struct TokenCounter;

impl TokenCounter {
    /// Estimate the token count of a text span.
    ///
    /// Deterministic and side-effect free; empty or whitespace-only input
    /// returns 0. ASCII text takes a byte-length fast path (~4 chars per
    /// token); other scripts fall back to a character count.
    #[must_use]
    pub fn estimate(text: &str) -> usize {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return 0;
        }

        // Fast path for ASCII (the common case for legal Dutch/English text)
        if trimmed.is_ascii() {
            return trimmed.len().div_ceil(4);
        }

        trimmed.chars().count().div_ceil(4)
    }
}
