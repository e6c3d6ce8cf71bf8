//! Sentence-boundary overlap between consecutive chunks.

use crate::segment::SentenceSegmenter;
use lexdoc_core::TokenCounter;

/// Extract whole trailing sentences from `text` until the overlap token
/// budget is filled.
///
/// Sentences are never split: if not even the last sentence fits the
/// budget, the overlap is omitted entirely rather than truncated
/// mid-sentence.
#[must_use]
pub fn sentence_suffix(text: &str, target_tokens: usize) -> String {
    if target_tokens == 0 {
        return String::new();
    }

    let sentences = SentenceSegmenter::split(text);
    let mut suffix: Vec<&str> = Vec::new();
    let mut tokens = 0;

    for sentence in sentences.iter().rev() {
        let sentence_tokens = TokenCounter::estimate(sentence);
        if tokens + sentence_tokens > target_tokens {
            break;
        }
        suffix.push(sentence);
        tokens += sentence_tokens;
    }

    suffix.reverse();
    suffix.join(" ")
}
