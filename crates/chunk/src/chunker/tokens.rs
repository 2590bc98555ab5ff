//! Token counting, the sizing unit for every budget check.

/// Maps text to a token count. Implementations must be deterministic and
/// return 0 for empty input.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Sub-word estimate without a vocabulary: roughly four characters per
/// token, at least one token per whitespace-separated word. Whitespace is
/// free, so joining two texts at a whitespace boundary adds their counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace()
            .map(|word| word.chars().count().div_ceil(CHARS_PER_TOKEN))
            .sum()
    }
}

/// Count tokens with the default estimator.
pub fn count_tokens(text: &str) -> usize {
    HeuristicCounter.count(text)
}
