//! Overlap injection and small-chunk merging over raw segments.

use std::ops::Range;

use hwctx_core::ChunkConfig;
use tracing::debug;

use super::atomic::ProtectedSpan;
use super::helpers::{lines_from, word_starts};
use super::section::{parse_heading, starts_with_heading};
use super::segmenter::Segment;
use super::tokens::TokenCounter;

/// A chunk-to-be: its own source range plus an optional overlap prefix
/// that starts at `prefix_start` and runs up to `range.start`.
///
/// `oversized` is set only when an unsplittable block alone is larger than
/// `max_tokens`; a block that fits `max_tokens` but not the split budget
/// is treated like any other draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Draft {
    pub prefix_start: usize,
    pub range: Range<usize>,
    pub tokens: usize,
    pub oversized: bool,
}

impl Draft {
    pub fn content<'t>(&self, text: &'t str) -> &'t str {
        &text[self.prefix_start..self.range.end]
    }

    pub fn overlap_len(&self) -> usize {
        self.range.start - self.prefix_start
    }
}

pub(crate) struct PostProcessor<'t, 'a, C: TokenCounter + ?Sized> {
    text: &'t str,
    spans: &'a [ProtectedSpan],
    counter: &'a C,
    config: &'a ChunkConfig,
}

impl<'t, 'a, C: TokenCounter + ?Sized> PostProcessor<'t, 'a, C> {
    pub fn new(
        text: &'t str,
        spans: &'a [ProtectedSpan],
        counter: &'a C,
        config: &'a ChunkConfig,
    ) -> Self {
        Self {
            text,
            spans,
            counter,
            config,
        }
    }

    fn count(&self, range: Range<usize>) -> usize {
        self.counter.count(&self.text[range])
    }

    /// Prefix each segment with the tail of its predecessor.
    ///
    /// Segments opening with a heading get no overlap. The tail is taken in
    /// whole words, never from a protected span, and shrinks as needed to
    /// keep the receiving chunk within `max_tokens`.
    pub fn apply_overlap(&self, segments: &[Segment<'t>]) -> Vec<Draft> {
        let mut drafts = Vec::with_capacity(segments.len());

        for (i, seg) in segments.iter().enumerate() {
            let prefix_start = match i.checked_sub(1).map(|p| &segments[p]) {
                Some(prev) if self.config.overlap_tokens > 0 && !starts_with_heading(seg.text) => {
                    self.overlap_start(&prev.range, &seg.range)
                }
                _ => seg.range.start,
            };
            drafts.push(Draft {
                prefix_start,
                range: seg.range.clone(),
                tokens: self.count(prefix_start..seg.range.end),
                oversized: seg.oversized && self.count(seg.range.clone()) > self.config.max_tokens,
            });
        }

        let with_overlap = drafts.iter().filter(|d| d.overlap_len() > 0).count();
        debug!(segments = segments.len(), with_overlap, "overlap applied");
        drafts
    }

    fn overlap_start(&self, prev: &Range<usize>, cur: &Range<usize>) -> usize {
        let floor = self
            .spans
            .iter()
            .filter(|s| s.intersects(prev))
            .map(|s| s.end_offset)
            .fold(prev.start, usize::max)
            .min(prev.end);
        let floor = self.last_heading_end(floor..prev.end).unwrap_or(floor);

        let mut start = cur.start;
        for w in word_starts(&self.text[floor..prev.end], floor).into_iter().rev() {
            if self.count(w..prev.end) > self.config.overlap_tokens
                || self.count(w..cur.end) > self.config.max_tokens
            {
                break;
            }
            start = w;
        }
        start
    }

    /// End of the last heading line in `range`, so overlap stays inside the
    /// section the receiving chunk belongs to. `range` holds no protected text.
    fn last_heading_end(&self, range: Range<usize>) -> Option<usize> {
        lines_from(&self.text[range.clone()], range.start)
            .filter(|l| l.start == 0 || self.text.as_bytes()[l.start - 1] == b'\n')
            .filter(|l| parse_heading(l.text).is_some())
            .map(|l| l.end())
            .last()
    }

    /// Fold drafts below `min_tokens` into a neighbour, the successor first.
    /// A merge that would exceed `max_tokens` is skipped unless one side
    /// already holds an atomic block larger than `max_tokens`. A lone draft is returned as is.
    pub fn merge_small(&self, drafts: Vec<Draft>) -> Vec<Draft> {
        let min = self.config.min_tokens;
        if drafts.len() <= 1 || min == 0 {
            return drafts;
        }

        let before = drafts.len();
        let mut out: Vec<Draft> = Vec::with_capacity(before);
        let mut iter = drafts.into_iter().peekable();

        while let Some(mut cur) = iter.next() {
            while cur.tokens < min {
                let Some(merged) = iter.peek().and_then(|next| self.try_merge(&cur, next)) else {
                    break;
                };
                iter.next();
                cur = merged;
            }

            if cur.tokens < min {
                if let Some(prev) = out.last_mut() {
                    if let Some(merged) = self.try_merge(prev, &cur) {
                        *prev = merged;
                        continue;
                    }
                }
            }

            out.push(cur);
        }

        debug!(before, after = out.len(), "small chunks merged");
        out
    }

    /// Join two adjacent drafts. The second one's overlap prefix is already
    /// part of the first one's body, so it disappears.
    fn try_merge(&self, first: &Draft, second: &Draft) -> Option<Draft> {
        let prefix_start = first.prefix_start;
        let range = first.range.start..second.range.end;
        let tokens = self.count(prefix_start..range.end);
        let oversized = first.oversized || second.oversized;

        (tokens <= self.config.max_tokens || oversized).then_some(Draft {
            prefix_start,
            range,
            tokens,
            oversized,
        })
    }
}
