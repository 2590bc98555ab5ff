//! Budgeted splitting over a separator priority list.
//!
//! Pieces are packed greedily at the coarsest separator that yields a split;
//! a piece that alone exceeds the budget is queued again at the next, finer
//! separator. The work is driven by an explicit task stack so a pathological
//! input (one huge paragraph, one enormous word) never deepens the call stack.

use std::ops::Range;

use tracing::warn;

use super::atomic::ProtectedSpan;
use super::helpers::{leading_ws_len, lines_from, word_starts};
use super::section::Heading;
use super::tokens::TokenCounter;

/// Split points, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeparatorLevel {
    H1,
    H2,
    /// Headings of level 3 through 6.
    H3Plus,
    /// Start of a non-blank line that follows a blank line.
    Paragraph,
    /// Start of any non-blank line.
    Line,
    /// Start of a non-whitespace run.
    Word,
}

impl SeparatorLevel {
    pub const ORDER: [SeparatorLevel; 6] = [
        SeparatorLevel::H1,
        SeparatorLevel::H2,
        SeparatorLevel::H3Plus,
        SeparatorLevel::Paragraph,
        SeparatorLevel::Line,
        SeparatorLevel::Word,
    ];

    fn matches_heading(&self, level: u8) -> bool {
        match self {
            SeparatorLevel::H1 => level == 1,
            SeparatorLevel::H2 => level == 2,
            SeparatorLevel::H3Plus => level >= 3,
            _ => false,
        }
    }
}

/// A raw piece of the document produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub range: Range<usize>,
    /// Over budget because it holds an atomic block that could not be split.
    pub oversized: bool,
}

enum Task {
    Emit(Range<usize>),
    /// Range plus the index into [`SeparatorLevel::ORDER`] to try first.
    Split(Range<usize>, usize),
}

pub struct Segmenter<'t, 'a, C: TokenCounter + ?Sized> {
    text: &'t str,
    spans: &'a [ProtectedSpan],
    headings: &'a [Heading],
    counter: &'a C,
    budget: usize,
}

impl<'t, 'a, C: TokenCounter + ?Sized> Segmenter<'t, 'a, C> {
    pub fn new(
        text: &'t str,
        spans: &'a [ProtectedSpan],
        headings: &'a [Heading],
        counter: &'a C,
        budget: usize,
    ) -> Self {
        Self {
            text,
            spans,
            headings,
            counter,
            budget: budget.max(1),
        }
    }

    /// Split the whole document into contiguous segments that tile it.
    ///
    /// Every segment fits the budget except those holding a protected span
    /// that could not be split, which are flagged `oversized`.
    pub fn segment(&self) -> Vec<Segment<'t>> {
        if self.text.trim().is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut stack = vec![Task::Split(0..self.text.len(), 0)];

        while let Some(task) = stack.pop() {
            match task {
                Task::Emit(range) => out.push(self.make(range, false)),
                Task::Split(range, level) => {
                    if self.fits(&range) {
                        out.push(self.make(range, false));
                        continue;
                    }
                    match self.find_split_points(&range, level) {
                        Some((found, points)) => {
                            let tasks = self.pack(&range, &points, found);
                            stack.extend(tasks.into_iter().rev());
                        }
                        None if self.holds_protected(&range) => {
                            warn!(
                                start = range.start,
                                end = range.end,
                                budget = self.budget,
                                "atomic block exceeds token budget, emitting whole"
                            );
                            out.push(self.make(range, true));
                        }
                        None => {
                            for piece in self.hard_split(&range) {
                                out.push(self.make(piece, false));
                            }
                        }
                    }
                }
            }
        }

        out
    }

    fn make(&self, range: Range<usize>, oversized: bool) -> Segment<'t> {
        Segment {
            text: &self.text[range.clone()],
            range,
            oversized,
        }
    }

    fn fits(&self, range: &Range<usize>) -> bool {
        self.counter.count(&self.text[range.clone()]) <= self.budget
    }

    fn holds_protected(&self, range: &Range<usize>) -> bool {
        self.spans.iter().any(|s| s.intersects(range))
    }

    /// The first level, from `from` on, that offers at least one valid
    /// interior split point.
    fn find_split_points(&self, range: &Range<usize>, from: usize) -> Option<(usize, Vec<usize>)> {
        (from..SeparatorLevel::ORDER.len()).find_map(|idx| {
            let points = self.points_at(range, SeparatorLevel::ORDER[idx]);
            (!points.is_empty()).then_some((idx, points))
        })
    }

    /// Candidate split offsets inside `range` for one separator level, sorted.
    /// Points never fall in the range's leading whitespace or strictly inside
    /// a protected span.
    fn points_at(&self, range: &Range<usize>, level: SeparatorLevel) -> Vec<usize> {
        let slice = &self.text[range.clone()];
        let floor = range.start + leading_ws_len(slice);
        let interior = |p: usize| p > floor && p < range.end;

        let mut points: Vec<usize> = match level {
            SeparatorLevel::H1 | SeparatorLevel::H2 | SeparatorLevel::H3Plus => self
                .headings
                .iter()
                .filter(|h| level.matches_heading(h.level) && interior(h.offset))
                .map(|h| h.offset)
                .collect(),
            SeparatorLevel::Paragraph => {
                let mut prev_blank = false;
                let mut found = Vec::new();
                for line in lines_from(slice, range.start) {
                    let blank = line.is_blank();
                    if !blank && prev_blank && interior(line.start) {
                        found.push(line.start);
                    }
                    prev_blank = blank;
                }
                found
            }
            SeparatorLevel::Line => lines_from(slice, range.start)
                .filter(|l| !l.is_blank())
                .map(|l| l.start + leading_ws_len(l.text))
                .filter(|&p| interior(p))
                .collect(),
            SeparatorLevel::Word => word_starts(slice, range.start)
                .into_iter()
                .filter(|&p| interior(p))
                .collect(),
        };

        self.retain_outside_spans(&mut points);
        points
    }

    fn retain_outside_spans(&self, points: &mut Vec<usize>) {
        let mut idx = 0;
        points.retain(|&p| {
            while idx < self.spans.len() && self.spans[idx].end_offset <= p {
                idx += 1;
            }
            !self.spans.get(idx).is_some_and(|s| s.strictly_contains(p))
        });
    }

    /// Greedily pack the pieces between `points`; oversized pieces are queued
    /// for the next level.
    fn pack(&self, range: &Range<usize>, points: &[usize], level: usize) -> Vec<Task> {
        let mut bounds = Vec::with_capacity(points.len() + 2);
        bounds.push(range.start);
        bounds.extend_from_slice(points);
        bounds.push(range.end);

        let mut tasks = Vec::new();
        let mut buf: Option<Range<usize>> = None;

        for pair in bounds.windows(2) {
            let piece = pair[0]..pair[1];
            if let Some(current) = buf.take() {
                let joined = current.start..piece.end;
                if self.fits(&joined) {
                    buf = Some(joined);
                    continue;
                }
                tasks.push(Task::Emit(current));
            }
            if self.fits(&piece) {
                buf = Some(piece);
            } else {
                tasks.push(Task::Split(piece, level + 1));
            }
        }
        if let Some(current) = buf {
            tasks.push(Task::Emit(current));
        }

        tasks
    }

    /// Last resort for a single word longer than the budget: cut on
    /// character boundaries into the longest pieces that still fit.
    fn hard_split(&self, range: &Range<usize>) -> Vec<Range<usize>> {
        let slice = &self.text[range.clone()];
        let bounds: Vec<usize> = slice
            .char_indices()
            .skip(1)
            .map(|(i, _)| range.start + i)
            .chain(std::iter::once(range.end))
            .collect();

        let mut pieces = Vec::new();
        let mut start = range.start;
        let mut cursor = 0;

        while start < range.end {
            let candidates = &bounds[cursor..];
            let fitting = candidates.partition_point(|&end| self.fits(&(start..end)));
            // Always advance by at least one character.
            let take = fitting.max(1);
            let end = candidates[take - 1];
            pieces.push(start..end);
            start = end;
            cursor += take;
        }

        pieces
    }
}
