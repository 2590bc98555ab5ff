//! Detection of spans that must never be split: fenced code and tables.

use std::ops::Range;

use super::helpers::{lines, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    CodeBlock,
    Table,
}

/// A contiguous byte range of the document that stays inside one chunk.
///
/// `end_offset` stops at the end of the last line's content; the line
/// terminator after it is not part of the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub start_offset: usize,
    pub end_offset: usize,
    pub kind: SpanKind,
}

impl ProtectedSpan {
    /// True when `pos` falls strictly between the span's ends.
    pub fn strictly_contains(&self, pos: usize) -> bool {
        self.start_offset < pos && pos < self.end_offset
    }

    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.start_offset < range.end && self.end_offset > range.start
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opening fence: three or more backticks or tildes at the start of the line.
pub(crate) fn fence_open(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = line.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn is_fence_close(line: &str, ch: char, min_len: usize) -> bool {
    let trimmed = line.trim_end();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == ch) && trimmed.chars().count() >= min_len
}

/// A `|` not preceded by a backslash.
fn has_unescaped_pipe(line: &str) -> bool {
    let mut escaped = false;
    for ch in line.chars() {
        match ch {
            '\\' => escaped = !escaped,
            '|' if !escaped => return true,
            _ => escaped = false,
        }
    }
    false
}

/// `| --- | :---: |` style row: only pipes, dashes, colons and whitespace.
fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

fn is_table_row(line: &Line<'_>) -> bool {
    !line.is_blank() && fence_open(line.text).is_none() && has_unescaped_pipe(line.text)
}

/// Scan `text` for protected spans, sorted by start offset and non-overlapping.
///
/// An unterminated fence extends to the end of the document. Table detection
/// never looks inside a code block.
pub fn find_protected_spans(text: &str) -> Vec<ProtectedSpan> {
    let lines: Vec<Line<'_>> = lines(text).collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some((ch, len)) = fence_open(line.text) {
            let mut end = text.len();
            let mut j = i + 1;
            while j < lines.len() {
                if is_fence_close(lines[j].text, ch, len) {
                    end = lines[j].end();
                    break;
                }
                j += 1;
            }
            spans.push(ProtectedSpan {
                start_offset: line.start,
                end_offset: end,
                kind: SpanKind::CodeBlock,
            });
            i = j + 1;
            continue;
        }

        if is_table_row(&line) && i + 1 < lines.len() && is_separator_row(lines[i + 1].text) {
            let mut j = i + 2;
            while j < lines.len() && is_table_row(&lines[j]) {
                j += 1;
            }
            spans.push(ProtectedSpan {
                start_offset: line.start,
                end_offset: lines[j - 1].end(),
                kind: SpanKind::Table,
            });
            i = j;
            continue;
        }

        i += 1;
    }

    spans
}

/// True when `text` holds at least one markdown table outside code fences.
pub fn contains_table(text: &str) -> bool {
    find_protected_spans(text)
        .iter()
        .any(|s| s.kind == SpanKind::Table)
}
