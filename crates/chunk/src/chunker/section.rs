//! Heading discovery and the heading stack behind each chunk's section path.

use super::atomic::ProtectedSpan;
use super::helpers::lines;

/// An ATX heading found outside protected spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Byte offset of the start of the heading line.
    pub offset: usize,
    /// 1..=6
    pub level: u8,
    pub title: String,
}

/// Parse `# Title` style lines. The closing `#` run, if any, is dropped.
pub(crate) fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let mut title = rest.trim();
    let without_closing = title.trim_end_matches('#');
    if without_closing.len() < title.len()
        && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
    {
        title = without_closing.trim_end();
    }
    if title.is_empty() {
        return None;
    }
    Some((hashes as u8, title))
}

/// Every heading in `text` that does not sit inside a protected span, in order.
pub fn find_headings(text: &str, spans: &[ProtectedSpan]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut span_idx = 0;

    for line in lines(text) {
        while span_idx < spans.len() && spans[span_idx].end_offset <= line.start {
            span_idx += 1;
        }
        let inside = spans
            .get(span_idx)
            .is_some_and(|s| s.start_offset <= line.start && line.start < s.end_offset);
        if inside {
            continue;
        }
        if let Some((level, title)) = parse_heading(line.text) {
            headings.push(Heading {
                offset: line.start,
                level,
                title: title.to_string(),
            });
        }
    }

    headings
}

/// True when the first non-blank line of `text` is a heading.
pub(crate) fn starts_with_heading(text: &str) -> bool {
    lines(text)
        .find(|l| !l.is_blank())
        .is_some_and(|l| parse_heading(l.text).is_some())
}

/// True when `text` has content and every non-blank line is a heading.
pub(crate) fn is_heading_only(text: &str) -> bool {
    let mut seen = false;
    for line in lines(text).filter(|l| !l.is_blank()) {
        if parse_heading(line.text).is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

/// Stack of open headings, strictly increasing in level from bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContext {
    stack: Vec<(u8, String)>,
}

impl SectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close every open heading at `level` or deeper, then open this one.
    pub fn push(&mut self, level: u8, title: impl Into<String>) {
        while self.stack.last().is_some_and(|(l, _)| *l >= level) {
            self.stack.pop();
        }
        self.stack.push((level, title.into()));
    }

    /// Breadcrumb such as `"SPI > Configuration > DMA"`; empty with no headings.
    pub fn section_path(&self) -> String {
        self.stack
            .iter()
            .map(|(_, title)| title.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Walks a document's headings forward, one chunk at a time.
pub(crate) struct SectionTracker<'h> {
    headings: &'h [Heading],
    next: usize,
    context: SectionContext,
}

impl<'h> SectionTracker<'h> {
    pub fn new(headings: &'h [Heading]) -> Self {
        Self {
            headings,
            next: 0,
            context: SectionContext::new(),
        }
    }

    /// Apply every heading at or before `offset` and return the active path.
    /// Offsets must be non-decreasing across calls.
    pub fn advance_to(&mut self, offset: usize) -> String {
        while let Some(h) = self.headings.get(self.next) {
            if h.offset > offset {
                break;
            }
            self.context.push(h.level, h.title.clone());
            self.next += 1;
        }
        self.context.section_path()
    }
}
