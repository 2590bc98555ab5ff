//! Line and word scanning utilities shared by the chunking stages.

/// One line of a document, without its `\n` / `\r\n` terminator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// Byte offset of the first character of the line.
    pub start: usize,
    pub text: &'a str,
}

impl Line<'_> {
    /// Byte offset just past the line's content (terminator excluded).
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Iterate the lines of `text` with absolute offsets, starting at `base`.
pub(crate) fn lines_from(text: &str, base: usize) -> impl Iterator<Item = Line<'_>> {
    let mut offset = base;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Line {
            start,
            text: content,
        }
    })
}

pub(crate) fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    lines_from(text, 0)
}

/// Number of leading whitespace bytes.
pub(crate) fn leading_ws_len(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Absolute offsets where a non-whitespace run begins, starting at `base`.
/// A word at the very start of `text` is included.
pub(crate) fn word_starts(text: &str, base: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_ws = true;
    for (i, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        if !ws && prev_ws {
            starts.push(base + i);
        }
        prev_ws = ws;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_absolute_offsets() {
        let collected: Vec<_> = lines_from("ab\r\ncd\n\nef", 10)
            .map(|l| (l.start, l.text))
            .collect();
        assert_eq!(collected, vec![(10, "ab"), (14, "cd"), (17, ""), (18, "ef")]);
    }

    #[test]
    fn word_starts_skip_whitespace_runs() {
        assert_eq!(word_starts("one  two\nthree", 0), vec![0, 5, 9]);
        assert_eq!(word_starts("  x", 4), vec![6]);
    }

    #[test]
    fn leading_whitespace_is_measured_in_bytes() {
        assert_eq!(leading_ws_len("\n\n  text"), 4);
        assert_eq!(leading_ws_len("text"), 0);
    }
}
