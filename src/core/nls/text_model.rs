//! Line-oriented text buffer used to substitute placeholders into source files.
//!
//! Positions are 0-based `(line, column)` pairs, where `column` is a byte offset inside
//! the line. Replacements never move text between lines, so applying several of them in
//! reverse document order leaves every earlier position valid.

use std::fmt;

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A `start..end` range of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start: Position,
    pub end: Position,
}

impl TextSpan {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Maps byte offsets of a text to [`Position`]s.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line, offset - self.line_starts[line])
    }
}

/// Mutable buffer of lines that remembers each line's original ending.
pub struct TextModel {
    lines: Vec<String>,
    /// `"\r\n"`, `"\n"`, or `""` for the last line.
    line_endings: Vec<&'static str>,
}

impl TextModel {
    pub fn new(contents: &str) -> Self {
        let mut lines = Vec::new();
        let mut line_endings = Vec::new();
        for line in contents.split_inclusive('\n') {
            if let Some(line) = line.strip_suffix("\r\n") {
                lines.push(line.to_string());
                line_endings.push("\r\n");
            } else if let Some(line) = line.strip_suffix('\n') {
                lines.push(line.to_string());
                line_endings.push("\n");
            } else {
                lines.push(line.to_string());
                line_endings.push("");
            }
        }
        // A trailing newline (or empty input) leaves an empty last line.
        if line_endings.last().is_none_or(|eol| !eol.is_empty()) {
            lines.push(String::new());
            line_endings.push("");
        }
        Self {
            lines,
            line_endings,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Replace `span` with `content`.
    ///
    /// The tail of the end line is joined onto the start line and every following line
    /// of the span is blanked, so the line count never changes. Columns past the end of a
    /// line are clamped.
    pub fn apply(&mut self, span: TextSpan, content: &str) {
        let start_line = self.line(span.start.line).unwrap_or_default();
        let end_line = self.line(span.end.line).unwrap_or_default();

        let head = prefix(start_line, span.start.column);
        let tail = suffix(end_line, span.end.column);
        let replaced = format!("{head}{content}{tail}");

        if let Some(line) = self.lines.get_mut(span.start.line) {
            *line = replaced;
        }
        let blank_end = span.end.line.min(self.lines.len().saturating_sub(1));
        for line in self.lines.iter_mut().take(blank_end + 1).skip(span.start.line + 1) {
            line.clear();
        }
    }
}

impl fmt::Display for TextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, eol) in self.lines.iter().zip(&self.line_endings) {
            f.write_str(line)?;
            f.write_str(eol)?;
        }
        Ok(())
    }
}

fn prefix(line: &str, column: usize) -> &str {
    line.get(..column.min(line.len())).unwrap_or(line)
}

fn suffix(line: &str, column: usize) -> &str {
    line.get(column.min(line.len())..).unwrap_or_default()
}
