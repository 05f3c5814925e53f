//! Text edits against an immutable source buffer.
//!
//! Both rewriting passes discover their substitutions in arbitrary order while walking
//! a syntax tree, collect them as [`Edit`]s, and apply them once at the end. Applying
//! a sorted list is a single linear walk that copies the untouched gaps and the
//! replacement texts into a fresh buffer, instead of splicing the source repeatedly.

/// A single `[start, end) -> new_text` substitution, in byte offsets of the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl Edit {
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    /// Pure insertion at `offset`.
    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(offset, offset, new_text)
    }
}

/// Sort `edits` by start offset and apply them to `text`.
///
/// Edits must not overlap (adjacent is fine). Overlapping edits are a caller bug and
/// produce an unspecified, but memory-safe, result.
pub fn apply_edits(text: &str, edits: &mut [Edit]) -> String {
    edits.sort_by_key(|edit| edit.start);
    apply_sorted_edits(text, edits)
}

/// Apply edits that are already sorted ascending by `start`.
pub fn apply_sorted_edits(text: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return text.to_string();
    }

    let replaced: usize = edits.iter().map(|e| e.end.saturating_sub(e.start)).sum();
    let inserted: usize = edits.iter().map(|e| e.new_text.len()).sum();
    let mut out = String::with_capacity((text.len() + inserted).saturating_sub(replaced));

    let mut cursor = 0;
    for edit in edits {
        // An overlapping edit would move the cursor backwards; clamp instead of panicking.
        let start = edit.start.max(cursor).min(text.len());
        out.push_str(&text[cursor..start]);
        out.push_str(&edit.new_text);
        cursor = edit.end.max(start).min(text.len());
    }
    out.push_str(&text[cursor..]);

    out
}
