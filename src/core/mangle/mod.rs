//! Private-field-to-property rewriting.
//!
//! Native private members (`#field`, `#method()`, `get #x()`, `#x in obj`) are renamed
//! to ordinary properties with short generated names. Every distinct
//! `(class, private name)` pair in a file gets its own name from a single counter,
//! so renamed members cannot collide across an inheritance chain, and the `$` prefix
//! keeps them apart from the usual public member names.
//!
//! Resolution is syntactic: each class body pushes a scope of its own private names,
//! and every private identifier resolves innermost-first against the scope stack.

pub mod names;
pub mod resolver;

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

pub use names::{NAME_SIGIL, NameGenerator, short_name};
pub use resolver::PrivateNameResolver;

use crate::core::edit::apply_edits;
use crate::core::parsers::source::{SourceKind, parse_source};

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    pub code: String,
    /// Classes that declare at least one private member.
    pub class_count: usize,
    /// Distinct private names renamed.
    pub field_count: usize,
    /// Edits applied (declarations plus uses).
    pub edit_count: usize,
    pub elapsed: Duration,
}

impl ConvertResult {
    fn unchanged(code: &str, elapsed: Duration) -> Self {
        Self {
            code: code.to_string(),
            class_count: 0,
            field_count: 0,
            edit_count: 0,
            elapsed,
        }
    }
}

/// Convert private members in a JavaScript file.
pub fn convert(code: &str) -> Result<ConvertResult> {
    convert_with_kind(code, "input.js", SourceKind::JavaScript { jsx: false })
}

/// Convert private members, parsing with the given grammar.
///
/// Input without any `#` is returned untouched without being parsed.
pub fn convert_with_kind(code: &str, file_name: &str, kind: SourceKind) -> Result<ConvertResult> {
    let start = Instant::now();

    if !code.contains('#') {
        return Ok(ConvertResult::unchanged(code, start.elapsed()));
    }

    let parsed = parse_source(code, file_name, kind)?;

    let mut names = NameGenerator::new();
    let (mut edits, class_count) = PrivateNameResolver::new(&parsed, &mut names).resolve();

    if edits.is_empty() {
        return Ok(ConvertResult::unchanged(code, start.elapsed()));
    }

    let converted = apply_edits(code, &mut edits);
    let result = ConvertResult {
        code: converted,
        class_count,
        field_count: names.count(),
        edit_count: edits.len(),
        elapsed: start.elapsed(),
    };

    debug!(
        file = file_name,
        classes = result.class_count,
        fields = result.field_count,
        edits = result.edit_count,
        "converted private fields"
    );

    Ok(result)
}
