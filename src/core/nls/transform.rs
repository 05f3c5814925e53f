use anyhow::{Context, Result};
use tracing::debug;

use super::entry::{LocalizeFn, NlsEntry};
use super::literal::{parse_localize_key, parse_localize_value};
use super::locator::{CallSite, find_localize_calls};
use super::text_model::TextModel;
use crate::core::parsers::source::{SourceKind, parse_source};

/// Output of transforming one source file.
#[derive(Debug)]
pub struct NlsTransformResult {
    /// Source with every key argument replaced by its placeholder literal,
    /// or the input unchanged when the file has no localize calls.
    pub code: String,
    /// One entry per call, in document order.
    pub entries: Vec<NlsEntry>,
}

impl NlsTransformResult {
    fn unchanged(code: &str) -> Self {
        Self {
            code: code.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Replace the key argument of every `localize`/`localize2` call with a placeholder.
///
/// Substitutions run in reverse document order on a line model, so the positions of
/// calls not yet visited stay valid.
pub fn transform_nls(
    code: &str,
    file_name: &str,
    module_id: &str,
    kind: SourceKind,
) -> Result<NlsTransformResult> {
    if !code.contains("localize") {
        return Ok(NlsTransformResult::unchanged(code));
    }

    let parsed = parse_source(code, file_name, kind)?;

    let mut calls: Vec<(LocalizeFn, CallSite)> = LocalizeFn::ALL
        .iter()
        .flat_map(|target| {
            find_localize_calls(&parsed, *target)
                .into_iter()
                .map(move |call| (*target, call))
        })
        .collect();

    if calls.is_empty() {
        return Ok(NlsTransformResult::unchanged(code));
    }

    calls.sort_by_key(|(_, call)| call.key_span.start);

    let mut entries = Vec::with_capacity(calls.len());
    for (target, call) in &calls {
        let location = || {
            format!(
                "{}:{}:{}",
                file_name,
                call.key_span.start.line + 1,
                call.key_span.start.column + 1
            )
        };
        let key = parse_localize_key(&call.key)
            .with_context(|| format!("{}: unsupported {} key", location(), target.name()))?;
        let message = parse_localize_value(&call.value)
            .with_context(|| format!("{}: unsupported {} message", location(), target.name()))?;
        entries.push(NlsEntry::new(module_id, key, message, target.flavor()));
    }

    let mut model = TextModel::new(code);
    for ((_, call), entry) in calls.iter().zip(&entries).rev() {
        let literal = serde_json::to_string(&entry.placeholder)
            .context("Failed to quote placeholder")?;
        model.apply(call.key_span, &literal);
    }

    debug!(
        file = file_name,
        module_id,
        calls = entries.len(),
        "replaced localize keys with placeholders"
    );

    Ok(NlsTransformResult {
        code: model.to_string(),
        entries,
    })
}
