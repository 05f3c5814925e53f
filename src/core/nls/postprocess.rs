//! Rewrites compiled output: placeholder literals become message indices.
//!
//! ```text
//! localize("%%NLS:vs/a#hello%%", "Hello")   production       → localize(3, null)
//!                                           preserve-English → localize(3, "Hello")
//! localize2("%%NLS2:vs/a#title%%", 'Title') either mode       → localize2(4, 'Title')
//! ```

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use super::collector::PlaceholderIndex;
use super::entry::PlaceholderFlavor;
use super::literal::parse_localize_value;

/// What happens to the fallback message next to a `%%NLS:` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostprocessMode {
    /// Keep the English message in the output.
    PreserveEnglish,
    /// Replace the message literal with `null`.
    Production,
}

impl PostprocessMode {
    pub fn from_preserve_english(preserve_english: bool) -> Self {
        if preserve_english {
            PostprocessMode::PreserveEnglish
        } else {
            PostprocessMode::Production
        }
    }
}

/// A quoted placeholder, optionally followed by `, <message literal>`.
///
/// String bodies are matched escape-by-escape so a `\"` inside a key or message never
/// ends it.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        (?P<placeholder>
            "%%NLS2?:(?:[^"\\\n]|\\.)*%%"
          | '%%NLS2?:(?:[^'\\\n]|\\.)*%%'
        )
        (?:
            (?P<sep>\s*,\s*)
            (?P<msg>
                "(?:[^"\\\n]|\\(?s:.))*"
              | '(?:[^'\\\n]|\\(?s:.))*'
              | `(?:[^`\\]|\\(?s:.))*`
            )
        )?
        "#,
    )
    .expect("placeholder regex is valid")
});

#[derive(Debug, Default)]
pub struct PostprocessResult {
    pub code: String,
    /// Placeholders replaced by an index.
    pub replaced: usize,
    /// Fallback messages replaced by `null`.
    pub blanked: usize,
    /// Placeholders left untouched because the index has no entry for them.
    pub missing: Vec<String>,
}

/// Replace every placeholder literal in `code` with its index.
///
/// Placeholders absent from `index` are left as they are.
pub fn postprocess_nls(
    code: &str,
    index: &PlaceholderIndex,
    mode: PostprocessMode,
) -> PostprocessResult {
    if !code.contains("%%NLS") {
        return PostprocessResult {
            code: code.to_string(),
            ..Default::default()
        };
    }

    let mut replaced = 0;
    let mut blanked = 0;
    let mut missing = Vec::new();

    let rewritten = PLACEHOLDER_REGEX.replace_all(code, |caps: &Captures| {
        let Some(quoted) = caps.name("placeholder") else {
            return caps[0].to_string();
        };
        // Keys containing quotes or backslashes reach the output escaped.
        let placeholder = match parse_localize_value(quoted.as_str()) {
            Ok(placeholder) => placeholder,
            Err(_) => quoted.as_str()[1..quoted.len() - 1].to_string(),
        };

        let Some(message_index) = index.get(&placeholder) else {
            warn!(placeholder = %placeholder, "no index for NLS placeholder");
            missing.push(placeholder);
            return caps[0].to_string();
        };
        replaced += 1;

        let blank_message = mode == PostprocessMode::Production
            && PlaceholderFlavor::of_placeholder(&placeholder)
                == Some(PlaceholderFlavor::BlankMessage);

        match (caps.name("sep"), caps.name("msg")) {
            (Some(sep), Some(msg)) if blank_message && !msg.as_str().contains("${") => {
                blanked += 1;
                format!("{}{}null", message_index, sep.as_str())
            }
            (Some(sep), Some(msg)) => {
                format!("{}{}{}", message_index, sep.as_str(), msg.as_str())
            }
            _ => message_index.to_string(),
        }
    });

    PostprocessResult {
        code: rewritten.into_owned(),
        replaced,
        blanked,
        missing,
    }
}
