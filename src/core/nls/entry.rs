//! NLS data model: localization keys, collected entries and placeholder text.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// The two recognized localization functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalizeFn {
    /// `localize(key, message)`: the message is dropped from production output.
    Localize,
    /// `localize2(key, message)`: the message stays next to the index at runtime.
    Localize2,
}

impl LocalizeFn {
    pub const ALL: [LocalizeFn; 2] = [LocalizeFn::Localize, LocalizeFn::Localize2];

    pub fn name(self) -> &'static str {
        match self {
            LocalizeFn::Localize => "localize",
            LocalizeFn::Localize2 => "localize2",
        }
    }

    pub fn flavor(self) -> PlaceholderFlavor {
        match self {
            LocalizeFn::Localize => PlaceholderFlavor::BlankMessage,
            LocalizeFn::Localize2 => PlaceholderFlavor::KeepMessage,
        }
    }
}

/// Which placeholder prefix an entry uses, and therefore what happens to its
/// fallback message during production post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceholderFlavor {
    /// `%%NLS:...%%`
    BlankMessage,
    /// `%%NLS2:...%%`
    KeepMessage,
}

impl PlaceholderFlavor {
    pub fn prefix(self) -> &'static str {
        match self {
            PlaceholderFlavor::BlankMessage => "NLS",
            PlaceholderFlavor::KeepMessage => "NLS2",
        }
    }

    /// Recover the flavor from placeholder text such as `%%NLS2:a/b#key%%`.
    pub fn of_placeholder(placeholder: &str) -> Option<Self> {
        if placeholder.starts_with("%%NLS2:") {
            Some(PlaceholderFlavor::KeepMessage)
        } else if placeholder.starts_with("%%NLS:") {
            Some(PlaceholderFlavor::BlankMessage)
        } else {
            None
        }
    }
}

/// A localization key as written at the call site.
///
/// Both shapes survive into `nls.keys.json` and `nls.metadata.json` unchanged:
/// a bare key serializes as a string, a structured key as `{"key": ..., "comment": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizeKey {
    Plain(String),
    Structured { key: String, comment: Vec<String> },
}

impl LocalizeKey {
    /// The key string used for placeholders and ordering.
    pub fn primary(&self) -> &str {
        match self {
            LocalizeKey::Plain(key) => key,
            LocalizeKey::Structured { key, .. } => key,
        }
    }
}

/// One localized message discovered in one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NlsEntry {
    pub module_id: String,
    pub key: LocalizeKey,
    pub message: String,
    pub placeholder: String,
}

impl NlsEntry {
    pub fn new(
        module_id: &str,
        key: LocalizeKey,
        message: String,
        flavor: PlaceholderFlavor,
    ) -> Self {
        let placeholder = make_placeholder(flavor, module_id, key.primary());
        Self {
            module_id: module_id.to_string(),
            key,
            message,
            placeholder,
        }
    }

    pub fn flavor(&self) -> Option<PlaceholderFlavor> {
        PlaceholderFlavor::of_placeholder(&self.placeholder)
    }
}

/// Placeholder text for `(module_id, key)`: `%%NLS:<moduleId>#<key>%%` or `%%NLS2:...%%`.
///
/// Depends on nothing but its arguments, so every build run produces byte-identical
/// placeholders for the same call.
pub fn make_placeholder(flavor: PlaceholderFlavor, module_id: &str, key: &str) -> String {
    format!("%%{}:{}#{}%%", flavor.prefix(), module_id, key)
}

/// Derive the slash-separated module id of `file` relative to `source_root`,
/// with the extension stripped (`src/vs/base/common/errors.ts` -> `vs/base/common/errors`).
///
/// Returns `None` when `file` is not under `source_root`.
pub fn module_id_for(file: &Path, source_root: &Path) -> Option<String> {
    let relative = file.strip_prefix(source_root).ok()?;
    let without_ext = relative.with_extension("");

    let segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_text() {
        assert_eq!(
            make_placeholder(PlaceholderFlavor::BlankMessage, "vs/base/common/errors", "ok"),
            "%%NLS:vs/base/common/errors#ok%%"
        );
        assert_eq!(
            make_placeholder(PlaceholderFlavor::KeepMessage, "vs/a", "title"),
            "%%NLS2:vs/a#title%%"
        );
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let flavor = PlaceholderFlavor::BlankMessage;
        let a = NlsEntry::new("vs/a", LocalizeKey::Plain("k".into()), "one".into(), flavor);
        let b = NlsEntry::new("vs/a", LocalizeKey::Plain("k".into()), "two".into(), flavor);
        assert_eq!(a.placeholder, b.placeholder);
    }

    #[test]
    fn test_structured_key_uses_primary_key() {
        let key = LocalizeKey::Structured {
            key: "save".into(),
            comment: vec!["Save the file".into()],
        };
        let entry = NlsEntry::new("vs/editor", key, "Save".into(), PlaceholderFlavor::KeepMessage);
        assert_eq!(entry.placeholder, "%%NLS2:vs/editor#save%%");
        assert_eq!(entry.flavor(), Some(PlaceholderFlavor::KeepMessage));
    }

    #[test]
    fn test_key_serialization_shapes() {
        let plain = serde_json::to_string(&LocalizeKey::Plain("a".into())).unwrap();
        assert_eq!(plain, r#""a""#);

        let structured = serde_json::to_string(&LocalizeKey::Structured {
            key: "b".into(),
            comment: vec!["c".into()],
        })
        .unwrap();
        assert_eq!(structured, r#"{"key":"b","comment":["c"]}"#);
    }

    #[test]
    fn test_module_id_for() {
        let root = Path::new("/repo/src");
        assert_eq!(
            module_id_for(Path::new("/repo/src/vs/base/common/errors.ts"), root),
            Some("vs/base/common/errors".to_string())
        );
        assert_eq!(module_id_for(Path::new("/elsewhere/a.ts"), root), None);
    }

    #[test]
    fn test_flavor_of_placeholder() {
        assert_eq!(
            PlaceholderFlavor::of_placeholder("%%NLS:a#b%%"),
            Some(PlaceholderFlavor::BlankMessage)
        );
        assert_eq!(
            PlaceholderFlavor::of_placeholder("%%NLS2:a#b%%"),
            Some(PlaceholderFlavor::KeepMessage)
        );
        assert_eq!(PlaceholderFlavor::of_placeholder("hello"), None);
    }
}
