//! Cross-file accumulation of NLS entries and the one-time finalization that assigns
//! every message its runtime index.
//!
//! The collector is shared by reference between per-file transforms running on the
//! rayon pool. [`NlsCollector::finalize`] takes it by value, so it can only run once
//! every borrower has been joined.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use super::entry::{LocalizeKey, NlsEntry};

pub const MESSAGES_FILE: &str = "nls.messages.json";
pub const KEYS_FILE: &str = "nls.keys.json";
pub const METADATA_FILE: &str = "nls.metadata.json";
pub const MESSAGES_SCRIPT_FILE: &str = "nls.messages.js";
pub const PLACEHOLDERS_FILE: &str = "nls.placeholders.json";

/// Placeholder text → message index.
pub type PlaceholderIndex = HashMap<String, usize>;

/// Thread-safe map of placeholder → entry.
///
/// Entries with the same placeholder (same module id, key and flavor) collapse into one;
/// the last write wins.
#[derive(Debug, Default)]
pub struct NlsCollector {
    entries: Mutex<HashMap<String, NlsEntry>>,
}

impl NlsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entry: NlsEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(entry.placeholder.clone(), entry);
    }

    /// Insert a file's entries under a single lock.
    pub fn add_all(&self, new_entries: impl IntoIterator<Item = NlsEntry>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for entry in new_entries {
            entries.insert(entry.placeholder.clone(), entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort all entries by `(module id, key)` and assign indices.
    pub fn finalize(self) -> NlsIndex {
        let entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        NlsIndex::from_entries(entries.into_values().collect())
    }
}

/// The finalized, index-ordered message table.
#[derive(Debug, Default)]
pub struct NlsIndex {
    entries: Vec<NlsEntry>,
    placeholder_index: PlaceholderIndex,
}

impl NlsIndex {
    /// Order is `(module id, primary key)`, byte-wise, with the placeholder as a final
    /// tie-breaker so `localize` and `localize2` of the same key stay deterministic.
    pub fn from_entries(mut entries: Vec<NlsEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.module_id
                .cmp(&b.module_id)
                .then_with(|| a.key.primary().cmp(b.key.primary()))
                .then_with(|| a.placeholder.cmp(&b.placeholder))
        });

        let placeholder_index = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.placeholder.clone(), index))
            .collect();

        Self {
            entries,
            placeholder_index,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NlsEntry] {
        &self.entries
    }

    pub fn placeholder_index(&self) -> &PlaceholderIndex {
        &self.placeholder_index
    }

    pub fn index_of(&self, placeholder: &str) -> Option<usize> {
        self.placeholder_index.get(placeholder).copied()
    }

    /// Flat message array; position is the runtime index.
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    /// `[(module id, [keys])]` in index order.
    pub fn keys_by_module(&self) -> Vec<(&str, Vec<&LocalizeKey>)> {
        let mut grouped: Vec<(&str, Vec<&LocalizeKey>)> = Vec::new();
        for entry in &self.entries {
            match grouped.last_mut() {
                Some((module_id, keys)) if *module_id == entry.module_id.as_str() => {
                    keys.push(&entry.key)
                }
                _ => grouped.push((entry.module_id.as_str(), vec![&entry.key])),
            }
        }
        grouped
    }

    /// `{ "keys": {module: [keys]}, "messages": {module: [messages]} }`.
    pub fn metadata(&self) -> Value {
        let mut keys = Map::new();
        let mut messages = Map::new();
        for entry in &self.entries {
            let module_keys = keys
                .entry(entry.module_id.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = module_keys {
                list.push(serde_json::to_value(&entry.key).unwrap_or(Value::Null));
            }
            let module_messages = messages
                .entry(entry.module_id.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = module_messages {
                list.push(Value::String(entry.message.clone()));
            }
        }

        let mut root = Map::new();
        root.insert("keys".to_string(), Value::Object(keys));
        root.insert("messages".to_string(), Value::Object(messages));
        Value::Object(root)
    }

    /// Script asset assigning the message array to `globalThis.<global_name>`.
    pub fn messages_script(&self, global_name: &str) -> Result<String> {
        let messages = serde_json::to_string(&self.messages())?;
        Ok(format!("globalThis.{}={};", global_name, messages))
    }

    /// Write every artifact into `out_dir`, creating it if needed.
    pub fn write_to(&self, out_dir: &Path, global_name: &str) -> Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

        let placeholders: BTreeMap<&str, usize> = self
            .placeholder_index
            .iter()
            .map(|(placeholder, index)| (placeholder.as_str(), *index))
            .collect();

        let artifacts = [
            (MESSAGES_FILE, serde_json::to_string(&self.messages())?),
            (KEYS_FILE, serde_json::to_string(&self.keys_by_module())?),
            (METADATA_FILE, serde_json::to_string_pretty(&self.metadata())?),
            (MESSAGES_SCRIPT_FILE, self.messages_script(global_name)?),
            (PLACEHOLDERS_FILE, serde_json::to_string_pretty(&placeholders)?),
        ];

        for (name, contents) in artifacts {
            let path = out_dir.join(name);
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }

        Ok(())
    }
}

/// Finalize `collector` and write the artifacts to `out_dir` and every `extra_out_dirs`.
///
/// An empty collector writes nothing and yields an empty index.
pub fn finalize(
    collector: NlsCollector,
    out_dir: &Path,
    extra_out_dirs: &[&Path],
    global_name: &str,
) -> Result<NlsIndex> {
    let index = collector.finalize();
    if index.is_empty() {
        return Ok(index);
    }

    for dir in std::iter::once(out_dir).chain(extra_out_dirs.iter().copied()) {
        index.write_to(dir, global_name)?;
    }

    info!(
        messages = index.len(),
        out_dir = %out_dir.display(),
        "finalized NLS index"
    );

    Ok(index)
}

/// Read the placeholder index written by a previous [`finalize`] run.
pub fn load_placeholder_index(dir: &Path) -> Result<PlaceholderIndex> {
    let path = dir.join(PLACEHOLDERS_FILE);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse placeholder index: {}", path.display()))
}
