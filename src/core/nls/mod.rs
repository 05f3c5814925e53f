//! NLS placeholder pipeline.
//!
//! 1. [`transform`]: per source file, replace the key of every `localize`/`localize2`
//!    call with a `%%NLS:<moduleId>#<key>%%` placeholder and report the entries found.
//! 2. [`collector`]: gather entries from all files, then sort and index them once
//!    every file is done, writing the `nls.*` artifacts.
//! 3. [`postprocess`]: per compiled file, swap placeholders for their message index.

pub mod collector;
pub mod entry;
pub mod literal;
pub mod locator;
pub mod postprocess;
pub mod text_model;
pub mod transform;

pub use collector::{NlsCollector, NlsIndex, PlaceholderIndex, finalize, load_placeholder_index};
pub use entry::{LocalizeFn, LocalizeKey, NlsEntry, PlaceholderFlavor, module_id_for};
pub use literal::LiteralError;
pub use postprocess::{PostprocessMode, PostprocessResult, postprocess_nls};
pub use transform::{NlsTransformResult, transform_nls};
