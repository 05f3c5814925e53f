//! Core engine, independent of the CLI.
//!
//! - `edit`: byte-offset edits applied in one pass
//! - `parsers`: swc-backed parsing of TypeScript/JavaScript sources
//! - `nls`: localize placeholders, message collection and post-processing
//! - `mangle`: private member renaming
//! - `file_scanner`: source discovery
//! - `pipeline`: directory-level runs of each pass

pub mod edit;
pub mod file_scanner;
pub mod mangle;
pub mod nls;
pub mod parsers;
pub mod pipeline;
