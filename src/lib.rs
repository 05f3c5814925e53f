//! nlsmangle - build-time source rewriting for JavaScript/TypeScript bundles
//!
//! Two independent passes:
//!
//! - **NLS**: `localize(key, message)` calls are rewritten to carry placeholders,
//!   collected into a global message table, and later swapped for numeric indices
//!   in compiled output.
//! - **Mangle**: native private class members (`#field`) become short ordinary
//!   properties, unique per declaring class.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Parsing, rewriting and directory pipelines
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
