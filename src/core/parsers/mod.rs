//! Source parsing shared by the NLS and mangle passes.

pub mod source;
