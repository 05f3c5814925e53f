use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, SourceFile, SourceMap, Span, sync::Lrc};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Which grammar a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    TypeScript { tsx: bool },
    JavaScript { jsx: bool },
}

impl SourceKind {
    /// Pick the grammar from a file extension. Unknown extensions parse as plain JavaScript.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => SourceKind::TypeScript { tsx: false },
            Some("tsx") => SourceKind::TypeScript { tsx: true },
            Some("jsx") => SourceKind::JavaScript { jsx: true },
            _ => SourceKind::JavaScript { jsx: false },
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            SourceKind::TypeScript { tsx } => Syntax::Typescript(TsSyntax {
                tsx,
                decorators: true,
                ..Default::default()
            }),
            SourceKind::JavaScript { jsx } => Syntax::Es(EsSyntax {
                jsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// A parsed file plus what is needed to map swc spans back onto the original text.
pub struct ParsedSource {
    pub program: Program,
    pub source_file: Lrc<SourceFile>,
    code: String,
}

impl ParsedSource {
    /// The original text the program was parsed from.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Byte offset into [`ParsedSource::code`] for a position produced by the parser.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.source_file.start_pos.0)) as usize
    }

    /// `[start, end)` byte range of a span.
    pub fn range(&self, span: Span) -> (usize, usize) {
        (self.offset(span.lo), self.offset(span.hi))
    }

    /// Source text covered by a span.
    pub fn slice(&self, span: Span) -> &str {
        let (start, end) = self.range(span);
        self.code.get(start..end).unwrap_or_default()
    }
}

/// Parse JS/TS source into a [`Program`].
///
/// Each call uses its own `SourceMap` and swc globals, so files can be parsed on any
/// rayon worker without shared state.
pub fn parse_source(code: &str, file_name: &str, kind: SourceKind) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let source_file =
            source_map.new_source_file(FileName::Real(file_name.into()).into(), code.to_string());

        let mut parser = Parser::new(kind.syntax(), StringInput::from(&*source_file), None);

        let program = parser
            .parse_program()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_name, e.into_kind().msg()))?;

        // Recovered errors still mean the tree does not match the text.
        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(anyhow!(
                "Failed to parse {}: {:?}",
                file_name,
                e.into_kind().msg()
            ));
        }

        Ok(ParsedSource {
            program,
            source_file,
            code: code.to_string(),
        })
    })
}
