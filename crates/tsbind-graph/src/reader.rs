//! In-memory declaration corpus.
//!
//! `TypeDeclarationReader` indexes the top-level `interface` and `type`
//! declarations of each added file with a single token pass, and parses a
//! name's declaration blocks only when that name is first looked up. Parsed
//! declarations are cached, so repeated lookups return the same
//! `Declaration`.

use crate::source::{Declaration, DeclarationKind, DeclarationPart, DeclarationSource};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use tsbind_common::Diagnostic;
use tsbind_parser::{ParserState, look_ahead_is_declaration_start};
use tsbind_scanner::{ScannerState, SyntaxKind, token_is_identifier_or_keyword};

struct CorpusFile {
    name: String,
    text: Arc<str>,
}

/// Byte range of one declaration block, including its leading JSDoc and
/// modifiers.
#[derive(Clone, Copy, Debug)]
struct DeclarationRange {
    file: usize,
    kind: DeclarationKind,
    start: usize,
    end: usize,
}

#[derive(Clone, Default)]
struct ParsedDeclarations {
    interface: Option<Declaration>,
    type_alias: Option<Declaration>,
}

#[derive(Default)]
pub struct TypeDeclarationReader {
    files: Vec<CorpusFile>,
    index: FxHashMap<String, Vec<DeclarationRange>>,
    parsed: DashMap<String, ParsedDeclarations>,
}

impl TypeDeclarationReader {
    pub fn new() -> TypeDeclarationReader {
        TypeDeclarationReader::default()
    }

    pub fn from_source(
        file_name: impl Into<String>,
        text: impl Into<Arc<str>>,
    ) -> TypeDeclarationReader {
        let mut reader = TypeDeclarationReader::new();
        reader.add_file(file_name, text);
        reader
    }

    pub fn from_files<I, N, T>(files: I) -> TypeDeclarationReader
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<Arc<str>>,
    {
        let mut reader = TypeDeclarationReader::new();
        for (name, text) in files {
            reader.add_file(name, text);
        }
        reader
    }

    /// Add a file to the corpus. Declarations it contributes to names that
    /// were already parsed are picked up on the next lookup.
    pub fn add_file(&mut self, file_name: impl Into<String>, text: impl Into<Arc<str>>) {
        let file = self.files.len();
        let name: String = file_name.into();
        let text: Arc<str> = text.into();

        let found = index_declarations(&text);
        debug!(file = %name, declarations = found.len(), "indexed declaration file");

        for (i, (decl_name, kind, start)) in found.iter().enumerate() {
            let end = found.get(i + 1).map_or(text.len(), |next| next.2);
            self.parsed.remove(decl_name.as_str());
            self.index
                .entry(decl_name.clone())
                .or_default()
                .push(DeclarationRange {
                    file,
                    kind: *kind,
                    start: *start,
                    end,
                });
        }
        self.files.push(CorpusFile { name, text });
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every declared name, sorted.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse diagnostics collected for every declaration block of `name`.
    pub fn diagnostics(&self, name: &str) -> Vec<Diagnostic> {
        let parsed = self.lookup(name);
        parsed
            .interface
            .iter()
            .chain(parsed.type_alias.iter())
            .flat_map(|decl| decl.diagnostics().iter().cloned())
            .collect()
    }

    fn lookup(&self, name: &str) -> ParsedDeclarations {
        if let Some(entry) = self.parsed.get(name) {
            return entry.clone();
        }
        let Some(ranges) = self.index.get(name) else {
            return ParsedDeclarations::default();
        };
        let parsed = self.parse_declarations(name, ranges);
        // A concurrent lookup may have won; keep its declarations.
        self.parsed
            .entry(name.to_string())
            .or_insert(parsed)
            .clone()
    }

    fn parse_declarations(&self, name: &str, ranges: &[DeclarationRange]) -> ParsedDeclarations {
        let mut interface_parts = Vec::new();
        let mut interface_diagnostics = Vec::new();
        let mut type_alias = None;

        for range in ranges {
            let Some(file) = self.files.get(range.file) else {
                continue;
            };
            let mut parser = ParserState::new(file.name.as_str(), Arc::clone(&file.text));
            let node = parser.parse_declaration_in_range(range.start, range.end);
            let (arena, diagnostics) = parser.into_parts();

            let Some(kind) = arena.kind(node).and_then(DeclarationKind::of_node) else {
                debug!(name, file = %file.name, start = range.start, "declaration block did not parse");
                continue;
            };
            if kind != range.kind {
                debug!(name, ?kind, expected = ?range.kind, "declaration kind changed on parse");
            }
            let part = DeclarationPart::new(file.name.as_str(), Arc::clone(&file.text), arena, node);
            match kind {
                DeclarationKind::Interface => {
                    interface_parts.push(part);
                    interface_diagnostics.extend(diagnostics);
                }
                DeclarationKind::TypeAlias if type_alias.is_none() => {
                    type_alias = Some(Declaration::new(
                        name,
                        DeclarationKind::TypeAlias,
                        vec![part],
                        diagnostics,
                    ));
                }
                DeclarationKind::TypeAlias => {
                    debug!(name, file = %file.name, "ignoring duplicate type alias");
                }
            }
        }

        trace!(name, interface_blocks = interface_parts.len(), "parsed declarations");
        let interface = (!interface_parts.is_empty()).then(|| {
            Declaration::new(
                name,
                DeclarationKind::Interface,
                interface_parts,
                interface_diagnostics,
            )
        });
        ParsedDeclarations {
            interface,
            type_alias,
        }
    }
}

impl DeclarationSource for TypeDeclarationReader {
    fn try_get_interface(&self, name: &str) -> Option<Declaration> {
        self.lookup(name).interface
    }

    fn try_get_type_alias(&self, name: &str) -> Option<Declaration> {
        self.lookup(name).type_alias
    }
}

// =============================================================================
// Indexing
// =============================================================================

/// Start of the statement beginning at the current token: its JSDoc comment
/// when one directly precedes it.
fn leading_start(scanner: &ScannerState) -> usize {
    scanner
        .get_preceding_jsdoc_range()
        .map_or(scanner.get_token_start(), |(start, _)| start)
}

fn track_depth(depth: u32, token: SyntaxKind) -> u32 {
    match token {
        SyntaxKind::OpenBraceToken | SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken => {
            depth + 1
        }
        SyntaxKind::CloseBraceToken
        | SyntaxKind::CloseParenToken
        | SyntaxKind::CloseBracketToken => depth.saturating_sub(1),
        _ => depth,
    }
}

/// Top-level `interface` / `type` declarations of `text` as
/// `(name, kind, start)`, in source order. Declarations nested in namespaces
/// or blocks are not indexed.
///
/// Outside namespace blocks, a declaration starting on a new line closes any
/// brackets left open before it, so one unclosed body does not hide the
/// declarations that follow.
fn index_declarations(text: &Arc<str>) -> Vec<(String, DeclarationKind, usize)> {
    let mut scanner = ScannerState::new(Arc::clone(text), true);
    let mut found = Vec::new();
    let mut depth: u32 = 0;
    let mut in_namespace = false;
    let mut statement_start: Option<usize> = None;

    let mut token = scanner.scan();
    while token != SyntaxKind::EndOfFileToken {
        if depth > 0
            && !in_namespace
            && scanner.has_preceding_line_break()
            && look_ahead_is_declaration_start(&mut scanner, token)
        {
            trace!(pos = scanner.get_token_start(), "recovered from unclosed block");
            depth = 0;
        }
        if depth == 0 {
            match token {
                SyntaxKind::NamespaceKeyword
                | SyntaxKind::ModuleKeyword
                | SyntaxKind::GlobalKeyword => in_namespace = true,
                _ => {}
            }
        }
        let kind = match token {
            SyntaxKind::InterfaceKeyword => Some(DeclarationKind::Interface),
            SyntaxKind::TypeKeyword => Some(DeclarationKind::TypeAlias),
            _ => None,
        };
        match kind {
            Some(kind) if depth == 0 => {
                let start = statement_start
                    .take()
                    .unwrap_or_else(|| leading_start(&scanner));
                token = scanner.scan();
                if token_is_identifier_or_keyword(token) {
                    found.push((scanner.get_token_value(), kind, start));
                    token = scanner.scan();
                }
                // `token` is unprocessed: it may open a block.
                continue;
            }
            _ => {}
        }
        match token {
            SyntaxKind::ExportKeyword | SyntaxKind::DeclareKeyword if depth == 0 => {
                if statement_start.is_none() {
                    statement_start = Some(leading_start(&scanner));
                }
            }
            _ => {
                let was_nested = depth > 0;
                depth = track_depth(depth, token);
                if was_nested && depth == 0 {
                    in_namespace = false;
                }
                statement_start = None;
            }
        }
        token = scanner.scan();
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<(String, DeclarationKind)> {
        index_declarations(&Arc::from(text))
            .into_iter()
            .map(|(name, kind, _)| (name, kind))
            .collect()
    }

    #[test]
    fn indexes_top_level_declarations_only() {
        let found = names(
            "interface A { type: string; }\n\
             declare namespace ns { interface Hidden {} }\n\
             export type B = A | null;\n\
             declare var type: B;\n",
        );
        assert_eq!(
            found,
            vec![
                ("A".to_string(), DeclarationKind::Interface),
                ("B".to_string(), DeclarationKind::TypeAlias),
            ]
        );
    }

    #[test]
    fn range_starts_at_jsdoc_and_modifiers() {
        let text = "/** Docs. */\nexport declare interface A {}";
        let found = index_declarations(&Arc::from(text));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].2, 0);
    }
}
