//! Parser state: token cursor, diagnostics and speculative parsing.
//!
//! `ParserState` drives the scanner one token at a time and builds nodes into
//! a `NodeArena`. The grammar itself is split across `state_statements.rs`
//! (declarations and type members) and `state_types.rs` (type expressions).

use super::base::{NodeIndex, NodeList};
use super::jsdoc::JsDocParser;
use super::node_arena::NodeArena;
use std::sync::Arc;
use tracing::trace;
use tsbind_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use tsbind_scanner::{ScannerState, SyntaxKind, token_is_identifier_or_keyword, token_to_text};

/// Conditional types are not allowed here (inside the `extends` clause of
/// another conditional or an `infer` constraint).
pub const CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES: u32 = 1 << 0;
/// Parsing the members of a type literal or interface body.
pub const CONTEXT_FLAG_TYPE_MEMBERS: u32 = 1 << 1;

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) source: Arc<str>,
    pub(crate) current_token: SyntaxKind,
    pub(crate) context_flags: u32,
    pub(crate) parse_diagnostics: Vec<Diagnostic>,
    /// Current nesting depth of `parse_type`.
    pub(crate) type_depth: u32,
}

impl ParserState {
    pub fn new(file_name: impl Into<String>, source: impl Into<Arc<str>>) -> ParserState {
        let source: Arc<str> = source.into();
        let mut scanner = ScannerState::new(Arc::clone(&source), true);
        let current_token = scanner.scan();
        ParserState {
            scanner,
            // Sub-range parses of large corpora only touch a few nodes.
            arena: NodeArena::with_capacity((source.len() / 8).min(4096)),
            file_name: file_name.into(),
            source,
            current_token,
            context_flags: 0,
            parse_diagnostics: Vec::new(),
            type_depth: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.parse_diagnostics
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn get_source_text(&self) -> &str {
        &self.source
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    /// Consume the parser, returning the arena and all diagnostics.
    pub fn into_parts(mut self) -> (NodeArena, Vec<Diagnostic>) {
        self.collect_scanner_diagnostics();
        (self.arena, self.parse_diagnostics)
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.scan();
        self.current_token
    }

    /// Start of the current token, excluding leading trivia.
    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start() as u32
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end() as u32
    }

    /// End of the last consumed token. Used as the `end` of a node that was
    /// just completed.
    #[inline]
    pub(crate) fn node_end(&self) -> u32 {
        self.scanner.get_token_full_start() as u32
    }

    #[inline]
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        token_is_identifier_or_keyword(self.current_token)
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind`, or report "'x' expected." at the current token.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            return true;
        }
        let text = token_to_text(kind).unwrap_or("token");
        self.parse_error_at_current_token(&diagnostic_messages::EXPECTED, &[text]);
        false
    }

    pub(crate) fn make_node_list(&self, nodes: Vec<NodeIndex>) -> NodeList {
        self.arena.make_node_list(nodes)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(
        &mut self,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        // One error per position: later errors at the same spot are cascades.
        if let Some(last) = self.parse_diagnostics.last()
            && last.start == start
        {
            return;
        }
        trace!(start, code = message.code, "parse error");
        self.parse_diagnostics.push(Diagnostic::from_message(
            self.file_name.as_str(),
            start,
            length,
            message,
            args,
        ));
    }

    pub(crate) fn parse_error_at_current_token(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, args);
    }

    /// Report a skipped construct spanning `[start, end)`.
    pub(crate) fn report_unsupported(&mut self, start: u32, end: u32, construct: &str) {
        self.parse_error_at(
            start,
            end.saturating_sub(start),
            &diagnostic_messages::UNSUPPORTED_CONSTRUCT_SKIPPED,
            &[construct],
        );
    }

    /// Move scanner diagnostics into the parse diagnostics and sort by position.
    pub(crate) fn collect_scanner_diagnostics(&mut self) {
        let scanner_diagnostics = self.scanner.take_scanner_diagnostics();
        if scanner_diagnostics.is_empty() {
            return;
        }
        for diag in scanner_diagnostics {
            let message = tsbind_common::diagnostics::get_diagnostic_message(diag.code);
            let category = message.map_or(
                tsbind_common::DiagnosticCategory::Error,
                |m| m.category,
            );
            self.parse_diagnostics.push(Diagnostic {
                file: self.file_name.clone(),
                start: diag.pos as u32,
                length: diag.length as u32,
                message_text: diag.message.to_string(),
                category,
                code: diag.code,
            });
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);
    }

    // =========================================================================
    // Speculative parsing
    // =========================================================================

    /// Run `f` and roll everything back afterwards: scanner position, current
    /// token, diagnostics and any nodes it created.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let diagnostics_len = self.parse_diagnostics.len();
        let arena_len = self.arena.len();
        let context_flags = self.context_flags;

        let result = f(self);

        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.parse_diagnostics.truncate(diagnostics_len);
        self.arena.truncate(arena_len);
        self.context_flags = context_flags;
        result
    }

    /// Run `f`; keep its effects if it returns `Some`, roll back otherwise.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut ParserState) -> Option<T>) -> Option<T> {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let diagnostics_len = self.parse_diagnostics.len();
        let arena_len = self.arena.len();
        let context_flags = self.context_flags;

        let result = f(self);
        if result.is_none() {
            self.scanner.restore_state(snapshot);
            self.current_token = current;
            self.parse_diagnostics.truncate(diagnostics_len);
            self.arena.truncate(arena_len);
            self.context_flags = context_flags;
        }
        result
    }

    /// Peek at the token after the current one.
    pub(crate) fn look_ahead_next_is(&mut self, check: impl FnOnce(SyntaxKind) -> bool) -> bool {
        super::parse_rules::look_ahead_is(&mut self.scanner, check)
    }

    // =========================================================================
    // Identifiers and names
    // =========================================================================

    /// Parse an identifier. Keywords are accepted as names. On anything else,
    /// report "Identifier expected." and return a missing identifier.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_identifier_or_keyword() {
            let text = self.scanner.get_token_value();
            let end = self.token_end();
            self.next_token();
            return self.arena.add_identifier(start, end, text);
        }
        self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        self.create_missing_identifier()
    }

    pub(crate) fn create_missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let node = self.arena.add_identifier(pos, pos, String::new());
        self.arena
            .set_flags(node, super::node::node_flags::MISSING);
        node
    }

    /// `A` or `A.B.C`.
    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let first = self.parse_identifier_name();
        self.parse_qualified_name_rest(start, first)
    }

    pub(crate) fn parse_qualified_name_rest(&mut self, start: u32, first: NodeIndex) -> NodeIndex {
        let mut left = first;
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name();
            left = self.arena.add_qualified_name(
                start,
                self.node_end(),
                super::node::QualifiedNameData { left, right },
            );
        }
        left
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip one balanced unit starting at the current token: a bracketed group
    /// (`(...)`, `[...]`, `{...}`, `<...>` when `angle` is set) or a single token.
    pub(crate) fn skip_balanced(&mut self, angle: bool) {
        let mut depth: u32 = 0;
        let mut steps: u32 = 0;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::LessThanToken if angle => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => depth = depth.saturating_sub(1),
                SyntaxKind::GreaterThanToken if angle => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
            steps += 1;
            if depth == 0 || steps >= tsbind_common::limits::MAX_SKIP_TOKENS {
                return;
            }
        }
    }

    // =========================================================================
    // JSDoc
    // =========================================================================

    /// Parse the JSDoc comment directly preceding the current token, if any.
    pub(crate) fn parse_jsdoc_for_current_token(&mut self) -> NodeIndex {
        let Some((start, end)) = self.scanner.get_preceding_jsdoc_range() else {
            return NodeIndex::NONE;
        };
        let mut parser = JsDocParser::new(
            &mut self.arena,
            &mut self.parse_diagnostics,
            &self.file_name,
            Arc::clone(&self.source),
        );
        parser.parse_comment(start, end - start).unwrap_or(NodeIndex::NONE)
    }
}
