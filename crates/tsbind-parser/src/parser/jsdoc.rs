//! JSDoc comment parser.
//!
//! A `/** ... */` comment body is tokenized with `ScannerState::scan_jsdoc_token`
//! (whitespace and newlines are tokens) and walked by a small state machine
//! that separates free comment text from `@tag` blocks. Type expressions in
//! braces (`{Array.<string>=}`) switch to the regular scanner, since their
//! grammar is an ordinary token stream.
//!
//! Nodes are added to the caller's `NodeArena`; diagnostics go to the caller's
//! list. Malformed tags are kept as plain `JSDocTag` nodes and never abort the
//! comment.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ArrayTypeData, CompositeTypeData, FunctionTypeData, JsDocData, JsDocParameterTagData,
    JsDocTagData, JsDocTemplateTagData, JsDocTypeLiteralData, JsDocTypedTagData,
    JsDocTypedefTagData, LiteralData, LiteralTypeData, ParameterData, PropertySignatureData,
    QualifiedNameData, TupleTypeData, TypeLiteralData, TypeParameterData, TypeRefData,
    WrappedTypeData, node_flags,
};
use super::node_arena::NodeArena;
use super::syntax_kind_ext;
use std::sync::Arc;
use tracing::trace;
use tsbind_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use tsbind_common::limits::{MAX_JSDOC_CHILD_TAGS, MAX_TYPE_NESTING_DEPTH};
use tsbind_scanner::{
    ScannerSnapshot, ScannerState, SyntaxKind, char_codes::is_line_break,
    token_is_identifier_or_keyword, token_to_text,
};

/// File name recorded on diagnostics from the isolated entry points.
const ISOLATED_FILE_NAME: &str = "jsdoc";

/// Position of the comment walker relative to the current line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum JsDocState {
    /// At the start of a line, before the leading `*`.
    BeginningOfLine,
    /// Saw the leading `*` of a line (or the opening `/**`).
    SawAsterisk,
    /// Collecting comment text.
    SavingComments,
}

/// Result of parsing a comment or type expression outside a source file.
#[derive(Debug)]
pub struct JsDocParseResult {
    pub arena: NodeArena,
    pub node: NodeIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a single `/** */` comment found at `[start, start + length)` of `content`.
///
/// Returns `None` when the range does not start with `/**`.
pub fn parse_isolated_jsdoc_comment(
    content: &str,
    start: usize,
    length: usize,
) -> Option<JsDocParseResult> {
    let mut arena = NodeArena::new();
    let mut diagnostics = Vec::new();
    let node = {
        let mut parser = JsDocParser::new(
            &mut arena,
            &mut diagnostics,
            ISOLATED_FILE_NAME,
            Arc::from(content),
        );
        parser.parse_comment(start, length)?
    };
    Some(JsDocParseResult {
        arena,
        node,
        diagnostics,
    })
}

/// Parse a braced JSDoc type expression (`{...}`) at `[start, start + length)`.
///
/// Returns `None` when the range does not start with `{`.
pub fn parse_jsdoc_type_expression_for_tests(
    content: &str,
    start: usize,
    length: usize,
) -> Option<JsDocParseResult> {
    let mut arena = NodeArena::new();
    let mut diagnostics = Vec::new();
    let node = {
        let mut parser = JsDocParser::new(
            &mut arena,
            &mut diagnostics,
            ISOLATED_FILE_NAME,
            Arc::from(content),
        );
        parser.scanner.set_text(Arc::from(content), start, Some(length));
        parser.next_token();
        if !parser.is_token(SyntaxKind::OpenBraceToken) {
            return None;
        }
        let node = parser.parse_type_expression();
        parser.arena.fixup_parent_references(node);
        parser.collect_scanner_diagnostics();
        node
    };
    Some(JsDocParseResult {
        arena,
        node,
        diagnostics,
    })
}

/// Accumulates comment text, tracking the column so continuation lines can
/// be re-indented relative to the first line's margin.
struct CommentBuffer {
    parts: Vec<String>,
    margin: Option<usize>,
    indent: usize,
}

impl CommentBuffer {
    fn new(indent: usize) -> CommentBuffer {
        CommentBuffer {
            parts: Vec::new(),
            margin: None,
            indent,
        }
    }

    fn push(&mut self, text: &str) {
        if self.margin.is_none() {
            self.margin = Some(self.indent);
        }
        self.parts.push(text.to_string());
        self.indent += text.len();
    }

    /// Keep the part of leading whitespace that lies beyond the margin.
    fn push_indentation(&mut self, whitespace: &str) {
        if let Some(margin) = self.margin
            && self.indent + whitespace.len() > margin
        {
            let from = margin as isize - self.indent as isize - 1;
            self.parts.push(slice_from(whitespace, from).to_string());
        }
        self.indent += whitespace.len();
    }

    fn remove_trailing_newlines(&mut self) {
        while self.parts.last().is_some_and(|p| is_newline_text(p)) {
            self.parts.pop();
        }
    }

    fn finish(mut self) -> String {
        let leading = self
            .parts
            .iter()
            .take_while(|p| is_newline_text(p))
            .count();
        self.parts.drain(..leading);
        self.remove_trailing_newlines();
        let mut text = self.parts.concat();
        text.truncate(text.trim_end().len());
        text
    }
}

fn is_newline_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_line_break)
}

/// `text[from..]`, where a negative `from` counts back from the end.
fn slice_from(text: &str, from: isize) -> &str {
    let len = text.len() as isize;
    let start = if from < 0 { (len + from).max(0) } else { from.min(len) };
    text.get(start as usize..).unwrap_or("")
}

/// Parser for one JSDoc comment, writing into a shared arena.
pub struct JsDocParser<'a> {
    arena: &'a mut NodeArena,
    diagnostics: &'a mut Vec<Diagnostic>,
    file_name: &'a str,
    source: Arc<str>,
    scanner: ScannerState,
    token: SyntaxKind,
    /// Top-level tags parsed so far.
    tags: Vec<NodeIndex>,
    /// Diagnostics already present when this parser was created.
    diagnostics_start: usize,
    type_depth: u32,
}

impl<'a> JsDocParser<'a> {
    pub fn new(
        arena: &'a mut NodeArena,
        diagnostics: &'a mut Vec<Diagnostic>,
        file_name: &'a str,
        source: Arc<str>,
    ) -> JsDocParser<'a> {
        let diagnostics_start = diagnostics.len();
        let scanner = ScannerState::new(Arc::clone(&source), true);
        JsDocParser {
            arena,
            diagnostics,
            file_name,
            source,
            scanner,
            token: SyntaxKind::Unknown,
            tags: Vec::new(),
            diagnostics_start,
            type_depth: 0,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Advance with the JSDoc tokenizer (comment text).
    fn next_jsdoc_token(&mut self) -> SyntaxKind {
        self.token = self.scanner.scan_jsdoc_token();
        self.token
    }

    /// Advance with the regular tokenizer (type expressions).
    fn next_token(&mut self) -> SyntaxKind {
        self.token = self.scanner.scan();
        self.token
    }

    #[inline]
    fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token == kind
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.get_token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.get_token_end() as u32
    }

    #[inline]
    fn node_end(&self) -> u32 {
        self.scanner.get_token_full_start() as u32
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let text = token_to_text(kind).unwrap_or("token");
        self.error_at_current_token(&diagnostic_messages::EXPECTED, &[text]);
        false
    }

    fn skip_whitespace(&mut self) {
        while self.is_token(SyntaxKind::WhitespaceTrivia) || self.is_token(SyntaxKind::NewLineTrivia)
        {
            self.next_jsdoc_token();
        }
    }

    fn save(&self) -> (ScannerSnapshot, SyntaxKind, usize, usize) {
        (
            self.scanner.save_state(),
            self.token,
            self.arena.len(),
            self.diagnostics.len(),
        )
    }

    fn restore(&mut self, saved: (ScannerSnapshot, SyntaxKind, usize, usize)) {
        let (snapshot, token, arena_len, diagnostics_len) = saved;
        self.scanner.restore_state(snapshot);
        self.token = token;
        self.arena.truncate(arena_len);
        self.diagnostics.truncate(diagnostics_len);
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn error_at(&mut self, start: u32, length: u32, message: &DiagnosticMessage, args: &[&str]) {
        if let Some(last) = self.diagnostics.last()
            && last.start == start
        {
            return;
        }
        self.diagnostics.push(Diagnostic::from_message(
            self.file_name,
            start,
            length,
            message,
            args,
        ));
    }

    fn error_at_current_token(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.error_at(start, length, message, args);
    }

    fn has_new_diagnostics(&self) -> bool {
        self.diagnostics.len() > self.diagnostics_start
    }

    fn collect_scanner_diagnostics(&mut self) {
        for diag in self.scanner.take_scanner_diagnostics() {
            self.diagnostics.push(Diagnostic::error(
                self.file_name.to_string(),
                diag.pos as u32,
                diag.length as u32,
                diag.message.to_string(),
                diag.code,
            ));
        }
    }

    // =========================================================================
    // Comment
    // =========================================================================

    /// Parse the comment at `[start, start + length)` into a `JSDocComment` node.
    pub fn parse_comment(&mut self, start: usize, length: usize) -> Option<NodeIndex> {
        let end = start.saturating_add(length).min(self.source.len());
        if !is_jsdoc_start(&self.source, start) || end < start + 5 {
            return None;
        }

        self.tags.clear();
        self.scanner
            .set_text(Arc::clone(&self.source), start + 3, Some(end - start - 5));

        let line_start = self.source[..start].rfind('\n').unwrap_or(0);
        let mut comments = CommentBuffer::new(start - line_start + 4);
        let mut state = JsDocState::SawAsterisk;

        self.next_jsdoc_token();
        while self.is_token(SyntaxKind::WhitespaceTrivia) {
            self.next_jsdoc_token();
        }
        if self.is_token(SyntaxKind::NewLineTrivia) {
            state = JsDocState::BeginningOfLine;
            comments.indent = 0;
            self.next_jsdoc_token();
        }

        let mut advance = true;
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let text = self.scanner.get_token_text().to_string();
            match self.token {
                SyntaxKind::AtToken
                    if matches!(
                        state,
                        JsDocState::BeginningOfLine | JsDocState::SawAsterisk
                    ) =>
                {
                    comments.remove_trailing_newlines();
                    self.parse_tag(comments.indent);
                    state = JsDocState::BeginningOfLine;
                    advance = false;
                    comments.margin = None;
                    comments.indent += 1;
                }
                SyntaxKind::NewLineTrivia => {
                    comments.parts.push(text);
                    state = JsDocState::BeginningOfLine;
                    comments.indent = 0;
                }
                SyntaxKind::AsteriskToken if state == JsDocState::BeginningOfLine => {
                    state = JsDocState::SawAsterisk;
                    comments.indent += text.len();
                }
                SyntaxKind::WhitespaceTrivia => {
                    if state == JsDocState::SavingComments {
                        comments.parts.push(text.clone());
                        comments.indent += text.len();
                    } else {
                        comments.push_indentation(&text);
                    }
                }
                _ => {
                    state = JsDocState::SavingComments;
                    comments.push(&text);
                }
            }
            if advance {
                self.next_jsdoc_token();
            } else {
                advance = true;
            }
        }

        let comment = comments.finish();
        let comment = (!comment.is_empty()).then_some(comment);
        let tags = std::mem::take(&mut self.tags);
        let tags = self.arena.make_node_list(tags);
        let node = self.arena.add_jsdoc(
            start as u32,
            end as u32,
            JsDocData { comment, tags },
        );
        self.arena.fixup_parent_references(node);
        self.collect_scanner_diagnostics();
        trace!(start, end, "parsed jsdoc comment");
        Some(node)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    fn parse_tag(&mut self, indent: usize) {
        let at_pos = self.token_pos();
        self.next_jsdoc_token();
        let Some(tag_name) = self.parse_jsdoc_identifier_name() else {
            return;
        };
        self.skip_whitespace();

        let name_text = self
            .arena
            .get_identifier_text(tag_name)
            .unwrap_or_default()
            .to_string();
        let parsed = match name_text.as_str() {
            "augments" | "extends" => Some(self.parse_typed_tag(
                syntax_kind_ext::JSDOC_AUGMENTS_TAG,
                at_pos,
                tag_name,
            )),
            "param" | "arg" | "argument" => self.parse_param_tag(at_pos, tag_name),
            "return" | "returns" => {
                self.check_duplicate_tag(syntax_kind_ext::JSDOC_RETURN_TAG, tag_name, &name_text);
                Some(self.parse_typed_tag(syntax_kind_ext::JSDOC_RETURN_TAG, at_pos, tag_name))
            }
            "type" => {
                self.check_duplicate_tag(syntax_kind_ext::JSDOC_TYPE_TAG, tag_name, &name_text);
                Some(self.parse_typed_tag(syntax_kind_ext::JSDOC_TYPE_TAG, at_pos, tag_name))
            }
            "template" => {
                self.check_duplicate_tag(
                    syntax_kind_ext::JSDOC_TEMPLATE_TAG,
                    tag_name,
                    &name_text,
                );
                self.parse_template_tag(at_pos, tag_name)
            }
            "typedef" => Some(self.parse_typedef_tag(at_pos, tag_name)),
            _ => None,
        };
        let tag = parsed.unwrap_or_else(|| self.unknown_tag(at_pos, tag_name));

        let tag_len = self
            .arena
            .get(tag)
            .map_or(0, |n| n.end.saturating_sub(n.pos) as usize);
        let comment = self.parse_tag_comments(indent + tag_len);
        if let Some(node) = self.arena.get_mut(tag) {
            node.data.set_tag_comment(comment);
        }
        self.tags.push(tag);
    }

    fn unknown_tag(&mut self, at_pos: u32, tag_name: NodeIndex) -> NodeIndex {
        let end = self.node_end();
        self.arena.add_jsdoc_tag(
            at_pos,
            end,
            JsDocTagData {
                tag_name,
                comment: String::new(),
            },
        )
    }

    fn check_duplicate_tag(&mut self, kind: u16, tag_name: NodeIndex, name_text: &str) {
        let duplicate = self.tags.iter().any(|&t| self.arena.is_kind(t, kind));
        if duplicate {
            let pos = self.arena.get(tag_name).map_or(0, |n| n.pos);
            let length = self.token_pos().saturating_sub(pos);
            self.error_at(
                pos,
                length,
                &diagnostic_messages::TAG_ALREADY_SPECIFIED,
                &[name_text],
            );
        }
    }

    /// Free text following a tag, up to the next `@` or the end of the comment.
    fn parse_tag_comments(&mut self, indent: usize) -> String {
        let mut comments = CommentBuffer::new(indent);
        let mut state = JsDocState::SawAsterisk;

        while !self.is_token(SyntaxKind::AtToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let text = self.scanner.get_token_text().to_string();
            match self.token {
                SyntaxKind::NewLineTrivia => {
                    if state >= JsDocState::SawAsterisk {
                        state = JsDocState::BeginningOfLine;
                        comments.parts.push(text);
                    }
                    comments.indent = 0;
                }
                SyntaxKind::WhitespaceTrivia => {
                    if state == JsDocState::SavingComments {
                        comments.push(&text);
                    } else {
                        comments.push_indentation(&text);
                    }
                }
                SyntaxKind::AsteriskToken if state == JsDocState::BeginningOfLine => {
                    state = JsDocState::SawAsterisk;
                    comments.indent += text.len();
                }
                _ => {
                    state = JsDocState::SavingComments;
                    comments.push(&text);
                }
            }
            self.next_jsdoc_token();
        }

        comments.finish()
    }

    /// `@returns {T}`, `@type {T}`, `@augments {T}`
    fn parse_typed_tag(&mut self, kind: u16, at_pos: u32, tag_name: NodeIndex) -> NodeIndex {
        let type_expression = self
            .try_parse_type_expression()
            .unwrap_or(NodeIndex::NONE);
        let end = self.node_end();
        self.arena.add_jsdoc_typed_tag(
            kind,
            at_pos,
            end,
            JsDocTypedTagData {
                tag_name,
                type_expression,
                comment: String::new(),
            },
        )
    }

    /// `@param {T} name`, `@param name {T}`, `@param {T} [name=default]`
    fn parse_param_tag(&mut self, at_pos: u32, tag_name: NodeIndex) -> Option<NodeIndex> {
        let type_expression = self.try_parse_type_expression();
        self.skip_whitespace();

        let mut is_bracketed = false;
        let name = if self.is_token(SyntaxKind::OpenBracketToken) {
            self.next_jsdoc_token();
            let name = self.parse_jsdoc_identifier_name();
            self.skip_whitespace();
            is_bracketed = true;
            if self.is_token(SyntaxKind::EqualsToken) {
                self.skip_bracketed_default();
            }
            if self.is_token(SyntaxKind::CloseBracketToken) {
                self.next_jsdoc_token();
            } else {
                self.error_at_current_token(&diagnostic_messages::EXPECTED, &["]"]);
            }
            name
        } else if token_is_identifier_or_keyword(self.token) {
            self.parse_jsdoc_identifier_name()
        } else {
            None
        };

        let Some(name) = name else {
            let pos = self.node_end();
            self.error_at(pos, 0, &diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return None;
        };

        let is_name_first = type_expression.is_none();
        let type_expression = match type_expression {
            Some(expr) => expr,
            None => self
                .try_parse_type_expression()
                .unwrap_or(NodeIndex::NONE),
        };

        let end = self.node_end();
        Some(self.arena.add_jsdoc_parameter_tag(
            syntax_kind_ext::JSDOC_PARAMETER_TAG,
            at_pos,
            end,
            JsDocParameterTagData {
                tag_name,
                name,
                type_expression,
                is_bracketed,
                is_name_first,
                comment: String::new(),
            },
        ))
    }

    /// Skip `= default` inside `[name = default]`, stopping at the closing `]`.
    fn skip_bracketed_default(&mut self) {
        let mut depth: u32 = 0;
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            match self.token {
                SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBracketToken if depth == 0 => return,
                SyntaxKind::CloseBracketToken => depth -= 1,
                SyntaxKind::NewLineTrivia => return,
                _ => {}
            }
            self.next_jsdoc_token();
        }
    }

    /// `@template T, U`
    fn parse_template_tag(&mut self, at_pos: u32, tag_name: NodeIndex) -> Option<NodeIndex> {
        let mut type_parameters = Vec::new();
        loop {
            let name = self.parse_jsdoc_identifier_name();
            self.skip_whitespace();
            let Some(name) = name else {
                let pos = self.node_end();
                self.error_at(pos, 0, &diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
                return None;
            };
            let (pos, end) = self.arena.get(name).map_or((0, 0), |n| (n.pos, n.end));
            type_parameters.push(self.arena.add_type_parameter(
                pos,
                end,
                TypeParameterData {
                    name,
                    constraint: NodeIndex::NONE,
                    default: NodeIndex::NONE,
                },
            ));
            if self.is_token(SyntaxKind::CommaToken) {
                self.next_jsdoc_token();
                self.skip_whitespace();
            } else {
                break;
            }
        }

        let type_parameters = self.arena.make_node_list(type_parameters);
        let end = self.node_end();
        Some(self.arena.add_jsdoc_template_tag(
            at_pos,
            end,
            JsDocTemplateTagData {
                tag_name,
                type_parameters,
                comment: String::new(),
            },
        ))
    }

    /// `@typedef {T} Name`, `@typedef {Object} ns.Name` followed by
    /// `@property` lines, or an untyped `@typedef Name` with `@property` lines.
    fn parse_typedef_tag(&mut self, at_pos: u32, tag_name: NodeIndex) -> NodeIndex {
        let type_expression = self.try_parse_type_expression();
        self.skip_whitespace();

        let full_name = self
            .parse_jsdoc_type_name_with_namespace()
            .unwrap_or(NodeIndex::NONE);
        let name = match self.arena.get_qualified_name(full_name) {
            Some(qualified) => qualified.right,
            None => full_name,
        };
        self.skip_whitespace();

        let type_literal = match type_expression {
            Some(expr) if self.is_object_type_expression(expr) => self.scan_child_tags(),
            Some(expr) => {
                let inner = self
                    .arena
                    .get_wrapped_type(expr)
                    .map_or(NodeIndex::NONE, |w| w.type_node);
                if self.arena.is_kind(inner, syntax_kind_ext::JSDOC_TYPE_LITERAL) {
                    inner
                } else {
                    NodeIndex::NONE
                }
            }
            None => self.scan_child_tags(),
        };

        let end = self.node_end();
        self.arena.add_jsdoc_typedef_tag(
            at_pos,
            end,
            JsDocTypedefTagData {
                tag_name,
                full_name,
                name,
                type_expression: type_expression.unwrap_or(NodeIndex::NONE),
                type_literal,
                comment: String::new(),
            },
        )
    }

    /// `{Object}`
    fn is_object_type_expression(&self, expr: NodeIndex) -> bool {
        let Some(inner) = self.arena.get_wrapped_type(expr).map(|w| w.type_node) else {
            return false;
        };
        if !self.arena.is_kind(inner, syntax_kind_ext::JSDOC_TYPE_REFERENCE) {
            return false;
        }
        self.arena
            .get_type_ref(inner)
            .and_then(|r| self.arena.get_identifier_text(r.type_name))
            == Some("Object")
    }

    /// `Name` or `ns.sub.Name`.
    fn parse_jsdoc_type_name_with_namespace(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();
        let mut name = self.parse_jsdoc_identifier_name()?;
        while self.is_token(SyntaxKind::DotToken) {
            self.next_jsdoc_token();
            let right = self.parse_jsdoc_identifier_name()?;
            let end = self.node_end();
            name = self
                .arena
                .add_qualified_name(start, end, QualifiedNameData { left: name, right });
        }
        Some(name)
    }

    /// Collect `@property`/`@prop`/`@type` tags on the lines following a
    /// typedef. Stops at the first tag that cannot belong to the typedef,
    /// leaving the scanner on that tag's `@`.
    fn scan_child_tags(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut property_tags = Vec::new();
        let mut type_tag = NodeIndex::NONE;
        let mut can_parse_tag = true;
        let mut seen_asterisk = false;
        let mut child_count: u32 = 0;

        while !self.is_token(SyntaxKind::EndOfFileToken) && child_count < MAX_JSDOC_CHILD_TAGS {
            self.next_jsdoc_token();
            match self.token {
                SyntaxKind::AtToken => {
                    if can_parse_tag {
                        let saved = self.save();
                        if !self.try_parse_child_tag(&mut property_tags, &mut type_tag) {
                            self.restore(saved);
                            break;
                        }
                        child_count += 1;
                    }
                    seen_asterisk = false;
                }
                SyntaxKind::NewLineTrivia => {
                    can_parse_tag = true;
                    seen_asterisk = false;
                }
                SyntaxKind::AsteriskToken => {
                    if seen_asterisk {
                        can_parse_tag = false;
                    }
                    seen_asterisk = true;
                }
                SyntaxKind::Identifier => can_parse_tag = false,
                _ => {}
            }
        }

        let property_tags = self.arena.make_node_list(property_tags);
        let end = self.node_end();
        self.arena.add_jsdoc_type_literal(
            start,
            end,
            JsDocTypeLiteralData {
                property_tags,
                type_tag,
            },
        )
    }

    fn try_parse_child_tag(
        &mut self,
        property_tags: &mut Vec<NodeIndex>,
        type_tag: &mut NodeIndex,
    ) -> bool {
        let at_pos = self.token_pos();
        self.next_jsdoc_token();
        let Some(tag_name) = self.parse_jsdoc_identifier_name() else {
            return false;
        };
        self.skip_whitespace();

        let name_text = self
            .arena
            .get_identifier_text(tag_name)
            .unwrap_or_default()
            .to_string();
        match name_text.as_str() {
            "type" => {
                if type_tag.is_some() {
                    return false;
                }
                *type_tag = self.parse_typed_tag(syntax_kind_ext::JSDOC_TYPE_TAG, at_pos, tag_name);
                true
            }
            "prop" | "property" => match self.parse_property_tag(at_pos, tag_name) {
                Some(tag) => {
                    property_tags.push(tag);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// `@property {T} name`
    fn parse_property_tag(&mut self, at_pos: u32, tag_name: NodeIndex) -> Option<NodeIndex> {
        let type_expression = self.try_parse_type_expression();
        self.skip_whitespace();
        let name = self.parse_jsdoc_identifier_name();
        self.skip_whitespace();
        let Some(name) = name else {
            let pos = self.node_end();
            self.error_at(pos, 0, &diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return None;
        };

        let end = self.node_end();
        Some(self.arena.add_jsdoc_parameter_tag(
            syntax_kind_ext::JSDOC_PROPERTY_TAG,
            at_pos,
            end,
            JsDocParameterTagData {
                tag_name,
                name,
                type_expression: type_expression.unwrap_or(NodeIndex::NONE),
                is_bracketed: false,
                is_name_first: type_expression.is_none(),
                comment: String::new(),
            },
        ))
    }

    /// Identifier in comment text (may contain `-`). Reports "Identifier
    /// expected." and returns `None` on anything else.
    fn parse_jsdoc_identifier_name(&mut self) -> Option<NodeIndex> {
        if !token_is_identifier_or_keyword(self.token) {
            self.error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return None;
        }
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.get_token_text().to_string();
        let node = self.arena.add_identifier(pos, end, text);
        self.next_jsdoc_token();
        Some(node)
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    /// Skip whitespace and parse `{...}` if present; otherwise leave the
    /// scanner untouched.
    fn try_parse_type_expression(&mut self) -> Option<NodeIndex> {
        let saved = self.save();
        self.skip_whitespace();
        if !self.is_token(SyntaxKind::OpenBraceToken) {
            self.restore(saved);
            return None;
        }
        Some(self.parse_type_expression())
    }

    /// `{Type}`; the closing brace is consumed with the comment tokenizer.
    pub fn parse_type_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let type_node = self.parse_top_level_type();
        if self.is_token(SyntaxKind::CloseBraceToken) {
            self.next_jsdoc_token();
        } else {
            self.error_at_current_token(&diagnostic_messages::EXPECTED, &["}"]);
        }
        let end = self.node_end();
        self.arena.add_wrapped_type(
            syntax_kind_ext::JSDOC_TYPE_EXPRESSION,
            start,
            end,
            WrappedTypeData { type_node },
        )
    }

    /// A type followed by `|` alternatives and an optional `=` marker.
    fn parse_top_level_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut ty = self.parse_jsdoc_type();
        if self.is_token(SyntaxKind::BarToken) {
            let types = self.parse_type_list(ty);
            let end = self.node_end();
            ty = self.arena.add_composite_type(
                syntax_kind_ext::JSDOC_UNION_TYPE,
                start,
                end,
                CompositeTypeData { types },
            );
        }
        if self.parse_optional(SyntaxKind::EqualsToken) {
            let end = self.node_end();
            ty = self.arena.add_wrapped_type(
                syntax_kind_ext::JSDOC_OPTIONAL_TYPE,
                start,
                end,
                WrappedTypeData { type_node: ty },
            );
        }
        ty
    }

    fn parse_type_list(&mut self, first: NodeIndex) -> NodeList {
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_jsdoc_type());
        }
        self.arena.make_node_list(types)
    }

    /// Basic type followed by postfix `[]`, `?` and `!`.
    fn parse_jsdoc_type(&mut self) -> NodeIndex {
        if self.type_depth >= MAX_TYPE_NESTING_DEPTH {
            let limit = MAX_TYPE_NESTING_DEPTH.to_string();
            self.error_at_current_token(
                &diagnostic_messages::TYPE_NESTING_TOO_DEEP,
                &[limit.as_str()],
            );
            let pos = self.token_pos();
            let node = self.arena.add_identifier(pos, pos, String::new());
            self.arena.set_flags(node, node_flags::MISSING);
            return node;
        }
        self.type_depth += 1;

        let start = self.token_pos();
        let mut ty = self.parse_basic_type_expression();
        loop {
            match self.token {
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    let end = self.node_end();
                    ty = self.arena.add_array_type(
                        syntax_kind_ext::JSDOC_ARRAY_TYPE,
                        start,
                        end,
                        ArrayTypeData { element_type: ty },
                    );
                }
                SyntaxKind::QuestionToken | SyntaxKind::ExclamationToken => {
                    let kind = if self.is_token(SyntaxKind::QuestionToken) {
                        syntax_kind_ext::JSDOC_NULLABLE_TYPE
                    } else {
                        syntax_kind_ext::JSDOC_NON_NULLABLE_TYPE
                    };
                    self.next_token();
                    let end = self.node_end();
                    ty = self
                        .arena
                        .add_wrapped_type(kind, start, end, WrappedTypeData { type_node: ty });
                    self.arena.set_flags(ty, node_flags::JSDOC_POSTFIX);
                }
                _ => break,
            }
        }

        self.type_depth -= 1;
        ty
    }

    fn parse_basic_type_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token {
            SyntaxKind::AsteriskToken => {
                let end = self.token_end();
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::JSDOC_ALL_TYPE, start, end)
            }
            SyntaxKind::QuestionToken => self.parse_unknown_or_nullable_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let first = self.parse_jsdoc_type();
                let types = self.parse_type_list(first);
                self.parse_expected(SyntaxKind::CloseParenToken);
                let end = self.node_end();
                self.arena.add_composite_type(
                    syntax_kind_ext::JSDOC_UNION_TYPE,
                    start,
                    end,
                    CompositeTypeData { types },
                )
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let elements = self.parse_delimited_list(
                    SyntaxKind::CloseBracketToken,
                    JsDocParser::parse_jsdoc_type,
                );
                self.parse_expected(SyntaxKind::CloseBracketToken);
                let end = self.node_end();
                self.arena.add_tuple_type(
                    syntax_kind_ext::JSDOC_TUPLE_TYPE,
                    start,
                    end,
                    TupleTypeData { elements },
                )
            }
            SyntaxKind::ExclamationToken => {
                self.parse_prefixed_type(syntax_kind_ext::JSDOC_NON_NULLABLE_TYPE, false)
            }
            SyntaxKind::DotDotDotToken => {
                self.parse_prefixed_type(syntax_kind_ext::JSDOC_VARIADIC_TYPE, false)
            }
            SyntaxKind::NewKeyword => {
                self.parse_prefixed_type(syntax_kind_ext::JSDOC_CONSTRUCTOR_TYPE, true)
            }
            SyntaxKind::ThisKeyword => {
                self.parse_prefixed_type(syntax_kind_ext::JSDOC_THIS_TYPE, true)
            }
            SyntaxKind::OpenBraceToken => self.parse_record_type(),
            SyntaxKind::FunctionKeyword => self.parse_function_type(),
            SyntaxKind::AnyKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::ObjectKeyword => {
                let kind = self.token as u16;
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(kind, start, end)
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => self.parse_literal_type(),
            _ => self.parse_type_reference(),
        }
    }

    /// `?` alone is the unknown type; `?T` is nullable.
    fn parse_unknown_or_nullable_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let end = self.token_end();
        self.next_token();
        if matches!(
            self.token,
            SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::BarToken
        ) {
            return self
                .arena
                .add_token(syntax_kind_ext::JSDOC_UNKNOWN_TYPE, start, end);
        }
        let type_node = self.parse_jsdoc_type();
        let end = self.node_end();
        self.arena.add_wrapped_type(
            syntax_kind_ext::JSDOC_NULLABLE_TYPE,
            start,
            end,
            WrappedTypeData { type_node },
        )
    }

    /// `!T`, `...T`, `new:T`, `this:T`
    fn parse_prefixed_type(&mut self, kind: u16, expect_colon: bool) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        if expect_colon {
            self.parse_expected(SyntaxKind::ColonToken);
        }
        let type_node = self.parse_jsdoc_type();
        let end = self.node_end();
        self.arena
            .add_wrapped_type(kind, start, end, WrappedTypeData { type_node })
    }

    fn parse_literal_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let end = self.token_end();
        let kind = self.token as u16;
        let literal = match self.token {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                let text = self.scanner.get_token_value();
                let value = if self.token == SyntaxKind::NumericLiteral {
                    text.parse::<f64>().ok()
                } else {
                    None
                };
                self.arena
                    .add_literal(kind, start, end, LiteralData { text, value })
            }
            _ => self.arena.add_token(kind, start, end),
        };
        self.next_token();
        self.arena.add_literal_type(
            syntax_kind_ext::JSDOC_LITERAL_TYPE,
            start,
            end,
            LiteralTypeData { literal },
        )
    }

    /// `{a: number, b}`
    fn parse_record_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();

        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let member_start = self.token_pos();
            let name = self.parse_type_identifier();
            let question_token = self.parse_optional(SyntaxKind::QuestionToken);
            let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_jsdoc_type()
            } else {
                NodeIndex::NONE
            };
            let end = self.node_end();
            members.push(self.arena.add_property_signature(
                member_start,
                end,
                PropertySignatureData {
                    modifiers: None,
                    name,
                    question_token,
                    type_annotation,
                    jsdoc: NodeIndex::NONE,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)
                && !self.parse_optional(SyntaxKind::SemicolonToken)
            {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        let members = self.arena.make_node_list(members);
        let end = self.node_end();
        let literal = self.arena.add_type_literal(
            syntax_kind_ext::TYPE_LITERAL,
            start,
            end,
            TypeLiteralData { members },
        );
        self.arena.add_wrapped_type(
            syntax_kind_ext::JSDOC_RECORD_TYPE,
            start,
            end,
            WrappedTypeData { type_node: literal },
        )
    }

    /// `function(string, number=): boolean`
    fn parse_function_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let parameters =
            self.parse_delimited_list(SyntaxKind::CloseParenToken, JsDocParser::parse_parameter);
        self.parse_expected(SyntaxKind::CloseParenToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_jsdoc_type()
        } else {
            NodeIndex::NONE
        };
        let end = self.node_end();
        self.arena.add_function_type(
            syntax_kind_ext::JSDOC_FUNCTION_TYPE,
            start,
            end,
            FunctionTypeData {
                type_parameters: None,
                parameters,
                type_annotation,
            },
        )
    }

    /// Unnamed function-type parameter; a trailing `=` marks it optional.
    fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let type_annotation = self.parse_jsdoc_type();
        let question_token = self.parse_optional(SyntaxKind::EqualsToken);
        let end = self.node_end();
        self.arena.add_parameter(
            start,
            end,
            ParameterData {
                modifiers: None,
                dot_dot_dot_token: false,
                name: NodeIndex::NONE,
                question_token,
                type_annotation,
                has_initializer: false,
            },
        )
    }

    /// `Name`, `ns.Name`, `Array<T>`, `Array.<T>`
    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut type_name = self.parse_type_identifier();
        let mut type_arguments = None;

        if self.is_token(SyntaxKind::LessThanToken) {
            type_arguments = Some(self.parse_type_arguments());
        } else {
            while self.parse_optional(SyntaxKind::DotToken) {
                if self.is_token(SyntaxKind::LessThanToken) {
                    type_arguments = Some(self.parse_type_arguments());
                    break;
                }
                let right = self.parse_type_identifier();
                let end = self.node_end();
                type_name = self.arena.add_qualified_name(
                    start,
                    end,
                    QualifiedNameData {
                        left: type_name,
                        right,
                    },
                );
            }
        }

        let end = self.node_end();
        self.arena.add_type_ref(
            syntax_kind_ext::JSDOC_TYPE_REFERENCE,
            start,
            end,
            TypeRefData {
                type_name,
                type_arguments,
            },
        )
    }

    fn parse_type_arguments(&mut self) -> NodeList {
        let open_pos = self.token_pos();
        self.next_token();
        let arguments =
            self.parse_delimited_list(SyntaxKind::GreaterThanToken, JsDocParser::parse_jsdoc_type);

        if !self.has_new_diagnostics() && arguments.is_empty() {
            let close_end = if self.is_token(SyntaxKind::GreaterThanToken) {
                self.token_end()
            } else {
                self.token_pos()
            };
            self.error_at(
                open_pos,
                close_end.saturating_sub(open_pos),
                &diagnostic_messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY,
                &[],
            );
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        arguments
    }

    /// Identifier or keyword inside a type expression.
    fn parse_type_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if token_is_identifier_or_keyword(self.token) {
            let end = self.token_end();
            let text = self.scanner.get_token_value();
            self.next_token();
            return self.arena.add_identifier(pos, end, text);
        }
        self.error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        let node = self.arena.add_identifier(pos, pos, String::new());
        self.arena.set_flags(node, node_flags::MISSING);
        node
    }

    /// Comma-separated elements up to `terminator`. A trailing comma is
    /// reported unless an earlier error was already recorded.
    fn parse_delimited_list(
        &mut self,
        terminator: SyntaxKind,
        parse_element: fn(&mut JsDocParser<'a>) -> NodeIndex,
    ) -> NodeList {
        let mut nodes = Vec::new();
        let mut trailing_comma_pos = None;
        while !self.is_token(terminator) && !self.is_token(SyntaxKind::EndOfFileToken) {
            nodes.push(parse_element(self));
            let comma_pos = self.token_pos();
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.is_token(terminator) {
                trailing_comma_pos = Some(comma_pos);
            }
        }

        let mut list = self.arena.make_node_list(nodes);
        if let Some(pos) = trailing_comma_pos {
            list.has_trailing_comma = true;
            if !self.has_new_diagnostics() {
                self.error_at(pos, 1, &diagnostic_messages::TRAILING_COMMA_NOT_ALLOWED, &[]);
            }
        }
        list
    }
}

/// `/**` not followed by a third `*`.
fn is_jsdoc_start(source: &str, start: usize) -> bool {
    let bytes = source.as_bytes();
    bytes.get(start) == Some(&b'/')
        && bytes.get(start + 1) == Some(&b'*')
        && bytes.get(start + 2) == Some(&b'*')
        && bytes.get(start + 3) != Some(&b'*')
}
