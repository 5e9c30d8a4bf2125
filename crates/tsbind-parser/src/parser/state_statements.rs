//! Parser state - source files, declarations and type members.

use super::parse_rules::{is_type_member_name_start, look_ahead_is_declaration_start};
use super::state::{CONTEXT_FLAG_TYPE_MEMBERS, ParserState};
use crate::parser::node::{
    HeritageData, IndexSignatureData, InterfaceData, LiteralData, ParameterData,
    PropertySignatureData, SignatureData, SourceFileData, TypeAliasData, TypeParameterData,
    node_flags,
};
use crate::parser::{NodeIndex, NodeList, syntax_kind_ext};
use std::sync::Arc;
use tracing::{debug, trace};
use tsbind_common::diagnostics::diagnostic_messages;
use tsbind_common::limits::MAX_SKIP_TOKENS;
use tsbind_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse the whole input into a `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let mut statements = Vec::new();

        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }

        let eof_pos = self.token_pos();
        let end_of_file_token =
            self.arena
                .add_token(SyntaxKind::EndOfFileToken as u16, eof_pos, eof_pos);
        let statements = self.make_node_list(statements);
        let source_file = self.arena.add_source_file(
            0,
            self.source.len() as u32,
            SourceFileData {
                file_name: self.file_name.clone(),
                statements,
                end_of_file_token,
            },
        );
        self.arena.fixup_parent_references(source_file);
        self.collect_scanner_diagnostics();
        debug!(
            file = %self.file_name,
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        source_file
    }

    /// Parse an interface declaration at the current position.
    pub fn parse_interface_declaration(&mut self) -> NodeIndex {
        let node = self.parse_declaration_of_kind(SyntaxKind::InterfaceKeyword);
        self.arena.fixup_parent_references(node);
        self.collect_scanner_diagnostics();
        node
    }

    /// Parse a type alias declaration at the current position.
    pub fn parse_type_alias_declaration(&mut self) -> NodeIndex {
        let node = self.parse_declaration_of_kind(SyntaxKind::TypeKeyword);
        self.arena.fixup_parent_references(node);
        self.collect_scanner_diagnostics();
        node
    }

    /// Re-target the scanner at `[start, end)` of the source text and parse the
    /// single declaration found there. The range may begin with the
    /// declaration's JSDoc comment.
    pub fn parse_declaration_in_range(&mut self, start: usize, end: usize) -> NodeIndex {
        self.collect_scanner_diagnostics();
        let end = end.min(self.source.len());
        let start = start.min(end);
        self.scanner
            .set_text(Arc::clone(&self.source), start, Some(end - start));
        self.next_token();

        let node = if look_ahead_is_declaration_start(&mut self.scanner, self.current_token) {
            let jsdoc = self.parse_jsdoc_for_current_token();
            self.parse_declaration(jsdoc)
        } else {
            self.parse_error_at_current_token(
                &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                &[],
            );
            NodeIndex::NONE
        };

        self.arena.fixup_parent_references(node);
        self.collect_scanner_diagnostics();
        node
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<NodeIndex> {
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                None
            }
            _ if self.is_declaration_start() => {
                let jsdoc = self.parse_jsdoc_for_current_token();
                let node = self.parse_declaration(jsdoc);
                node.is_some().then_some(node)
            }
            _ if self.is_identifier_or_keyword() => {
                self.skip_statement();
                None
            }
            SyntaxKind::OpenBraceToken => {
                self.skip_balanced(false);
                None
            }
            _ => {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                self.next_token();
                None
            }
        }
    }

    pub(crate) fn is_declaration_start(&mut self) -> bool {
        look_ahead_is_declaration_start(&mut self.scanner, self.current_token)
    }

    /// Skip a statement this parser does not model (`declare var`,
    /// `declare function`, namespaces, imports, exports).
    ///
    /// Stops after a top-level `;`, after the `}` that closes the outermost
    /// block, or before an interface/type declaration that starts a new line.
    fn skip_statement(&mut self) {
        let start = self.token_pos();
        let mut depth: u32 = 0;
        let mut steps: u32 = 0;

        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    break;
                }
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => {
                    if depth == 0 {
                        self.next_token();
                        break;
                    }
                    depth -= 1;
                    if depth == 0 && self.is_token(SyntaxKind::CloseBraceToken) {
                        self.next_token();
                        break;
                    }
                }
                _ => {}
            }

            self.next_token();
            steps += 1;
            if depth == 0 && self.has_preceding_line_break() && self.is_declaration_start() {
                break;
            }
            if steps >= MAX_SKIP_TOKENS {
                break;
            }
        }

        trace!(start, end = self.node_end(), "skipped statement");
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_declaration_of_kind(&mut self, keyword: SyntaxKind) -> NodeIndex {
        let jsdoc = self.parse_jsdoc_for_current_token();
        let start = self.token_pos();
        let (modifiers, flags) = self.parse_declaration_modifiers();
        if !self.is_token(keyword) {
            self.parse_expected(keyword);
            return NodeIndex::NONE;
        }
        let node = if keyword == SyntaxKind::InterfaceKeyword {
            self.parse_interface_rest(start, modifiers, jsdoc)
        } else {
            self.parse_type_alias_rest(start, modifiers, jsdoc)
        };
        self.finish_declaration(node, flags, jsdoc)
    }

    /// Parse an interface or type alias, including leading modifiers.
    pub(crate) fn parse_declaration(&mut self, jsdoc: NodeIndex) -> NodeIndex {
        let start = self.token_pos();
        let (modifiers, flags) = self.parse_declaration_modifiers();
        let node = match self.token() {
            SyntaxKind::InterfaceKeyword => self.parse_interface_rest(start, modifiers, jsdoc),
            SyntaxKind::TypeKeyword => self.parse_type_alias_rest(start, modifiers, jsdoc),
            _ => {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                return NodeIndex::NONE;
            }
        };
        self.finish_declaration(node, flags, jsdoc)
    }

    fn finish_declaration(&mut self, node: NodeIndex, mut flags: u16, jsdoc: NodeIndex) -> NodeIndex {
        if jsdoc.is_some() {
            flags |= node_flags::HAS_JSDOC;
        }
        self.arena.set_flags(node, flags);
        node
    }

    /// `export`, `declare` and `default` modifiers.
    fn parse_declaration_modifiers(&mut self) -> (Option<NodeList>, u16) {
        let mut modifiers = Vec::new();
        let mut flags = node_flags::NONE;
        loop {
            let flag = match self.token() {
                SyntaxKind::ExportKeyword => node_flags::EXPORTED,
                SyntaxKind::DeclareKeyword => node_flags::AMBIENT,
                SyntaxKind::DefaultKeyword => node_flags::NONE,
                _ => break,
            };
            let kind = self.token() as u16;
            let (pos, end) = (self.token_pos(), self.token_end());
            modifiers.push(self.arena.add_token(kind, pos, end));
            flags |= flag;
            self.next_token();
        }
        let modifiers = if modifiers.is_empty() {
            None
        } else {
            Some(self.make_node_list(modifiers))
        };
        (modifiers, flags)
    }

    fn parse_interface_rest(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        jsdoc: NodeIndex,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier_name();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_type_members_block();

        self.arena.add_interface(
            start,
            self.node_end(),
            InterfaceData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
                jsdoc,
            },
        )
    }

    fn parse_type_alias_rest(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        jsdoc: NodeIndex,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier_name();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();

        self.arena.add_type_alias(
            start,
            self.node_end(),
            TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
                jsdoc,
            },
        )
    }

    /// Consume a `;`, or accept its automatic insertion before a line break,
    /// `}` or end of file.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
        {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    /// `<T, U extends X = Y>`
    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        self.next_token();

        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start = self.token_pos();
            let name = self.parse_identifier_name();
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            params.push(self.arena.add_type_parameter(
                start,
                self.node_end(),
                TypeParameterData {
                    name,
                    constraint,
                    default,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(self.make_node_list(params))
    }

    /// `extends A<T>, B` and `implements C`.
    fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        let mut clauses = Vec::new();
        while self.is_token(SyntaxKind::ExtendsKeyword)
            || self.is_token(SyntaxKind::ImplementsKeyword)
        {
            let start = self.token_pos();
            let token = self.token() as u16;
            self.next_token();

            let mut types = Vec::new();
            loop {
                let type_start = self.token_pos();
                let expression = self.parse_entity_name();
                let type_arguments = self.parse_type_arguments_if_present();
                types.push(self.arena.add_expr_with_type_args(
                    type_start,
                    self.node_end(),
                    crate::parser::node::ExprWithTypeArgsData {
                        expression,
                        type_arguments,
                    },
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }

            let types = self.make_node_list(types);
            clauses.push(self.arena.add_heritage_clause(
                start,
                self.node_end(),
                HeritageData { token, types },
            ));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(self.make_node_list(clauses))
        }
    }

    // =========================================================================
    // Type members
    // =========================================================================

    /// `{ member; member; ... }` of an interface or type literal.
    pub(crate) fn parse_type_members_block(&mut self) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::new();
        }
        let saved_flags = self.context_flags;
        self.context_flags |= CONTEXT_FLAG_TYPE_MEMBERS;

        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            // Unclosed block: a declaration on a new line ends it.
            if self.has_preceding_line_break() && self.is_declaration_start() {
                break;
            }
            let before = self.token_pos();
            if let Some(member) = self.parse_type_member() {
                members.push(member);
                self.parse_type_member_separator();
            }
            if self.token_pos() == before
                && !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                self.next_token();
            }
        }

        self.context_flags = saved_flags;
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.make_node_list(members)
    }

    fn parse_type_member_separator(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken)
            || self.parse_optional(SyntaxKind::CommaToken)
        {
            return;
        }
        if self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
        {
            return;
        }
        self.parse_error_at_current_token(&diagnostic_messages::EXPECTED, &[";"]);
        self.skip_to_member_boundary();
    }

    /// Skip to the next `;`, `,`, line break or `}` at the current nesting
    /// level, consuming a trailing `;`/`,`.
    fn skip_to_member_boundary(&mut self) {
        let mut steps: u32 = 0;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => return,
                SyntaxKind::SemicolonToken | SyntaxKind::CommaToken => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => self.skip_balanced(false),
                _ => {
                    self.next_token();
                }
            }
            steps += 1;
            if self.has_preceding_line_break() || steps >= MAX_SKIP_TOKENS {
                return;
            }
        }
    }

    fn parse_type_member(&mut self) -> Option<NodeIndex> {
        let jsdoc = self.parse_jsdoc_for_current_token();
        let start = self.token_pos();

        let member = self.parse_type_member_worker(start, jsdoc)?;
        if jsdoc.is_some() {
            self.arena.set_flags(member, node_flags::HAS_JSDOC);
        }
        Some(member)
    }

    fn parse_type_member_worker(&mut self, start: u32, jsdoc: NodeIndex) -> Option<NodeIndex> {
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return Some(self.parse_signature_member(
                syntax_kind_ext::CALL_SIGNATURE,
                start,
                None,
                NodeIndex::NONE,
                false,
                jsdoc,
            ));
        }

        if self.is_token(SyntaxKind::NewKeyword)
            && self.look_ahead_next_is(|t| {
                t == SyntaxKind::OpenParenToken || t == SyntaxKind::LessThanToken
            })
        {
            self.next_token();
            return Some(self.parse_signature_member(
                syntax_kind_ext::CONSTRUCT_SIGNATURE,
                start,
                None,
                NodeIndex::NONE,
                false,
                jsdoc,
            ));
        }

        let modifiers = self.parse_member_modifiers();

        if self.is_token(SyntaxKind::OpenBracketToken) {
            if self.is_index_signature_start() {
                return Some(self.parse_index_signature(start, modifiers, jsdoc));
            }
            self.skip_unsupported_member(start, "computed property name");
            return None;
        }

        if self.is_token(SyntaxKind::GetKeyword) || self.is_token(SyntaxKind::SetKeyword) {
            let is_accessor = self.look_ahead_next_is(is_type_member_name_start);
            if is_accessor && self.is_token(SyntaxKind::GetKeyword) {
                self.next_token();
                return Some(self.parse_get_accessor_member(start, modifiers, jsdoc));
            }
            if is_accessor {
                self.skip_unsupported_member(start, "set accessor");
                return None;
            }
        }

        if !is_type_member_name_start(self.token()) {
            self.parse_error_at_current_token(
                &diagnostic_messages::PROPERTY_OR_SIGNATURE_EXPECTED,
                &[],
            );
            self.skip_to_member_boundary();
            return None;
        }

        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);

        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return Some(self.parse_signature_member(
                syntax_kind_ext::METHOD_SIGNATURE,
                start,
                modifiers,
                name,
                question_token,
                jsdoc,
            ));
        }

        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };

        Some(self.arena.add_property_signature(
            start,
            self.node_end(),
            PropertySignatureData {
                modifiers,
                name,
                question_token,
                type_annotation,
                jsdoc,
            },
        ))
    }

    /// `readonly` when it modifies a following member name or index signature.
    fn parse_member_modifiers(&mut self) -> Option<NodeList> {
        let mut modifiers = Vec::new();
        while self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.look_ahead_next_is(|t| {
                is_type_member_name_start(t) || t == SyntaxKind::OpenBracketToken
            })
        {
            let (pos, end) = (self.token_pos(), self.token_end());
            modifiers.push(
                self.arena
                    .add_token(SyntaxKind::ReadonlyKeyword as u16, pos, end),
            );
            self.next_token();
        }
        if modifiers.is_empty() {
            None
        } else {
            Some(self.make_node_list(modifiers))
        }
    }

    /// Identifier, keyword, string or numeric literal used as a member name.
    fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                let kind = self.token() as u16;
                let (pos, end) = (self.token_pos(), self.token_end());
                let text = self.scanner.get_token_value();
                let value = if kind == SyntaxKind::NumericLiteral as u16 {
                    text.parse::<f64>().ok()
                } else {
                    None
                };
                self.next_token();
                self.arena
                    .add_literal(kind, pos, end, LiteralData { text, value })
            }
            _ => self.parse_identifier_name(),
        }
    }

    fn parse_signature_member(
        &mut self,
        kind: u16,
        start: u32,
        modifiers: Option<NodeList>,
        name: NodeIndex,
        question_token: bool,
        jsdoc: NodeIndex,
    ) -> NodeIndex {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        };

        self.arena.add_signature(
            kind,
            start,
            self.node_end(),
            SignatureData {
                modifiers,
                name,
                question_token,
                type_parameters,
                parameters,
                type_annotation,
                jsdoc,
            },
        )
    }

    /// `get name(): T` is modelled as a property of type `T`.
    fn parse_get_accessor_member(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        jsdoc: NodeIndex,
    ) -> NodeIndex {
        let name = self.parse_property_name();
        self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_property_signature(
            start,
            self.node_end(),
            PropertySignatureData {
                modifiers,
                name,
                question_token: false,
                type_annotation,
                jsdoc,
            },
        )
    }

    fn skip_unsupported_member(&mut self, start: u32, construct: &str) {
        self.skip_to_member_boundary();
        let end = self.node_end();
        self.report_unsupported(start, end, construct);
    }

    /// `[key: K]`, `[key?: K]`, `[...rest]` after the opening bracket.
    fn is_index_signature_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::DotDotDotToken) {
                return true;
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            if p.parse_optional(SyntaxKind::QuestionToken) {
                return matches!(
                    p.token(),
                    SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::CloseBracketToken
                );
            }
            matches!(p.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken)
        })
    }

    fn parse_index_signature(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        jsdoc: NodeIndex,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            params.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let parameters = self.make_node_list(params);

        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };

        self.arena.add_index_signature(
            start,
            self.node_end(),
            IndexSignatureData {
                modifiers,
                parameters,
                type_annotation,
                jsdoc,
            },
        )
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// `(a: T, b?: U, ...rest: V[])`
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::new();
        }

        let mut params = Vec::new();
        let mut has_trailing_comma = false;
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            params.push(self.parse_parameter());
            has_trailing_comma = false;
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            has_trailing_comma = true;
        }
        self.parse_expected(SyntaxKind::CloseParenToken);

        let count = params.len();
        for (i, &param) in params.iter().enumerate() {
            let is_rest = self
                .arena
                .get_parameter(param)
                .is_some_and(|p| p.dot_dot_dot_token);
            if is_rest && (i + 1 < count || has_trailing_comma) {
                let (pos, end) = self
                    .arena
                    .get(param)
                    .map_or((0, 0), |n| (n.pos, n.end));
                self.parse_error_at(
                    pos,
                    end - pos,
                    &diagnostic_messages::A_REST_PARAMETER_MUST_BE_LAST_IN_A_PARAMETER_LIST,
                    &[],
                );
            }
        }

        let mut list = self.make_node_list(params);
        list.has_trailing_comma = has_trailing_comma;
        list
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();

        let mut modifiers = Vec::new();
        while matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::ReadonlyKeyword
        ) && self.look_ahead_next_is(|t| {
            tsbind_scanner::token_is_identifier_or_keyword(t)
                || t == SyntaxKind::OpenBraceToken
                || t == SyntaxKind::OpenBracketToken
                || t == SyntaxKind::DotDotDotToken
        }) {
            let kind = self.token() as u16;
            let (pos, end) = (self.token_pos(), self.token_end());
            modifiers.push(self.arena.add_token(kind, pos, end));
            self.next_token();
        }
        let modifiers = if modifiers.is_empty() {
            None
        } else {
            Some(self.make_node_list(modifiers))
        };

        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);

        let name = if self.is_token(SyntaxKind::OpenBraceToken)
            || self.is_token(SyntaxKind::OpenBracketToken)
        {
            // Binding pattern: keep its source text as the parameter name.
            let pattern_start = self.token_pos();
            self.skip_balanced(false);
            let pattern_end = self.node_end();
            let text = self
                .source
                .get(pattern_start as usize..pattern_end as usize)
                .unwrap_or("")
                .to_string();
            self.arena.add_identifier(pattern_start, pattern_end, text)
        } else {
            self.parse_identifier_name()
        };

        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };

        let has_initializer = self.is_token(SyntaxKind::EqualsToken);
        if has_initializer {
            self.next_token();
            self.skip_initializer();
        }

        self.arena.add_parameter(
            start,
            self.node_end(),
            ParameterData {
                modifiers,
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
                has_initializer,
            },
        )
    }

    /// Skip a parameter initializer up to the next `,` or `)` at depth zero.
    fn skip_initializer(&mut self) {
        let mut steps: u32 = 0;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken
                | SyntaxKind::CommaToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => self.skip_balanced(false),
                _ => {
                    self.next_token();
                }
            }
            steps += 1;
            if steps >= MAX_SKIP_TOKENS {
                return;
            }
        }
    }
}
