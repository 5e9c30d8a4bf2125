//! Parser state - type expressions.

use super::state::{CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES, ParserState};
use crate::parser::node::{
    ArrayTypeData, CompositeTypeData, FunctionTypeData, IndexedAccessTypeData, LiteralData,
    LiteralTypeData, NamedTupleMemberData, TupleTypeData, TypeLiteralData, TypeOperatorData,
    TypeQueryData, TypeRefData, UnsupportedTypeData, WrappedTypeData, node_flags,
};
use crate::parser::{NodeIndex, NodeList, syntax_kind_ext};
use tracing::trace;
use tsbind_common::diagnostics::diagnostic_messages;
use tsbind_common::limits::MAX_TYPE_NESTING_DEPTH;
use tsbind_scanner::{SyntaxKind, token_is_identifier_or_keyword};

impl ParserState {
    // =========================================================================
    // Parse Methods - Types
    // =========================================================================

    /// Parse a type (function types, unions, intersections, operators, postfix
    /// array/indexed access and primary types). Conditional types are skipped.
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        self.nested_type(Self::parse_type_worker)
    }

    /// Run `f` one nesting level deeper, bailing out past the depth limit.
    fn nested_type(&mut self, f: impl FnOnce(&mut ParserState) -> NodeIndex) -> NodeIndex {
        if self.type_depth >= MAX_TYPE_NESTING_DEPTH {
            let limit = MAX_TYPE_NESTING_DEPTH.to_string();
            self.parse_error_at_current_token(
                &diagnostic_messages::TYPE_NESTING_TOO_DEEP,
                &[limit.as_str()],
            );
            let node = self.create_missing_identifier();
            self.skip_balanced(true);
            return node;
        }
        self.type_depth += 1;
        let result = f(self);
        self.type_depth -= 1;
        result
    }

    fn parse_type_worker(&mut self) -> NodeIndex {
        if self.is_start_of_function_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }

        let start = self.token_pos();
        let arena_len = self.arena.len();
        let check_type = self.parse_union_type();

        if self.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES == 0
            && self.is_token(SyntaxKind::ExtendsKeyword)
            && !self.has_preceding_line_break()
        {
            return self.skip_conditional_type_rest(start, arena_len);
        }

        check_type
    }

    /// `T extends U ? X : Y` after the check type has been parsed.
    fn skip_conditional_type_rest(&mut self, start: u32, arena_len: usize) -> NodeIndex {
        self.next_token();

        let saved_flags = self.context_flags;
        self.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        self.parse_type();
        self.context_flags = saved_flags;

        self.parse_expected(SyntaxKind::QuestionToken);
        self.parse_type();
        self.parse_expected(SyntaxKind::ColonToken);
        self.parse_type();

        // The branches are never modelled; drop their nodes.
        self.arena.truncate(arena_len);
        self.unsupported_type(start, "conditional type")
    }

    fn unsupported_type(&mut self, start: u32, construct: &str) -> NodeIndex {
        let end = self.node_end();
        self.report_unsupported(start, end, construct);
        trace!(start, end, construct, "skipped type construct");
        self.arena.add_unsupported_type(
            start,
            end,
            UnsupportedTypeData {
                construct: construct.to_string(),
            },
        )
    }

    /// Return type of a signature or function type. Type predicates are
    /// reduced to their runtime result: `x is T` to `boolean`, `asserts x` to
    /// `void`.
    pub(crate) fn parse_return_type(&mut self) -> NodeIndex {
        let saved_flags = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        let result = self.parse_return_type_inner();
        self.context_flags = saved_flags;
        result
    }

    fn parse_return_type_inner(&mut self) -> NodeIndex {
        let start = self.token_pos();

        if self.is_token(SyntaxKind::AssertsKeyword)
            && self.look_ahead_next_is(|t| {
                token_is_identifier_or_keyword(t) || t == SyntaxKind::ThisKeyword
            })
        {
            self.next_token();
            self.next_token();
            if self.parse_optional(SyntaxKind::IsKeyword) {
                let arena_len = self.arena.len();
                self.parse_type();
                self.arena.truncate(arena_len);
            }
            return self
                .arena
                .add_token(SyntaxKind::VoidKeyword as u16, start, self.node_end());
        }

        if (self.is_identifier_or_keyword() || self.is_token(SyntaxKind::ThisKeyword))
            && self.look_ahead_next_is(|t| t == SyntaxKind::IsKeyword)
        {
            self.next_token();
            self.next_token();
            let arena_len = self.arena.len();
            self.parse_type();
            self.arena.truncate(arena_len);
            return self
                .arena
                .add_token(SyntaxKind::BooleanKeyword as u16, start, self.node_end());
        }

        self.parse_type()
    }

    // =========================================================================
    // Function and constructor types
    // =========================================================================

    fn is_start_of_function_or_constructor_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => {
                self.look_ahead_next_is(|t| t == SyntaxKind::NewKeyword)
            }
            SyntaxKind::OpenParenToken => self.look_ahead(Self::is_unambiguously_start_of_function_type),
            _ => false,
        }
    }

    /// After `(`: `)` or `...`, or a parameter name followed by `:`, `,`, `?`,
    /// `=`, or `) =>`.
    fn is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next_token();
        if self.is_token(SyntaxKind::CloseParenToken) || self.is_token(SyntaxKind::DotDotDotToken)
        {
            return true;
        }
        if !self.skip_parameter_start() {
            return false;
        }
        match self.token() {
            SyntaxKind::ColonToken
            | SyntaxKind::CommaToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::EqualsToken => true,
            SyntaxKind::CloseParenToken => {
                self.next_token();
                self.is_token(SyntaxKind::EqualsGreaterThanToken)
            }
            _ => false,
        }
    }

    fn skip_parameter_start(&mut self) -> bool {
        while matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::ReadonlyKeyword
        ) {
            self.next_token();
        }
        if self.is_identifier_or_keyword() {
            self.next_token();
            return true;
        }
        if self.is_token(SyntaxKind::OpenBracketToken) || self.is_token(SyntaxKind::OpenBraceToken)
        {
            let arena_len = self.arena.len();
            let diagnostics_len = self.parse_diagnostics.len();
            self.skip_balanced(false);
            self.arena.truncate(arena_len);
            self.parse_diagnostics.truncate(diagnostics_len);
            return true;
        }
        false
    }

    fn parse_function_or_constructor_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_optional(SyntaxKind::AbstractKeyword);
        let kind = if self.parse_optional(SyntaxKind::NewKeyword) {
            syntax_kind_ext::CONSTRUCTOR_TYPE
        } else {
            syntax_kind_ext::FUNCTION_TYPE
        };

        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let type_annotation = self.parse_return_type();

        self.arena.add_function_type(
            kind,
            start,
            self.node_end(),
            FunctionTypeData {
                type_parameters,
                parameters,
                type_annotation,
            },
        )
    }

    // =========================================================================
    // Unions, intersections and operators
    // =========================================================================

    pub(crate) fn parse_union_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        // Optional leading `|` (e.g. `type T = | A | B`)
        let has_leading_bar = self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();

        if !has_leading_bar && !self.is_token(SyntaxKind::BarToken) {
            return first;
        }

        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }

        let all_string_literals = types
            .iter()
            .all(|&t| self.arena.string_literal_type_value(t).is_some());

        let end_pos = self.node_end();
        let union = self.arena.add_composite_type(
            syntax_kind_ext::UNION_TYPE,
            start_pos,
            end_pos,
            CompositeTypeData {
                types: self.make_node_list(types),
            },
        );
        if all_string_literals {
            self.arena
                .set_flags(union, node_flags::STRING_LITERAL_UNION);
        }
        union
    }

    pub(crate) fn parse_intersection_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        let has_leading_ampersand = self.parse_optional(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator_or_higher();

        if !has_leading_ampersand && !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }

        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            types.push(self.parse_type_operator_or_higher());
        }

        let end_pos = self.node_end();
        self.arena.add_composite_type(
            syntax_kind_ext::INTERSECTION_TYPE,
            start_pos,
            end_pos,
            CompositeTypeData {
                types: self.make_node_list(types),
            },
        )
    }

    fn parse_type_operator_or_higher(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let start = self.token_pos();
                let operator = self.token() as u16;
                self.next_token();
                let type_node = self.nested_type(Self::parse_type_operator_or_higher);
                self.arena.add_type_operator(
                    start,
                    self.node_end(),
                    TypeOperatorData {
                        operator,
                        type_node,
                    },
                )
            }
            SyntaxKind::InferKeyword => self.parse_infer_type(),
            _ => self.parse_postfix_type(),
        }
    }

    /// `infer U` or `infer U extends C`; only meaningful inside a conditional
    /// type, which is itself skipped.
    fn parse_infer_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let arena_len = self.arena.len();
        self.next_token();
        self.parse_identifier_name();

        self.try_parse(|p| {
            if !p.parse_optional(SyntaxKind::ExtendsKeyword) {
                return None;
            }
            let saved_flags = p.context_flags;
            p.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
            let constraint = p.parse_type();
            p.context_flags = saved_flags;
            // `infer U extends X ? ...` belongs to the enclosing conditional.
            if p.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES == 0
                && p.is_token(SyntaxKind::QuestionToken)
            {
                return None;
            }
            Some(constraint)
        });

        self.arena.truncate(arena_len);
        self.unsupported_type(start, "infer type")
    }

    /// Primary type followed by `[]` and `[K]` suffixes on the same line.
    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut ty = self.parse_non_array_type();

        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                ty = self.arena.add_array_type(
                    syntax_kind_ext::ARRAY_TYPE,
                    start,
                    self.node_end(),
                    ArrayTypeData { element_type: ty },
                );
            } else {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                ty = self.arena.add_indexed_access_type(
                    start,
                    self.node_end(),
                    IndexedAccessTypeData {
                        object_type: ty,
                        index_type,
                    },
                );
            }
        }

        ty
    }

    // =========================================================================
    // Primary types
    // =========================================================================

    fn parse_non_array_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::VoidKeyword
                if !self.look_ahead_next_is(|t| t == SyntaxKind::DotToken) =>
            {
                let kind = self.token() as u16;
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(kind, start, end)
            }
            SyntaxKind::ThisKeyword => {
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(syntax_kind_ext::THIS_TYPE, start, end)
            }
            SyntaxKind::NullKeyword | SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let kind = self.token() as u16;
                let end = self.token_end();
                self.next_token();
                let literal = self.arena.add_token(kind, start, end);
                self.arena.add_literal_type(
                    syntax_kind_ext::LITERAL_TYPE,
                    start,
                    end,
                    LiteralTypeData { literal },
                )
            }
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal_type(start, false)
            }
            SyntaxKind::MinusToken
                if self.look_ahead_next_is(|t| {
                    t == SyntaxKind::NumericLiteral || t == SyntaxKind::BigIntLiteral
                }) =>
            {
                self.next_token();
                self.parse_literal_type(start, true)
            }
            SyntaxKind::NoSubstitutionTemplateLiteral => {
                self.next_token();
                self.unsupported_type(start, "template literal type")
            }
            SyntaxKind::TypeOfKeyword => {
                if self.look_ahead_next_is(|t| t == SyntaxKind::ImportKeyword) {
                    self.next_token();
                    return self.skip_import_type(start);
                }
                self.parse_type_query()
            }
            SyntaxKind::ImportKeyword => self.skip_import_type(start),
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(Self::is_mapped_type_start) {
                    self.skip_balanced(false);
                    return self.unsupported_type(start, "mapped type");
                }
                let members = self.parse_type_members_block();
                self.arena.add_type_literal(
                    syntax_kind_ext::TYPE_LITERAL,
                    start,
                    self.node_end(),
                    TypeLiteralData { members },
                )
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved_flags = self.context_flags;
                self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
                let type_node = self.parse_type();
                self.context_flags = saved_flags;
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_wrapped_type(
                    syntax_kind_ext::PARENTHESIZED_TYPE,
                    start,
                    self.node_end(),
                    WrappedTypeData { type_node },
                )
            }
            _ if self.is_identifier_or_keyword() => self.parse_type_reference(),
            _ => {
                self.parse_error_at_current_token(&diagnostic_messages::TYPE_EXPECTED, &[]);
                self.create_missing_identifier()
            }
        }
    }

    fn parse_literal_type(&mut self, start: u32, negative: bool) -> NodeIndex {
        let kind = self.token() as u16;
        let value_text = self.scanner.get_token_value();
        let end = self.token_end();
        self.next_token();

        let text = if negative {
            format!("-{value_text}")
        } else {
            value_text
        };
        let value = if kind == SyntaxKind::NumericLiteral as u16 {
            parse_numeric_value(&text)
        } else {
            None
        };
        let literal = self
            .arena
            .add_literal(kind, start, end, LiteralData { text, value });
        self.arena.add_literal_type(
            syntax_kind_ext::LITERAL_TYPE,
            start,
            end,
            LiteralTypeData { literal },
        )
    }

    /// `typeof a.b<T>`
    fn parse_type_query(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        let expr_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments_if_present();
        self.arena.add_type_query(
            start,
            self.node_end(),
            TypeQueryData {
                expr_name,
                type_arguments,
            },
        )
    }

    /// `import("mod").A.B<T>`
    fn skip_import_type(&mut self, start: u32) -> NodeIndex {
        let arena_len = self.arena.len();
        self.parse_expected(SyntaxKind::ImportKeyword);
        if self.is_token(SyntaxKind::OpenParenToken) {
            self.skip_balanced(false);
        }
        while self.parse_optional(SyntaxKind::DotToken) {
            self.parse_identifier_name();
        }
        if self.is_token(SyntaxKind::LessThanToken) && !self.has_preceding_line_break() {
            self.skip_balanced(true);
        }
        self.arena.truncate(arena_len);
        self.unsupported_type(start, "import type")
    }

    /// `{ [K in X]: ... }`, optionally with `readonly`, `+readonly` or `-readonly`.
    fn is_mapped_type_start(&mut self) -> bool {
        self.next_token();
        if self.is_token(SyntaxKind::PlusToken) || self.is_token(SyntaxKind::MinusToken) {
            self.next_token();
            if !self.is_token(SyntaxKind::ReadonlyKeyword) {
                return false;
            }
        }
        if self.is_token(SyntaxKind::ReadonlyKeyword) {
            self.next_token();
        }
        if !self.is_token(SyntaxKind::OpenBracketToken) {
            return false;
        }
        self.next_token();
        if !self.is_identifier_or_keyword() {
            return false;
        }
        self.next_token();
        self.is_token(SyntaxKind::InKeyword)
    }

    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let type_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments_if_present();
        self.arena.add_type_ref(
            syntax_kind_ext::TYPE_REFERENCE,
            start,
            self.node_end(),
            TypeRefData {
                type_name,
                type_arguments,
            },
        )
    }

    /// Type arguments, when `<` follows on the same line.
    pub(crate) fn parse_type_arguments_if_present(&mut self) -> Option<NodeList> {
        if self.is_token(SyntaxKind::LessThanToken) && !self.has_preceding_line_break() {
            Some(self.parse_type_arguments())
        } else {
            None
        }
    }

    /// `<A, B>`
    pub(crate) fn parse_type_arguments(&mut self) -> NodeList {
        let open_pos = self.token_pos();
        let open_end = self.token_end();
        self.parse_expected(SyntaxKind::LessThanToken);

        let mut args = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            args.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        if args.is_empty() {
            self.parse_error_at(
                open_pos,
                open_end - open_pos,
                &diagnostic_messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY,
                &[],
            );
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        self.make_node_list(args)
    }

    // =========================================================================
    // Tuples
    // =========================================================================

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);

        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            elements.push(self.parse_tuple_element_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);

        let elements = self.make_node_list(elements);
        self.arena.add_tuple_type(
            syntax_kind_ext::TUPLE_TYPE,
            start,
            self.node_end(),
            TupleTypeData { elements },
        )
    }

    /// `T`, `T?`, `...T`, or a named member `name?: T` / `...name: T`.
    fn parse_tuple_element_type(&mut self) -> NodeIndex {
        let start = self.token_pos();

        if self.look_ahead(Self::is_named_tuple_member_start) {
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name();
            let question_token = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type();
            return self.arena.add_named_tuple_member(
                start,
                self.node_end(),
                NamedTupleMemberData {
                    dot_dot_dot_token,
                    name,
                    question_token,
                    type_node,
                },
            );
        }

        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return self.arena.add_wrapped_type(
                syntax_kind_ext::REST_TYPE,
                start,
                self.node_end(),
                WrappedTypeData { type_node },
            );
        }

        let type_node = self.parse_type();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return self.arena.add_wrapped_type(
                syntax_kind_ext::OPTIONAL_TYPE,
                start,
                self.node_end(),
                WrappedTypeData { type_node },
            );
        }
        type_node
    }

    fn is_named_tuple_member_start(&mut self) -> bool {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            self.next_token();
        }
        if !self.is_identifier_or_keyword() {
            return false;
        }
        self.next_token();
        if self.is_token(SyntaxKind::QuestionToken) {
            self.next_token();
        }
        self.is_token(SyntaxKind::ColonToken)
    }
}

/// Numeric value of a literal's text (`1_000` already has separators removed).
fn parse_numeric_value(text: &str) -> Option<f64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => u64::from_str_radix(&digits[2..], radix).ok()? as f64,
        None => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::parse_numeric_value;

    #[test]
    fn numeric_values() {
        assert_eq!(parse_numeric_value("42"), Some(42.0));
        assert_eq!(parse_numeric_value("-1.5"), Some(-1.5));
        assert_eq!(parse_numeric_value("0xFF"), Some(255.0));
        assert_eq!(parse_numeric_value("0b101"), Some(5.0));
        assert_eq!(parse_numeric_value(".25"), Some(0.25));
        assert_eq!(parse_numeric_value("abc"), None);
    }
}
