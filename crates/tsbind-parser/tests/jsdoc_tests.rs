//! Tests for the JSDoc comment parser.

use crate::parser::{
    JsDocParseResult, NodeIndex, parse_isolated_jsdoc_comment,
    parse_jsdoc_type_expression_for_tests, syntax_kind_ext,
};
use tsbind_scanner::SyntaxKind;

fn parse_comment(content: &str) -> JsDocParseResult {
    parse_isolated_jsdoc_comment(content, 0, content.len()).expect("jsdoc comment")
}

fn parse_type(content: &str) -> JsDocParseResult {
    parse_jsdoc_type_expression_for_tests(content, 0, content.len()).expect("type expression")
}

fn tags(result: &JsDocParseResult) -> Vec<NodeIndex> {
    result
        .arena
        .get_jsdoc(result.node)
        .expect("jsdoc node")
        .tags
        .nodes
        .clone()
}

fn comment(result: &JsDocParseResult) -> Option<&str> {
    result
        .arena
        .get_jsdoc(result.node)
        .expect("jsdoc node")
        .comment
        .as_deref()
}

/// The type inside a `{...}` type expression node.
fn inner_type(result: &JsDocParseResult, expression: NodeIndex) -> NodeIndex {
    assert!(
        result
            .arena
            .is_kind(expression, syntax_kind_ext::JSDOC_TYPE_EXPRESSION)
    );
    result
        .arena
        .get_wrapped_type(expression)
        .expect("type expression")
        .type_node
}

fn codes(result: &JsDocParseResult) -> Vec<u32> {
    result.diagnostics.iter().map(|d| d.code).collect()
}

// =============================================================================
// Comment text
// =============================================================================

#[test]
fn test_single_line_comment() {
    let result = parse_comment("/** Docs */");
    assert_eq!(comment(&result), Some("Docs"));
    assert!(tags(&result).is_empty());
    let node = result.arena.get(result.node).unwrap();
    assert_eq!((node.pos, node.end), (0, 11));
}

#[test]
fn test_multi_line_comment_strips_asterisks() {
    let result = parse_comment("/**\n * Line one\n * line two\n */");
    assert_eq!(comment(&result), Some("Line one\nline two"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_empty_comment_has_no_text() {
    let result = parse_comment("/** */");
    assert_eq!(comment(&result), None);
}

#[test]
fn test_at_sign_inside_text_is_not_a_tag() {
    let result = parse_comment("/** Mail me@example.com */");
    assert_eq!(comment(&result), Some("Mail me@example.com"));
    assert!(tags(&result).is_empty());
}

#[test]
fn test_non_jsdoc_comments_are_rejected() {
    assert!(parse_isolated_jsdoc_comment("/* plain */", 0, 11).is_none());
    assert!(parse_isolated_jsdoc_comment("/*** banner */", 0, 14).is_none());
}

// =============================================================================
// Tags
// =============================================================================

#[test]
fn test_param_and_returns_tags() {
    let source = "/**
 * Adds numbers.
 * @param {number} a The first.
 * @param b - The second.
 * @returns {number} The sum.
 */";
    let result = parse_comment(source);
    let arena = &result.arena;
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(comment(&result), Some("Adds numbers."));

    let tags = tags(&result);
    let kinds: Vec<u16> = tags.iter().filter_map(|&t| arena.kind(t)).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::JSDOC_PARAMETER_TAG,
            syntax_kind_ext::JSDOC_PARAMETER_TAG,
            syntax_kind_ext::JSDOC_RETURN_TAG,
        ]
    );

    let a = arena.get_jsdoc_parameter_tag(tags[0]).unwrap();
    assert_eq!(arena.get_identifier_text(a.name), Some("a"));
    assert!(!a.is_name_first);
    assert!(arena.is_kind(
        inner_type(&result, a.type_expression),
        SyntaxKind::NumberKeyword as u16
    ));
    assert_eq!(a.comment, "The first.");

    let b = arena.get_jsdoc_parameter_tag(tags[1]).unwrap();
    assert_eq!(arena.get_identifier_text(b.name), Some("b"));
    assert!(b.is_name_first);
    assert!(b.type_expression.is_none());
    assert_eq!(b.comment, "- The second.");

    assert_eq!(arena.jsdoc_tag_name(tags[2]), Some("returns"));
    assert_eq!(arena.jsdoc_tag_comment(tags[2]), Some("The sum."));
    let returns = arena.get_jsdoc_typed_tag(tags[2]).unwrap();
    assert!(arena.is_kind(
        inner_type(&result, returns.type_expression),
        SyntaxKind::NumberKeyword as u16
    ));
}

#[test]
fn test_name_first_param_with_type_after_name() {
    let result = parse_comment("/** @param value {string} The value. */");
    let arena = &result.arena;
    let tag = arena.get_jsdoc_parameter_tag(tags(&result)[0]).unwrap();
    assert!(tag.is_name_first);
    assert!(arena.is_kind(
        inner_type(&result, tag.type_expression),
        SyntaxKind::StringKeyword as u16
    ));
    assert_eq!(tag.comment, "The value.");
}

#[test]
fn test_bracketed_param_with_default() {
    let result = parse_comment("/** @param {string} [name=\"x\"] The name */");
    let arena = &result.arena;
    let tag = arena.get_jsdoc_parameter_tag(tags(&result)[0]).unwrap();
    assert!(tag.is_bracketed);
    assert_eq!(arena.get_identifier_text(tag.name), Some("name"));
    assert_eq!(tag.comment, "The name");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_param_without_name_degrades_to_plain_tag() {
    let result = parse_comment("/** @param {string} */");
    let tags = tags(&result);
    assert_eq!(tags.len(), 1);
    assert!(result.arena.is_kind(tags[0], syntax_kind_ext::JSDOC_TAG));
    assert_eq!(result.arena.jsdoc_tag_name(tags[0]), Some("param"));
    assert_eq!(codes(&result), vec![1003]);
}

#[test]
fn test_duplicate_returns_tag_is_reported() {
    let result = parse_comment("/**\n * @returns {string}\n * @returns {number}\n */");
    assert_eq!(tags(&result).len(), 2);
    assert_eq!(codes(&result), vec![1223]);
    assert_eq!(
        result.diagnostics[0].message_text,
        "'returns' tag already specified."
    );
}

#[test]
fn test_template_tag() {
    let result = parse_comment("/** @template T, U */");
    let arena = &result.arena;
    let tag = tags(&result)[0];
    assert!(arena.is_kind(tag, syntax_kind_ext::JSDOC_TEMPLATE_TAG));
    let names: Vec<&str> = arena
        .get_jsdoc_template_tag(tag)
        .unwrap()
        .type_parameters
        .iter()
        .filter_map(|p| arena.get_name_text(p))
        .collect();
    assert_eq!(names, vec!["T", "U"]);
}

#[test]
fn test_unknown_tag_keeps_comment() {
    let result = parse_comment("/** @deprecated Use bar instead. */");
    let tag = tags(&result)[0];
    assert!(result.arena.is_kind(tag, syntax_kind_ext::JSDOC_TAG));
    assert_eq!(result.arena.jsdoc_tag_name(tag), Some("deprecated"));
    assert_eq!(result.arena.jsdoc_tag_comment(tag), Some("Use bar instead."));
}

#[test]
fn test_augments_tag() {
    let result = parse_comment("/** @augments {Base} */");
    let arena = &result.arena;
    let tag = tags(&result)[0];
    assert!(arena.is_kind(tag, syntax_kind_ext::JSDOC_AUGMENTS_TAG));
    let typed = arena.get_jsdoc_typed_tag(tag).unwrap();
    let base = inner_type(&result, typed.type_expression);
    assert_eq!(arena.type_reference_name(base).as_deref(), Some("Base"));
}

#[test]
fn test_typedef_with_property_children() {
    let source = "/**
 * @typedef {Object} Point
 * @property {number} x The x.
 * @property {number} y
 */";
    let result = parse_comment(source);
    let arena = &result.arena;
    let tags = tags(&result);
    assert_eq!(tags.len(), 1);

    let typedef = arena.get_jsdoc_typedef_tag(tags[0]).expect("typedef");
    assert_eq!(arena.get_identifier_text(typedef.name), Some("Point"));
    let literal = arena
        .get_jsdoc_type_literal(typedef.type_literal)
        .expect("type literal");
    let names: Vec<&str> = literal
        .property_tags
        .iter()
        .filter(|&p| arena.is_kind(p, syntax_kind_ext::JSDOC_PROPERTY_TAG))
        .filter_map(|p| arena.get_name_text(p))
        .collect();
    assert_eq!(names, vec!["x", "y"]);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_typedef_children_stop_at_unrelated_tag() {
    let source = "/**
 * @typedef {Object} Opts
 * @property {string} name
 * @returns {void}
 */";
    let result = parse_comment(source);
    let arena = &result.arena;
    let tags = tags(&result);
    assert_eq!(tags.len(), 2);
    assert!(arena.is_kind(tags[1], syntax_kind_ext::JSDOC_RETURN_TAG));

    let typedef = arena.get_jsdoc_typedef_tag(tags[0]).unwrap();
    let literal = arena.get_jsdoc_type_literal(typedef.type_literal).unwrap();
    assert_eq!(literal.property_tags.len(), 1);
}

#[test]
fn test_namespaced_typedef_name() {
    let result = parse_comment("/** @typedef {string} ns.Id */");
    let arena = &result.arena;
    let typedef = arena.get_jsdoc_typedef_tag(tags(&result)[0]).unwrap();
    assert_eq!(arena.entity_name_text(typedef.full_name).as_deref(), Some("ns.Id"));
    assert_eq!(arena.get_identifier_text(typedef.name), Some("Id"));
    assert!(typedef.type_literal.is_none());
}

// =============================================================================
// Type expressions
// =============================================================================

#[test]
fn test_generic_type_reference_with_dot() {
    let result = parse_type("{Array.<string>}");
    let arena = &result.arena;
    let ty = inner_type(&result, result.node);
    assert!(arena.is_kind(ty, syntax_kind_ext::JSDOC_TYPE_REFERENCE));
    assert_eq!(arena.type_reference_name(ty).as_deref(), Some("Array"));
    let args = arena.get_type_ref(ty).unwrap().type_arguments.clone().unwrap();
    assert_eq!(args.len(), 1);
    assert!(arena.is_kind(args.nodes[0], SyntaxKind::StringKeyword as u16));
}

#[test]
fn test_optional_nullable_type() {
    let result = parse_type("{?number=}");
    let arena = &result.arena;
    let optional = inner_type(&result, result.node);
    assert!(arena.is_kind(optional, syntax_kind_ext::JSDOC_OPTIONAL_TYPE));
    let nullable = arena.get_wrapped_type(optional).unwrap().type_node;
    assert!(arena.is_kind(nullable, syntax_kind_ext::JSDOC_NULLABLE_TYPE));
    let number = arena.get_wrapped_type(nullable).unwrap().type_node;
    assert!(arena.is_kind(number, SyntaxKind::NumberKeyword as u16));
}

#[test]
fn test_union_types() {
    let result = parse_type("{(string|number)}");
    let arena = &result.arena;
    let union = inner_type(&result, result.node);
    assert!(arena.is_kind(union, syntax_kind_ext::JSDOC_UNION_TYPE));
    assert_eq!(arena.get_composite_type(union).unwrap().types.len(), 2);

    let result = parse_type("{string|null}");
    let union = inner_type(&result, result.node);
    assert!(result.arena.is_kind(union, syntax_kind_ext::JSDOC_UNION_TYPE));
}

#[test]
fn test_function_type() {
    let result = parse_type("{function(string, number=): boolean}");
    let arena = &result.arena;
    let func = inner_type(&result, result.node);
    assert!(arena.is_kind(func, syntax_kind_ext::JSDOC_FUNCTION_TYPE));
    let data = arena.get_function_type(func).unwrap();
    assert_eq!(data.parameters.len(), 2);
    assert!(arena.get_parameter(data.parameters.nodes[1]).unwrap().question_token);
    assert!(arena.is_kind(data.type_annotation, SyntaxKind::BooleanKeyword as u16));
}

#[test]
fn test_special_types() {
    let all = parse_type("{*}");
    assert!(all.arena.is_kind(inner_type(&all, all.node), syntax_kind_ext::JSDOC_ALL_TYPE));

    let unknown = parse_type("{?}");
    assert!(unknown.arena.is_kind(
        inner_type(&unknown, unknown.node),
        syntax_kind_ext::JSDOC_UNKNOWN_TYPE
    ));

    let array = parse_type("{string[]}");
    assert!(array.arena.is_kind(
        inner_type(&array, array.node),
        syntax_kind_ext::JSDOC_ARRAY_TYPE
    ));

    let variadic = parse_type("{...number}");
    assert!(variadic.arena.is_kind(
        inner_type(&variadic, variadic.node),
        syntax_kind_ext::JSDOC_VARIADIC_TYPE
    ));
}

#[test]
fn test_record_type() {
    let result = parse_type("{{a: number, b}}");
    let arena = &result.arena;
    let record = inner_type(&result, result.node);
    assert!(arena.is_kind(record, syntax_kind_ext::JSDOC_RECORD_TYPE));
    let literal = arena.get_wrapped_type(record).unwrap().type_node;
    let members = &arena.get_type_literal(literal).unwrap().members;
    let names: Vec<&str> = members.iter().filter_map(|m| arena.get_name_text(m)).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_trailing_comma_in_type_arguments() {
    let result = parse_type("{Array<string,>}");
    assert_eq!(codes(&result), vec![1009]);
}

#[test]
fn test_empty_type_arguments() {
    let result = parse_type("{Foo<>}");
    assert_eq!(codes(&result), vec![1099]);
}

#[test]
fn test_type_expression_requires_brace() {
    assert!(parse_jsdoc_type_expression_for_tests("string", 0, 6).is_none());
}
