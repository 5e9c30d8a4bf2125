//! Tests for the declaration parser.

use crate::parser::{NodeIndex, ParserState, node_flags, syntax_kind_ext};
use tsbind_common::DiagnosticCategory;
use tsbind_scanner::SyntaxKind;

fn parse(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statements(parser: &ParserState, root: NodeIndex) -> Vec<NodeIndex> {
    parser
        .get_arena()
        .get_source_file(root)
        .expect("source file")
        .statements
        .nodes
        .clone()
}

fn only_statement(source: &str) -> (ParserState, NodeIndex) {
    let (parser, root) = parse(source);
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 1, "expected one statement in {source:?}");
    (parser, stmts[0])
}

/// The aliased type of a single `type X = ...` statement.
fn alias_type(source: &str) -> (ParserState, NodeIndex) {
    let (parser, stmt) = only_statement(source);
    let type_node = parser
        .get_arena()
        .get_type_alias(stmt)
        .expect("type alias")
        .type_node;
    (parser, type_node)
}

fn diagnostic_codes(parser: &ParserState) -> Vec<u32> {
    parser.get_diagnostics().iter().map(|d| d.code).collect()
}

fn interface_members(parser: &ParserState, node: NodeIndex) -> Vec<NodeIndex> {
    parser
        .get_arena()
        .get_interface(node)
        .expect("interface")
        .members
        .nodes
        .clone()
}

#[test]
fn test_parse_interface_members() {
    let source = "interface Foo {
  readonly a: string;
  b?: number;
  m(x: string): void;
  (n: number): string;
  new (s: string): Foo;
  [key: string]: any;
}
";
    let (parser, iface) = only_statement(source);
    let arena = parser.get_arena();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    assert_eq!(arena.get_name_text(iface), Some("Foo"));

    let members = interface_members(&parser, iface);
    let kinds: Vec<u16> = members.iter().filter_map(|&m| arena.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_SIGNATURE,
            syntax_kind_ext::PROPERTY_SIGNATURE,
            syntax_kind_ext::METHOD_SIGNATURE,
            syntax_kind_ext::CALL_SIGNATURE,
            syntax_kind_ext::CONSTRUCT_SIGNATURE,
            syntax_kind_ext::INDEX_SIGNATURE,
        ]
    );

    let a = arena.get_property_signature(members[0]).unwrap();
    assert!(a.modifiers.is_some());
    assert!(!a.question_token);
    assert!(arena.is_kind(a.type_annotation, SyntaxKind::StringKeyword as u16));

    let b = arena.get_property_signature(members[1]).unwrap();
    assert!(b.question_token);

    let m = arena.get_signature(members[2]).unwrap();
    assert_eq!(arena.get_name_text(members[2]), Some("m"));
    assert_eq!(m.parameters.len(), 1);
    assert!(arena.is_kind(m.type_annotation, SyntaxKind::VoidKeyword as u16));

    let index = arena.get_index_signature(members[5]).unwrap();
    assert_eq!(index.parameters.len(), 1);
    assert!(arena.is_kind(index.type_annotation, SyntaxKind::AnyKeyword as u16));
}

#[test]
fn test_keywords_as_member_names() {
    let (parser, iface) = only_statement("interface K { type: string; default: number; get: boolean }");
    let arena = parser.get_arena();
    let names: Vec<&str> = interface_members(&parser, iface)
        .into_iter()
        .filter_map(|m| arena.get_name_text(m))
        .collect();
    assert_eq!(names, vec!["type", "default", "get"]);
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_string_literal_union_is_flagged() {
    let (parser, union) = alias_type("type Mode = \"a\" | \"b\" | \"c\";");
    let arena = parser.get_arena();
    assert!(arena.is_kind(union, syntax_kind_ext::UNION_TYPE));
    assert!(arena.get(union).unwrap().has_flag(node_flags::STRING_LITERAL_UNION));
    assert_eq!(arena.get_composite_type(union).unwrap().types.len(), 3);
}

#[test]
fn test_leading_bar_union() {
    let (parser, union) = alias_type("type U =\n  | \"x\"\n  | \"y\";");
    let arena = parser.get_arena();
    assert!(arena.get(union).unwrap().has_flag(node_flags::STRING_LITERAL_UNION));
    let values: Vec<&str> = arena
        .get_composite_type(union)
        .unwrap()
        .types
        .iter()
        .filter_map(|t| arena.string_literal_type_value(t))
        .collect();
    assert_eq!(values, vec!["x", "y"]);
}

#[test]
fn test_nullable_union_is_not_string_literal_union() {
    let (parser, union) = alias_type("type Maybe = \"a\" | null;");
    let arena = parser.get_arena();
    assert!(!arena.get(union).unwrap().has_flag(node_flags::STRING_LITERAL_UNION));
    let types = &arena.get_composite_type(union).unwrap().types;
    assert!(arena.is_nullish_type(types.nodes[1]));
}

#[test]
fn test_heritage_clauses() {
    let (parser, iface) = only_statement("interface B extends A<string>, C {}");
    let arena = parser.get_arena();
    let clauses = arena
        .get_interface(iface)
        .unwrap()
        .heritage_clauses
        .clone()
        .expect("heritage clauses");
    assert_eq!(clauses.len(), 1);
    let clause = arena.get_heritage_clause(clauses.nodes[0]).unwrap();
    assert_eq!(clause.token, SyntaxKind::ExtendsKeyword as u16);
    assert_eq!(clause.types.len(), 2);

    let first = arena.get_expr_with_type_args(clause.types.nodes[0]).unwrap();
    assert_eq!(arena.entity_name_text(first.expression).as_deref(), Some("A"));
    assert_eq!(first.type_arguments.as_ref().map(|a| a.len()), Some(1));
    let second = arena.get_expr_with_type_args(clause.types.nodes[1]).unwrap();
    assert!(second.type_arguments.is_none());
}

#[test]
fn test_type_parameters_with_constraint_and_default() {
    let (parser, iface) = only_statement("interface Box<T extends object = {}, U> { value: T }");
    let arena = parser.get_arena();
    let params = arena
        .get_interface(iface)
        .unwrap()
        .type_parameters
        .clone()
        .expect("type parameters");
    assert_eq!(params.len(), 2);
    assert_eq!(arena.get_name_text(params.nodes[0]), Some("T"));
    assert_eq!(arena.get_name_text(params.nodes[1]), Some("U"));
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_unmodelled_statements_are_skipped() {
    let source = "declare var x: number;
declare function f(a: string): void;
declare namespace N {
    interface Hidden {}
}
import { A } from \"./a\";
export interface After {}
";
    let (parser, iface) = only_statement(source);
    let arena = parser.get_arena();
    assert_eq!(arena.get_name_text(iface), Some("After"));
    assert!(arena.get(iface).unwrap().has_flag(node_flags::EXPORTED));
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
}

#[test]
fn test_declare_modifier_sets_ambient_flag() {
    let (parser, alias) = only_statement("declare type Id = string;");
    let node = parser.get_arena().get(alias).unwrap();
    assert!(node.has_flag(node_flags::AMBIENT));
    assert!(!node.has_flag(node_flags::EXPORTED));
}

#[test]
fn test_semicolons_are_optional_before_line_breaks() {
    let (parser, root) = parse("type A = string\ntype B = number\n");
    assert_eq!(statements(&parser, root).len(), 2);
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_jsdoc_is_attached_to_declarations_and_members() {
    let source = "/** The foo. */
interface Foo {
    /** Bar docs. */
    bar: string;
    baz: number;
}
";
    let (parser, iface) = only_statement(source);
    let arena = parser.get_arena();
    assert!(arena.get(iface).unwrap().has_flag(node_flags::HAS_JSDOC));

    let jsdoc = arena.get_attached_jsdoc(iface);
    assert_eq!(
        arena.get_jsdoc(jsdoc).unwrap().comment.as_deref(),
        Some("The foo.")
    );

    let members = interface_members(&parser, iface);
    let bar_doc = arena.get_attached_jsdoc(members[0]);
    assert_eq!(
        arena.get_jsdoc(bar_doc).unwrap().comment.as_deref(),
        Some("Bar docs.")
    );
    assert!(arena.get_attached_jsdoc(members[1]).is_none());
    assert_eq!(arena.get_parent(bar_doc), members[0]);
}

#[test]
fn test_plain_block_comment_is_not_jsdoc() {
    let (parser, iface) = only_statement("/* not docs */\ninterface Foo {}");
    assert!(parser.get_arena().get_attached_jsdoc(iface).is_none());
}

#[test]
fn test_conditional_type_is_unsupported() {
    let (parser, ty) = alias_type("type C<T> = T extends string ? \"s\" : \"n\";");
    let arena = parser.get_arena();
    assert!(arena.is_kind(ty, syntax_kind_ext::UNSUPPORTED_TYPE));

    let diags = parser.get_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, 90001);
    assert_eq!(diags[0].category, DiagnosticCategory::Suggestion);
    assert!(diags[0].message_text.contains("conditional type"));
}

#[test]
fn test_mapped_type_is_unsupported() {
    let (parser, ty) = alias_type("type M = { [K in Keys]: string };");
    assert!(parser.get_arena().is_kind(ty, syntax_kind_ext::UNSUPPORTED_TYPE));
    assert_eq!(diagnostic_codes(&parser), vec![90001]);
}

#[test]
fn test_type_predicate_returns_boolean() {
    let (parser, iface) =
        only_statement("interface G { isFoo(x: unknown): x is Foo; check(x: unknown): asserts x; }");
    let arena = parser.get_arena();
    let members = interface_members(&parser, iface);
    let is_foo = arena.get_signature(members[0]).unwrap();
    assert!(arena.is_kind(is_foo.type_annotation, SyntaxKind::BooleanKeyword as u16));
    let check = arena.get_signature(members[1]).unwrap();
    assert!(arena.is_kind(check.type_annotation, SyntaxKind::VoidKeyword as u16));
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_function_and_constructor_types() {
    let (parser, ty) = alias_type("type F = (a: string, b?: number) => void;");
    let arena = parser.get_arena();
    assert!(arena.is_kind(ty, syntax_kind_ext::FUNCTION_TYPE));
    let func = arena.get_function_type(ty).unwrap();
    assert_eq!(func.parameters.len(), 2);
    assert!(arena.get_parameter(func.parameters.nodes[1]).unwrap().question_token);
    assert!(arena.is_kind(func.type_annotation, SyntaxKind::VoidKeyword as u16));

    let (parser, ty) = alias_type("type Ctor = new () => Foo;");
    assert!(parser.get_arena().is_kind(ty, syntax_kind_ext::CONSTRUCTOR_TYPE));
}

#[test]
fn test_parenthesized_function_type_in_union() {
    let (parser, ty) = alias_type("type Cb = (() => void) | null;");
    let arena = parser.get_arena();
    assert!(arena.is_kind(ty, syntax_kind_ext::UNION_TYPE));
    let types = &arena.get_composite_type(ty).unwrap().types;
    let first = types.nodes[0];
    assert!(arena.is_kind(first, syntax_kind_ext::PARENTHESIZED_TYPE));
    assert!(arena.is_kind(
        arena.skip_parentheses(first),
        syntax_kind_ext::FUNCTION_TYPE
    ));
}

#[test]
fn test_tuple_types() {
    let (parser, ty) = alias_type("type T = [string, number?, ...boolean[]];");
    let arena = parser.get_arena();
    let elements = &arena.get_tuple_type(ty).unwrap().elements;
    let kinds: Vec<u16> = elements.iter().filter_map(|e| arena.kind(e)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::StringKeyword as u16,
            syntax_kind_ext::OPTIONAL_TYPE,
            syntax_kind_ext::REST_TYPE,
        ]
    );

    let (parser, ty) = alias_type("type P = [x: number, y?: number];");
    let arena = parser.get_arena();
    let elements = &arena.get_tuple_type(ty).unwrap().elements;
    assert!(elements
        .iter()
        .all(|e| arena.is_kind(e, syntax_kind_ext::NAMED_TUPLE_MEMBER)));
    assert_eq!(arena.get_name_text(elements.nodes[1]), Some("y"));
}

#[test]
fn test_type_operators_queries_and_indexed_access() {
    let (parser, ty) = alias_type("type K = keyof Foo;");
    assert!(parser.get_arena().is_kind(ty, syntax_kind_ext::TYPE_OPERATOR));

    let (parser, ty) = alias_type("type Q = typeof foo.bar;");
    let arena = parser.get_arena();
    assert!(arena.is_kind(ty, syntax_kind_ext::TYPE_QUERY));
    let query = arena.get(ty).unwrap();
    assert_eq!(arena.node_text(ty, parser.get_source_text()), "typeof foo.bar");
    assert_eq!(query.end - query.pos, "typeof foo.bar".len() as u32);

    let (parser, ty) = alias_type("type I = Foo[\"a\"];");
    assert!(parser.get_arena().is_kind(ty, syntax_kind_ext::INDEXED_ACCESS_TYPE));
}

#[test]
fn test_negative_numeric_literal_type() {
    let (parser, ty) = alias_type("type N = -1;");
    let arena = parser.get_arena();
    let literal = arena.get_literal_type(ty).expect("literal type").literal;
    let data = arena.get_literal(literal).unwrap();
    assert_eq!(data.text, "-1");
    assert_eq!(data.value, Some(-1.0));
}

#[test]
fn test_qualified_type_reference() {
    let (parser, ty) = alias_type("type R = ns.Inner<string>;");
    let arena = parser.get_arena();
    assert_eq!(arena.type_reference_name(ty).as_deref(), Some("ns.Inner"));
    let type_ref = arena.get_type_ref(ty).unwrap();
    assert_eq!(type_ref.type_arguments.as_ref().map(|a| a.len()), Some(1));
}

#[test]
fn test_get_accessor_becomes_property_and_set_is_skipped() {
    let (parser, iface) =
        only_statement("interface Acc { get size(): number; set size(v: number); }");
    let arena = parser.get_arena();
    let members = interface_members(&parser, iface);
    assert_eq!(members.len(), 1);
    assert!(arena.is_kind(members[0], syntax_kind_ext::PROPERTY_SIGNATURE));
    assert_eq!(arena.get_name_text(members[0]), Some("size"));
    assert!(arena.is_kind(
        arena.get_type_annotation(members[0]),
        SyntaxKind::NumberKeyword as u16
    ));
    assert_eq!(diagnostic_codes(&parser), vec![90001]);
}

#[test]
fn test_binding_pattern_parameter_keeps_source_text() {
    let (parser, iface) = only_statement("interface D { f({ a, b }: Opts): void; }");
    let arena = parser.get_arena();
    let members = interface_members(&parser, iface);
    let param = arena.get_signature(members[0]).unwrap().parameters.nodes[0];
    assert_eq!(arena.get_name_text(param), Some("{ a, b }"));
}

#[test]
fn test_missing_close_brace_reports_expected() {
    let (parser, _) = parse("interface A {\n  x: string\n");
    let diag = parser
        .get_diagnostics()
        .iter()
        .find(|d| d.code == 1005)
        .expect("'}' expected");
    assert_eq!(diag.message_text, "'}' expected.");
}

#[test]
fn test_rest_parameter_must_be_last() {
    let (parser, _) = parse("interface A { f(...a: string[], b: number): void; }");
    assert_eq!(diagnostic_codes(&parser), vec![1014]);
}

#[test]
fn test_empty_type_argument_list() {
    let (parser, _) = parse("type E = Foo<>;");
    assert_eq!(diagnostic_codes(&parser), vec![1099]);
}

#[test]
fn test_missing_type_reports_type_expected() {
    let (parser, _) = parse("type A = ;");
    assert_eq!(diagnostic_codes(&parser), vec![1110]);
}

#[test]
fn test_recovers_from_missing_member_separator() {
    let source = "interface A { x: string y: number }\ninterface B { z: boolean }\n";
    let (parser, root) = parse(source);
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 2);
    assert!(diagnostic_codes(&parser).contains(&1005));
    assert_eq!(parser.get_arena().get_name_text(stmts[1]), Some("B"));
    assert_eq!(interface_members(&parser, stmts[1]).len(), 1);
}

#[test]
fn test_diagnostics_and_statement_lists_serialize() {
    let (parser, root) = parse("interface A { x: string y: number }\ninterface B {}\n");

    let json = serde_json::to_value(parser.get_diagnostics()).unwrap();
    let entries = json.as_array().unwrap();
    assert!(entries.iter().any(|entry| entry["code"] == 1005));
    assert!(entries.iter().all(|entry| entry["file"] == "test.ts"));
    let back: Vec<tsbind_common::Diagnostic> = serde_json::from_value(json).unwrap();
    assert_eq!(back.as_slice(), parser.get_diagnostics());

    let list = &parser.get_arena().get_source_file(root).expect("source file").statements;
    let text = serde_json::to_string(list).unwrap();
    let restored: crate::parser::NodeList = serde_json::from_str(&text).unwrap();
    assert_eq!(&restored, list);
    assert_eq!(restored.len(), 2);
}

#[test]
fn test_unclosed_interface_body_ends_at_next_declaration() {
    let source = "interface Bad { x: string;\ninterface Good { y: number; }\ntype T = \"a\" | \"b\";\n";
    let (parser, root) = parse(source);
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 3);
    assert!(diagnostic_codes(&parser).contains(&1005));

    let arena = parser.get_arena();
    assert_eq!(arena.get_name_text(stmts[0]), Some("Bad"));
    assert_eq!(arena.get_name_text(stmts[1]), Some("Good"));
    assert_eq!(arena.get_name_text(stmts[2]), Some("T"));
    assert_eq!(interface_members(&parser, stmts[0]).len(), 1);
    assert_eq!(interface_members(&parser, stmts[1]).len(), 1);
}

#[test]
fn test_unclosed_parameter_list_ends_at_next_declaration() {
    let source = "interface Bad { f(x: string: void;\ninterface Good { y: number; }\n";
    let (parser, root) = parse(source);
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 2);
    assert_eq!(parser.get_arena().get_name_text(stmts[1]), Some("Good"));
    assert_eq!(interface_members(&parser, stmts[1]).len(), 1);
}

#[test]
fn test_member_named_type_does_not_end_block() {
    let (parser, stmt) = only_statement("interface A {\n  type: string;\n  interface: number;\n}\n");
    assert_eq!(interface_members(&parser, stmt).len(), 2);
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_parse_declaration_in_range_includes_jsdoc() {
    let source = "interface A { a: string }\n/** Docs for B. */\ninterface B { b: number }\n";
    let start = source.find("/**").unwrap();
    let mut parser = ParserState::new("range.ts", source);
    let node = parser.parse_declaration_in_range(start, source.len());
    let arena = parser.get_arena();

    assert_eq!(arena.get_name_text(node), Some("B"));
    assert!(arena.get(node).unwrap().has_flag(node_flags::HAS_JSDOC));
    let jsdoc = arena.get_attached_jsdoc(node);
    assert_eq!(
        arena.get_jsdoc(jsdoc).unwrap().comment.as_deref(),
        Some("Docs for B.")
    );
}

#[test]
fn test_parse_declaration_in_range_rejects_non_declarations() {
    let source = "declare var x: number;";
    let mut parser = ParserState::new("range.ts", source);
    let node = parser.parse_declaration_in_range(0, source.len());
    assert!(node.is_none());
    assert_eq!(diagnostic_codes(&parser), vec![1128]);
}

#[test]
fn test_deep_type_nesting_is_bounded() {
    // Run on a large stack: the recursion limit is what is under test, not
    // the default test-thread stack size.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let depth = 300;
            let source = format!(
                "type Deep = {}string{};",
                "(".repeat(depth),
                ")".repeat(depth)
            );
            let (parser, root) = parse(&source);
            (statements(&parser, root).len(), diagnostic_codes(&parser))
        })
        .unwrap();
    let (count, codes) = handle.join().unwrap();
    assert_eq!(count, 1);
    assert_eq!(codes, vec![90002]);
}

#[test]
fn test_parent_references_are_set() {
    let (parser, iface) = only_statement("interface P { a: Array<string> }");
    let arena = parser.get_arena();
    let member = interface_members(&parser, iface)[0];
    assert_eq!(arena.get_parent(member), iface);
    let type_ref = arena.get_type_annotation(member);
    assert_eq!(
        arena.find_ancestor_of_kind(type_ref, syntax_kind_ext::INTERFACE_DECLARATION),
        Some(iface)
    );
    let args = arena.descendants_of_kind(iface, syntax_kind_ext::TYPE_REFERENCE);
    assert_eq!(args.len(), 1);
}
