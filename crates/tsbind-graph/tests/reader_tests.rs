//! Tests for the in-memory declaration reader.

use crate::reader::TypeDeclarationReader;
use crate::source::{DeclarationKind, DeclarationSource};
use rayon::prelude::*;

const CORPUS: &str = r#"
/** A point in space. */
interface Point {
    x: number;
    y: number;
}

type Direction = "up" | "down";

declare namespace ns {
    interface Hidden {
        value: string;
    }
}

interface Point {
    z?: number;
}
"#;

fn reader() -> TypeDeclarationReader {
    TypeDeclarationReader::from_source("corpus.d.ts", CORPUS)
}

#[test]
fn test_declared_names_are_sorted_and_top_level() {
    let reader = reader();
    assert_eq!(reader.declared_names(), vec!["Direction", "Point"]);
    assert!(reader.contains("Point"));
    assert!(!reader.contains("Hidden"));
}

#[test]
fn test_interface_lookup_returns_same_declaration() {
    let reader = reader();
    let first = reader.try_get_interface("Point").expect("Point is declared");
    let second = reader.try_get_interface("Point").expect("Point is declared");
    assert!(first.ptr_eq(&second));
    assert_eq!(first.name(), "Point");
    assert_eq!(first.kind(), DeclarationKind::Interface);
}

#[test]
fn test_repeated_interface_blocks_are_merged() {
    let reader = reader();
    let point = reader.try_get_interface("Point").unwrap();
    assert_eq!(point.parts().len(), 2);

    let member_counts: Vec<usize> = point
        .parts()
        .iter()
        .map(|part| part.arena().get_interface(part.node()).unwrap().members.len())
        .collect();
    assert_eq!(member_counts, vec![2, 1]);
}

#[test]
fn test_declaration_range_includes_jsdoc() {
    let reader = reader();
    let point = reader.try_get_interface("Point").unwrap();
    let part = point.primary().unwrap();
    let arena = part.arena();
    let jsdoc = arena.get_interface(part.node()).unwrap().jsdoc;
    assert_eq!(
        arena.get_jsdoc(jsdoc).unwrap().comment.as_deref(),
        Some("A point in space.")
    );
}

#[test]
fn test_type_alias_lookup_is_kind_specific() {
    let reader = reader();
    let direction = reader.try_get_type_alias("Direction").unwrap();
    assert_eq!(direction.kind(), DeclarationKind::TypeAlias);
    assert_eq!(
        direction.primary().unwrap().text(direction.primary().unwrap().node()),
        r#"type Direction = "up" | "down";"#
    );
    assert!(reader.try_get_interface("Direction").is_none());
    assert!(reader.try_get_type_alias("Point").is_none());
}

#[test]
fn test_unknown_names_resolve_to_none() {
    let reader = reader();
    assert!(reader.try_get_interface("Missing").is_none());
    assert!(reader.try_get_type_alias("Missing").is_none());
    assert!(reader.diagnostics("Missing").is_empty());
}

#[test]
fn test_parse_diagnostics_are_kept_per_name() {
    let reader = TypeDeclarationReader::from_source(
        "broken.d.ts",
        "interface Broken { a: ; b: string; }\ninterface Fine { c: number; }\n",
    );
    let broken = reader.try_get_interface("Broken").unwrap();
    assert!(!broken.diagnostics().is_empty());
    assert_eq!(reader.diagnostics("Broken").len(), broken.diagnostics().len());
    assert!(reader.diagnostics("Fine").is_empty());
    assert_eq!(broken.diagnostics()[0].file, "broken.d.ts");
}

#[test]
fn test_declaration_kinds_serialize_camel_case() {
    let reader = reader();
    let kinds: Vec<DeclarationKind> = reader
        .declared_names()
        .into_iter()
        .filter_map(|name| {
            reader
                .try_get_interface(name)
                .or_else(|| reader.try_get_type_alias(name))
                .map(|declaration| declaration.kind())
        })
        .collect();
    assert!(kinds.contains(&DeclarationKind::Interface));
    assert!(kinds.contains(&DeclarationKind::TypeAlias));

    assert_eq!(serde_json::to_value(DeclarationKind::Interface).unwrap(), "interface");
    assert_eq!(serde_json::to_value(DeclarationKind::TypeAlias).unwrap(), "typeAlias");
    let back: DeclarationKind = serde_json::from_str("\"typeAlias\"").unwrap();
    assert_eq!(back, DeclarationKind::TypeAlias);
}

#[test]
fn test_unclosed_body_does_not_hide_later_declarations() {
    let reader = TypeDeclarationReader::from_source(
        "broken.d.ts",
        "interface Bad { x: string;\ninterface Good { y: number; }\ntype T = \"a\" | \"b\";\n",
    );
    assert_eq!(reader.declared_names(), vec!["Bad", "Good", "T"]);

    let good = reader.try_get_interface("Good").unwrap();
    assert!(good.diagnostics().is_empty());
    assert!(reader.try_get_type_alias("T").is_some());
    assert!(!reader.diagnostics("Bad").is_empty());
}

#[test]
fn test_unclosed_paren_does_not_hide_later_declarations() {
    let reader = TypeDeclarationReader::from_source(
        "broken.d.ts",
        "interface Bad { f(x: string: void;\ninterface Good { y: number; }\n",
    );
    assert_eq!(reader.declared_names(), vec!["Bad", "Good"]);
    assert!(reader.try_get_interface("Good").unwrap().diagnostics().is_empty());
}

#[test]
fn test_namespace_members_stay_hidden_across_lines() {
    let reader = TypeDeclarationReader::from_source(
        "ns.d.ts",
        "declare namespace WebAssembly {\n    interface Module {}\n    type Kind = string;\n}\ninterface After {}\n",
    );
    assert_eq!(reader.declared_names(), vec!["After"]);
}

#[test]
fn test_added_file_extends_parsed_interface() {
    let mut reader = reader();
    assert_eq!(reader.try_get_interface("Point").unwrap().parts().len(), 2);

    reader.add_file("more.d.ts", "interface Point { w: number; }");
    let point = reader.try_get_interface("Point").unwrap();
    assert_eq!(point.parts().len(), 3);
    assert_eq!(point.parts()[2].file_name(), "more.d.ts");
    assert_eq!(reader.file_count(), 2);
}

#[test]
fn test_concurrent_lookups_share_one_declaration() {
    let reader = reader();
    let declarations: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| reader.try_get_interface("Point").unwrap())
        .collect();
    let first = &declarations[0];
    assert!(declarations.iter().all(|decl| decl.ptr_eq(first)));
}
