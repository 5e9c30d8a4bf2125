//! Tests for the build-and-reduce entry point.

use crate::declaration_parser::{ParserResultStatus, TypeDeclarationParser};
use std::sync::Arc;
use tsbind_graph::{
    BuilderOptions, Declaration, DeclarationKind, DeclarationSource, DependencyCache,
    TypeDeclarationReader,
};

const GEOLOCATION: &str = include_str!("../../../tests/fixtures/geolocation.d.ts");

fn geolocation_parser() -> TypeDeclarationParser<TypeDeclarationReader> {
    TypeDeclarationParser::new(TypeDeclarationReader::from_source(
        "lib.dom.d.ts",
        GEOLOCATION,
    ))
}

#[test]
fn test_parse_target_type_geolocation() {
    let parser = geolocation_parser();
    let result = parser.parse_target_type("Geolocation");

    assert_eq!(result.status, ParserResultStatus::SuccessfullyParsed);
    assert!(result.is_success());
    assert!(result.error.is_none());
    assert!(result.diagnostics.is_empty());

    let top = result.value.expect("successful parse has a value");
    assert_eq!(top.methods.len(), 1);
    let method = &top.methods[0];
    assert_eq!(method.name, "getCurrentPosition");
    assert_eq!(method.parameters.len(), 3);
    assert!(method.is_bidirectional);
    assert!(method.parameters[0].action.is_some());
}

#[test]
fn test_missing_and_primitive_targets_are_not_found() {
    let parser = geolocation_parser();
    for name in ["Missing", "string", "EpochTimeStamp"] {
        let result = parser.parse_target_type(name);
        assert_eq!(result.status, ParserResultStatus::TargetTypeNotFound, "{name}");
        assert!(result.value.is_none());
        assert!(result.error.is_none());
    }
}

/// Hands out a declaration with no parsed blocks for every interface name.
struct HollowSource;

impl DeclarationSource for HollowSource {
    fn try_get_interface(&self, name: &str) -> Option<Declaration> {
        Some(Declaration::new(
            name,
            DeclarationKind::Interface,
            Vec::new(),
            Vec::new(),
        ))
    }

    fn try_get_type_alias(&self, _name: &str) -> Option<Declaration> {
        None
    }
}

#[test]
fn test_reduce_failure_is_reported_as_error_parsing() {
    let parser = TypeDeclarationParser::new(HollowSource);
    let result = parser.parse_target_type("Hollow");

    assert_eq!(result.status, ParserResultStatus::ErrorParsing);
    assert!(result.value.is_none());
    let error = result.error.expect("error message is kept");
    assert!(error.contains("Hollow"), "unexpected error: {error}");
}

#[test]
fn test_parse_object_reduces_with_dependents() {
    let parser = geolocation_parser();
    let result = parser.parse_object("GeolocationPosition");

    assert_eq!(result.status, ParserResultStatus::SuccessfullyParsed);
    let model = result.value.unwrap();
    assert_eq!(model.properties.len(), 2);
    assert!(model.dependent_types.contains_key("GeolocationCoordinates"));
}

#[test]
fn test_diagnostics_of_the_graph_are_reported() {
    let reader = TypeDeclarationReader::from_source(
        "broken.d.ts",
        "interface Outer { inner: Inner; }\ninterface Inner { a: ; b: string; }\n",
    );
    let parser = TypeDeclarationParser::new(reader);
    let result = parser.parse_target_type("Outer");

    assert_eq!(result.status, ParserResultStatus::SuccessfullyParsed);
    assert!(!result.diagnostics.is_empty());
    assert!(result.diagnostics.iter().all(|d| d.file == "broken.d.ts"));
}

#[test]
fn test_shared_cache_is_reused_across_parsers() {
    let cache = Arc::new(DependencyCache::new());
    let reader = Arc::new(TypeDeclarationReader::from_source("lib.dom.d.ts", GEOLOCATION));

    let first = TypeDeclarationParser::with_cache(Arc::clone(&reader), Arc::clone(&cache));
    let second = TypeDeclarationParser::with_cache(Arc::clone(&reader), Arc::clone(&cache));

    let a = first.build("Geolocation").unwrap();
    let b = second.build("Geolocation").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_builder_options_are_applied() {
    let reader = TypeDeclarationReader::from_source(
        "window.d.ts",
        "interface Window { events: WindowEventMap; }\ninterface WindowEventMap { load: string; }\n",
    );
    let parser = TypeDeclarationParser::new(reader).with_builder_options(BuilderOptions {
        excluded_suffixes: Vec::new(),
        ..BuilderOptions::default()
    });
    let top = parser.parse_target_type("Window").value.unwrap();
    assert!(top.dependent_types.contains_key("WindowEventMap"));
}

#[test]
fn test_result_serializes_status() {
    let parser = geolocation_parser();
    let json = serde_json::to_value(parser.parse_target_type("Missing")).unwrap();
    assert_eq!(json["status"], "targetTypeNotFound");
    assert!(json.get("value").is_none());

    let json = serde_json::to_value(parser.parse_target_type("PositionOptions")).unwrap();
    assert_eq!(json["status"], "successfullyParsed");
    assert_eq!(json["value"]["properties"][0]["name"], "enableHighAccuracy");
}
