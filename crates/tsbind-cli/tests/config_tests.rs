use crate::args::CliArgs;
use crate::config::{ConfigError, TsbindConfig, load_config, parse_config, resolve_options};
use clap::Parser;
use std::path::{Path, PathBuf};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("tsbind").chain(argv.iter().copied())).unwrap()
}

#[test]
fn parse_config_accepts_comments_and_trailing_commas() {
    let config = parse_config(
        r#"{
            // corpus
            "declarations": ["lib.dom.d.ts",],
            /* roots */
            "types": ["Geolocation", "Window"],
            "callbackSuffix": "Handler",
        }"#,
    )
    .unwrap();

    assert_eq!(config.declarations, vec!["lib.dom.d.ts"]);
    assert_eq!(config.types, vec!["Geolocation", "Window"]);
    assert_eq!(config.callback_suffix.as_deref(), Some("Handler"));
    assert!(config.marker_bases.is_none());
}

#[test]
fn parse_config_keeps_comment_markers_inside_strings() {
    let config = parse_config(r#"{ "declarations": ["http://host/lib.d.ts", "a,]"] }"#).unwrap();
    assert_eq!(config.declarations, vec!["http://host/lib.d.ts", "a,]"]);
}

#[test]
fn parse_config_booleans_accept_strings() {
    let config =
        parse_config(r#"{ "skipEventHandlers": "false", "includeDiagnostics": "yes" }"#).unwrap();
    assert_eq!(config.skip_event_handlers, Some(false));
    assert_eq!(config.include_diagnostics, Some(true));

    let config = parse_config(r#"{ "skipEventHandlers": true }"#).unwrap();
    assert_eq!(config.skip_event_handlers, Some(true));

    assert!(parse_config(r#"{ "skipEventHandlers": "maybe" }"#).is_err());
}

#[test]
fn load_config_reports_path_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tsbind.json");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("tsbind.json"));

    std::fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn resolve_uses_config_relative_to_its_directory() {
    let config = TsbindConfig {
        declarations: vec!["lib.dom.d.ts".to_string()],
        types: vec!["Geolocation".to_string()],
        marker_bases: Some(vec!["Node".to_string()]),
        excluded_suffixes: Some(vec!["Map".to_string()]),
        ..TsbindConfig::default()
    };
    let resolved = resolve_options(
        &args(&[]),
        Some(&config),
        Path::new("/project/conf"),
        Path::new("/work"),
    )
    .unwrap();

    assert_eq!(
        resolved.declarations,
        vec![PathBuf::from("/project/conf/lib.dom.d.ts")]
    );
    assert_eq!(resolved.types, vec!["Geolocation"]);
    assert_eq!(resolved.reducer.marker_bases, vec!["Node"]);
    assert_eq!(resolved.reducer.callback_suffix, "Callback");
    assert_eq!(resolved.builder.excluded_suffixes, vec!["Map"]);
    assert!(resolved.reducer.skip_event_handlers);
    assert!(!resolved.include_diagnostics);
}

#[test]
fn resolve_prefers_cli_lists() {
    let config = TsbindConfig {
        declarations: vec!["lib.dom.d.ts".to_string()],
        types: vec!["Geolocation".to_string()],
        excluded_suffixes: Some(vec!["Map".to_string()]),
        include_diagnostics: Some(true),
        ..TsbindConfig::default()
    };
    let resolved = resolve_options(
        &args(&[
            "local.d.ts",
            "-t",
            "Window",
            "--exclude-suffix",
            "EventMap",
            "--keep-event-handlers",
        ]),
        Some(&config),
        Path::new("/project"),
        Path::new("/work"),
    )
    .unwrap();

    assert_eq!(resolved.declarations, vec![PathBuf::from("/work/local.d.ts")]);
    assert_eq!(resolved.types, vec!["Window"]);
    assert_eq!(resolved.builder.excluded_suffixes, vec!["EventMap"]);
    assert!(!resolved.reducer.skip_event_handlers);
    assert!(resolved.include_diagnostics);
}

#[test]
fn resolve_config_can_disable_event_handler_skipping() {
    let config = TsbindConfig {
        skip_event_handlers: Some(false),
        ..TsbindConfig::default()
    };
    let resolved = resolve_options(
        &args(&["a.d.ts", "-t", "A"]),
        Some(&config),
        Path::new("/p"),
        Path::new("/w"),
    )
    .unwrap();
    assert!(!resolved.reducer.skip_event_handlers);
}

#[test]
fn resolve_requires_declarations_and_types() {
    let err = resolve_options(&args(&["-t", "A"]), None, Path::new("/p"), Path::new("/w"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::NoDeclarations));

    let err =
        resolve_options(&args(&["a.d.ts"]), None, Path::new("/p"), Path::new("/w")).unwrap_err();
    assert!(matches!(err, ConfigError::NoTypes));
}
