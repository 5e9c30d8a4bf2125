use crate::args::CliArgs;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_files_and_repeated_types() {
    let args = CliArgs::try_parse_from([
        "tsbind",
        "lib.dom.d.ts",
        "extra.d.ts",
        "-t",
        "Geolocation",
        "--type",
        "Window",
    ])
    .unwrap();

    assert_eq!(
        args.files,
        vec![PathBuf::from("lib.dom.d.ts"), PathBuf::from("extra.d.ts")]
    );
    assert_eq!(args.types, vec!["Geolocation", "Window"]);
    assert!(args.config.is_none());
    assert!(!args.pretty);
    assert!(!args.keep_event_handlers);
}

#[test]
fn parses_flags() {
    let args = CliArgs::try_parse_from([
        "tsbind",
        "-c",
        "conf/tsbind.json",
        "--pretty",
        "--diagnostics",
        "--exclude-suffix",
        "EventMap",
        "--exclude-suffix",
        "Options",
        "--keepEventHandlers",
    ])
    .unwrap();

    assert_eq!(args.config, Some(PathBuf::from("conf/tsbind.json")));
    assert!(args.pretty);
    assert!(args.diagnostics);
    assert_eq!(args.exclude_suffixes, vec!["EventMap", "Options"]);
    assert!(args.keep_event_handlers);
    assert!(args.files.is_empty());
}

#[test]
fn rejects_unknown_flag() {
    assert!(CliArgs::try_parse_from(["tsbind", "--bogus"]).is_err());
}
