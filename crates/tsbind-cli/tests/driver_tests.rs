use crate::args::CliArgs;
use crate::driver::{collect_declaration_files, find_config, run};
use clap::Parser;
use serde_json::Value;
use std::path::Path;

const GEOLOCATION: &str = include_str!("../../../tests/fixtures/geolocation.d.ts");

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("tsbind").chain(argv.iter().copied())).unwrap()
}

fn write_corpus(dir: &Path) {
    std::fs::write(dir.join("lib.dom.d.ts"), GEOLOCATION).unwrap();
}

#[test]
fn run_reduces_types_from_cli_files() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    let output = run(
        &args(&["lib.dom.d.ts", "-t", "Geolocation", "-t", "Missing"]),
        dir.path(),
    )
    .unwrap();
    assert_eq!(output.failed, 1);

    let json: Value = serde_json::from_str(&output.rendered).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Geolocation", "Missing"]);

    assert_eq!(json["Geolocation"]["status"], "successfullyParsed");
    let method = &json["Geolocation"]["value"]["methods"][0];
    assert_eq!(method["name"], "getCurrentPosition");
    assert_eq!(method["parameters"].as_array().unwrap().len(), 3);
    assert_eq!(json["Missing"]["status"], "targetTypeNotFound");
}

#[test]
fn run_picks_up_default_config() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    std::fs::write(
        dir.path().join("tsbind.json"),
        r#"{
            // roots to reduce
            "declarations": ["lib.dom.d.ts"],
            "types": ["PositionOptions"],
        }"#,
    )
    .unwrap();

    let cli = args(&["--pretty"]);
    assert_eq!(
        find_config(&cli, dir.path()),
        Some(dir.path().join("tsbind.json"))
    );

    let output = run(&cli, dir.path()).unwrap();
    assert_eq!(output.failed, 0);
    assert!(output.rendered.contains('\n'));

    let json: Value = serde_json::from_str(&output.rendered).unwrap();
    let properties = json["PositionOptions"]["value"]["properties"]
        .as_array()
        .unwrap();
    assert_eq!(properties.len(), 3);
}

#[test]
fn run_resolves_config_declarations_relative_to_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("conf");
    std::fs::create_dir(&conf).unwrap();
    write_corpus(&conf);
    std::fs::write(
        conf.join("custom.json"),
        r#"{ "declarations": ["lib.dom.d.ts"], "types": ["GeolocationPosition"] }"#,
    )
    .unwrap();

    let output = run(&args(&["-c", "conf/custom.json"]), dir.path()).unwrap();
    assert_eq!(output.failed, 0);
    assert!(!output.rendered.contains('\n'));
}

#[test]
fn run_strips_diagnostics_unless_requested() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("broken.d.ts"),
        "interface Outer { inner: Inner; }\ninterface Inner { a: ; b: string; }\n",
    )
    .unwrap();

    let output = run(&args(&["broken.d.ts", "-t", "Outer"]), dir.path()).unwrap();
    let json: Value = serde_json::from_str(&output.rendered).unwrap();
    assert!(json["Outer"].get("diagnostics").is_none());

    let output = run(
        &args(&["broken.d.ts", "-t", "Outer", "--diagnostics"]),
        dir.path(),
    )
    .unwrap();
    let json: Value = serde_json::from_str(&output.rendered).unwrap();
    assert!(!json["Outer"]["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn run_fails_on_missing_declaration_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&args(&["absent.d.ts", "-t", "A"]), dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("absent.d.ts"));
}

#[test]
fn run_fails_without_targets() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let err = run(&args(&["lib.dom.d.ts"]), dir.path()).unwrap_err();
    assert!(err.to_string().contains("no target types"));
}

#[test]
fn directories_expand_to_sorted_declaration_files() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    std::fs::create_dir_all(lib.join("nested")).unwrap();
    std::fs::write(lib.join("b.d.ts"), "interface B { a: A; }\n").unwrap();
    std::fs::write(lib.join("nested").join("a.d.ts"), "interface A { x: number; }\n").unwrap();
    std::fs::write(lib.join("notes.ts"), "interface Ignored {}\n").unwrap();

    let files = collect_declaration_files(&[lib.clone()]).unwrap();
    assert_eq!(files, vec![lib.join("b.d.ts"), lib.join("nested").join("a.d.ts")]);

    let output = run(&args(&["lib", "-t", "B", "-t", "Ignored"]), dir.path()).unwrap();
    assert_eq!(output.failed, 1);
    let json: Value = serde_json::from_str(&output.rendered).unwrap();
    assert_eq!(json["B"]["status"], "successfullyParsed");
    assert_eq!(json["B"]["value"]["dependentTypes"]["A"]["typeName"], "A");
}
