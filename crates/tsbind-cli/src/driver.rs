//! Reads the corpus, reduces every requested type and renders the JSON output.

use crate::args::CliArgs;
use crate::config::{CONFIG_FILE_NAME, ResolvedOptions, load_config, resolve_options};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsbind_graph::TypeDeclarationReader;
use tsbind_model::{ParserResult, TopLevelObject, TypeDeclarationParser};
use walkdir::WalkDir;

const DECLARATION_SUFFIX: &str = ".d.ts";

/// Rendered output plus the number of targets that did not reduce.
#[derive(Debug)]
pub struct RunOutput {
    pub rendered: String,
    pub failed: usize,
}

/// `--config` relative to `cwd`, or `tsbind.json` in `cwd` when present.
pub fn find_config(args: &CliArgs, cwd: &Path) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => {
            let default = cwd.join(CONFIG_FILE_NAME);
            default.is_file().then_some(default)
        }
    }
}

pub fn resolve(args: &CliArgs, cwd: &Path) -> Result<ResolvedOptions> {
    let config_path = find_config(args, cwd);
    let config = config_path.as_deref().map(load_config).transpose()?;
    let config_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(cwd);
    if let Some(path) = &config_path {
        debug!(config = %path.display(), "loaded config");
    }
    Ok(resolve_options(args, config.as_ref(), config_dir, cwd)?)
}

/// Expand directories into the `.d.ts` files below them, sorted by path.
/// Plain file paths are kept as given.
pub fn collect_declaration_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry
                .with_context(|| format!("failed to walk directory: {}", path.display()))?;
            let is_declaration = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(DECLARATION_SUFFIX));
            if entry.file_type().is_file() && is_declaration {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(dir = %path.display(), files = found.len(), "expanded declaration directory");
        files.extend(found);
    }
    Ok(files)
}

pub fn read_declarations(paths: &[PathBuf]) -> Result<TypeDeclarationReader> {
    let mut reader = TypeDeclarationReader::new();
    for path in collect_declaration_files(paths)? {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read declaration file: {}", path.display()))?;
        reader.add_file(path.display().to_string(), text);
    }
    info!(
        files = reader.file_count(),
        declarations = reader.declared_names().len(),
        "indexed declarations"
    );
    Ok(reader)
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunOutput> {
    let options = resolve(args, cwd)?;
    let reader = read_declarations(&options.declarations)?;
    let parser = TypeDeclarationParser::new(reader)
        .with_builder_options(options.builder.clone())
        .with_reducer_options(options.reducer.clone());

    let results: Vec<(String, ParserResult<TopLevelObject>)> = options
        .types
        .par_iter()
        .map(|type_name| {
            let mut result = parser.parse_target_type(type_name);
            if !options.include_diagnostics {
                result.diagnostics.clear();
            }
            info!(type_name = %type_name, status = ?result.status, "parsed target type");
            (type_name.clone(), result)
        })
        .collect();

    let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
    let mut output = Map::new();
    for (type_name, result) in results {
        let value = serde_json::to_value(&result)
            .with_context(|| format!("failed to serialize result for {type_name}"))?;
        output.insert(type_name, value);
    }

    let output = Value::Object(output);
    let rendered = if options.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("failed to render output")?;

    Ok(RunOutput { rendered, failed })
}
