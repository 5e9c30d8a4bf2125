//! `tsbind.json` loading and option resolution.

use crate::args::CliArgs;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tsbind_graph::BuilderOptions;
use tsbind_model::ReducerOptions;

pub const CONFIG_FILE_NAME: &str = "tsbind.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no declaration files given: pass files or set \"declarations\" in {CONFIG_FILE_NAME}")]
    NoDeclarations,
    #[error("no target types given: pass --type or set \"types\" in {CONFIG_FILE_NAME}")]
    NoTypes,
}

/// Boolean options also accept `"true"` / `"false"` style strings.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsbindConfig {
    /// Declaration files, relative to the config file.
    #[serde(default)]
    pub declarations: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub excluded_suffixes: Option<Vec<String>>,
    #[serde(default)]
    pub marker_bases: Option<Vec<String>>,
    #[serde(default)]
    pub callback_suffix: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub skip_event_handlers: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub include_diagnostics: Option<bool>,
}

/// Parse config text. Comments and trailing commas are allowed.
pub fn parse_config(source: &str) -> Result<TsbindConfig, serde_json::Error> {
    let stripped = strip_comments(source);
    serde_json::from_str(&remove_trailing_commas(&stripped))
}

pub fn load_config(path: &Path) -> Result<TsbindConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything the driver needs, after merging the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub declarations: Vec<PathBuf>,
    pub types: Vec<String>,
    pub builder: BuilderOptions,
    pub reducer: ReducerOptions,
    pub include_diagnostics: bool,
    pub pretty: bool,
}

/// Merge `config` (declarations relative to `config_dir`) with CLI `args`
/// (files relative to `cwd`). Non-empty CLI lists replace config lists.
pub fn resolve_options(
    args: &CliArgs,
    config: Option<&TsbindConfig>,
    config_dir: &Path,
    cwd: &Path,
) -> Result<ResolvedOptions, ConfigError> {
    let config = config.cloned().unwrap_or_default();

    let declarations: Vec<PathBuf> = if args.files.is_empty() {
        config
            .declarations
            .iter()
            .map(|file| config_dir.join(file))
            .collect()
    } else {
        args.files.iter().map(|file| cwd.join(file)).collect()
    };
    if declarations.is_empty() {
        return Err(ConfigError::NoDeclarations);
    }

    let types = if args.types.is_empty() {
        config.types
    } else {
        args.types.clone()
    };
    if types.is_empty() {
        return Err(ConfigError::NoTypes);
    }

    let mut builder = BuilderOptions::default();
    if !args.exclude_suffixes.is_empty() {
        builder.excluded_suffixes = args.exclude_suffixes.clone();
    } else if let Some(suffixes) = config.excluded_suffixes {
        builder.excluded_suffixes = suffixes;
    }

    let mut reducer = ReducerOptions::default();
    if let Some(bases) = config.marker_bases {
        reducer.marker_bases = bases;
    }
    if let Some(suffix) = config.callback_suffix {
        reducer.callback_suffix = suffix;
    }
    reducer.skip_event_handlers =
        !args.keep_event_handlers && config.skip_event_handlers.unwrap_or(true);

    Ok(ResolvedOptions {
        declarations,
        types,
        builder,
        reducer,
        include_diagnostics: args.diagnostics || config.include_diagnostics.unwrap_or(false),
        pretty: args.pretty,
    })
}

/// Drop `//` and `/* */` comments outside string literals.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Drop commas that directly precede `}` or `]`.
fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == ','
            && chars
                .clone()
                .find(|next| !next.is_whitespace())
                .is_some_and(|next| next == '}' || next == ']')
        {
            continue;
        }
        out.push(ch);
    }
    out
}
