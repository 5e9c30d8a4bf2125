use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the tsbind binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsbind",
    version,
    about = "Reduce TypeScript declaration types into a target-agnostic object model"
)]
pub struct CliArgs {
    /// Declaration files or directories to read. Replaces `declarations` from
    /// the config file.
    pub files: Vec<PathBuf>,

    /// Root type to reduce. Repeat for several types.
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Path to a tsbind.json config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Include parse diagnostics in the output.
    #[arg(long)]
    pub diagnostics: bool,

    /// Type-name suffix that is never resolved. Repeat for several suffixes.
    #[arg(long = "exclude-suffix", value_name = "SUFFIX")]
    pub exclude_suffixes: Vec<String>,

    /// Keep `on*` properties and `*EventListener` methods.
    #[arg(long = "keep-event-handlers", alias = "keepEventHandlers")]
    pub keep_event_handlers: bool,
}
