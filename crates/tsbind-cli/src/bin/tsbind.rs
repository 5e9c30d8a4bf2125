use anyhow::{Context, Result};
use clap::Parser;
use tsbind_cli::args::CliArgs;
use tsbind_cli::driver;

/// At least one target was not found or failed to reduce.
const EXIT_TARGETS_FAILED: i32 = 1;

fn main() -> Result<()> {
    // Installs a subscriber only when TSBIND_LOG or RUST_LOG is set.
    tsbind::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let output = driver::run(&args, &cwd)?;

    println!("{}", output.rendered);
    if output.failed > 0 {
        std::process::exit(EXIT_TARGETS_FAILED);
    }
    Ok(())
}
