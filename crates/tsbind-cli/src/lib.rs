//! Command-line driver for tsbind.
//!
//! - `args` - clap argument definitions
//! - `config` - `tsbind.json` loading and merging with CLI flags
//! - `driver` - reads the corpus and renders the reduced model as JSON

pub mod args;
pub mod config;
pub mod driver;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
