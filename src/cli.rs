//! Command-line interface definitions for maxify.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Un-minifying HTTP response filter proxy for security testing.
///
/// maxify sits in a security-testing proxy chain and watches outbound
/// responses for known minified script assets. When one is recognized (and
/// its un-minified counterpart is reachable), the response is replaced with
/// a redirect to the readable source so manual inspection is not hindered
/// by minification.
#[derive(Parser, Debug)]
#[command(name = "maxify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (or omit to start the proxy).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to additional config file.
    ///
    /// This config file is merged on top of system and user configs,
    /// giving it the highest priority (except for CLI flags).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the JSON library catalog.
    ///
    /// Overrides the `[catalog] path` setting from config files.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Address to listen on (e.g. 127.0.0.1:8888).
    ///
    /// Overrides the `[listener] bind_address` setting from config files.
    #[arg(short = 'l', long = "listen", value_name = "ADDR")]
    pub listen: Option<String>,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Subcommands for maxify.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a catalog file without starting the proxy.
    ///
    /// Loads the catalog, reports the number of tracked assets, and exits
    /// non-zero if the file is unreadable or malformed.
    Validate {
        /// Path to the JSON catalog file to validate.
        #[arg(required = true)]
        catalog: PathBuf,
    },
}
