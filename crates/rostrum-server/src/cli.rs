//! Command line interface definition.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// Hot-reloading server-side rendering server.
///
/// Serves every request by rendering it against the current page template,
/// client manifest and server bundle. Outside production the inputs are
/// hot-reloaded as the template changes and the compilers emit new builds.
#[derive(Debug, Parser)]
#[command(name = "rostrum", version, about)]
pub struct Cli {
    /// Path to the configuration file (defaults to rostrum.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding configuration
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to bind, overriding configuration
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
