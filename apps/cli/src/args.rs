//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "agency-cli")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Companion tool for the agency site backend")]
pub struct Cli {
    /// Config file (extension optional). Defaults to `server.*` when present.
    #[arg(long, global = true, env = "AGENCY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level instead of warnings only
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a contact message through the API
    Contact(ContactArgs),
    /// Write sitemap.xml and robots.txt for the static build
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub message: String,
    /// Backend base URL, e.g. `http://localhost:8000/api`
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Output directory, created when missing
    #[arg(long)]
    pub out: PathBuf,
    /// Canonical site origin, e.g. `https://averon.agency`
    #[arg(long)]
    pub base_url: Option<String>,
}
