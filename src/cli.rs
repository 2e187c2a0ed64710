use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statementfinder")]
#[command(about = "Audits government service pages for published accessibility statements")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/statementfinder.toml
    #[arg(long)]
    pub init: bool,

    /// Input CSV export (overrides the [files] section of the config)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV path (overrides the [files] section of the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose logging (use -v for extra operator detail, -vv for module
    /// debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
