use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Materialize a declarative directory and file layout on disk.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML scaffold to materialize. The built-in project layout is used when omitted
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// The directory the layout is created in
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Print the planned operations without touching the disk
    #[clap(long, short = 'n')]
    pub dry_run: bool,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
