use std::path::PathBuf;

use crate::{cli::Cli, scaffold::ScaffoldSource};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: ScaffoldSource,
    pub root: PathBuf,
    pub dry_run: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.config.into(),
            root: cli.root,
            dry_run: cli.dry_run,
        }
    }
}
