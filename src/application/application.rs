use std::path::{Path, PathBuf};

use colored::Colorize;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    application::RuntimeConfig,
    ext::BestEffortPathExt,
    materializer::{
        DryRunFilesystem, MaterializeError, MaterializeSummary, Materializer, materialize,
    },
    scaffold::ScaffoldLoadError,
};

pub struct Application;

impl Application {
    pub async fn run(
        runtime_config: impl Into<RuntimeConfig>,
    ) -> Result<MaterializeSummary, ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        info!("Loading scaffold from {}", runtime_config.source);
        let scaffold = runtime_config
            .source
            .load()
            .await
            .context(ScaffoldLoadSnafu)?;
        debug!(
            "Loaded scaffold with {} top-level entries and {} files",
            scaffold.tree().len(),
            scaffold.tree().file_count()
        );

        if scaffold.tree().is_empty() {
            warn!("Scaffold has no entries, nothing will be created");
        }

        let base = Self::resolve_root(&runtime_config.root)?;
        info!("Materializing scaffold under {}", base.display());

        let summary = if runtime_config.dry_run {
            let filesystem = DryRunFilesystem::default();
            let summary = Materializer::new(&filesystem)
                .materialize(&base, scaffold.tree())
                .context(MaterializeSnafu)?;
            for action in filesystem.into_actions() {
                println!("{action}");
            }
            println!(
                "{}",
                format!("Dry run complete, nothing was written ({summary})").yellow()
            );
            summary
        } else {
            let summary = materialize(&base, scaffold.tree()).context(MaterializeSnafu)?;
            println!(
                "{} ({summary})",
                "✅ Folder and file structure created successfully!"
                    .green()
                    .bold()
            );
            summary
        };
        info!("Materialized {summary}");

        Ok(summary)
    }

    fn resolve_root(root: &Path) -> Result<PathBuf, ApplicationError> {
        let base = root.canonicalize().context(RootResolutionSnafu {
            root: root.best_effort_path_display(),
        })?;
        ensure!(
            base.is_dir(),
            RootNotDirectorySnafu {
                root: base.display().to_string(),
            }
        );
        Ok(base)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the scaffold"))]
    ScaffoldLoadError { source: ScaffoldLoadError },
    #[snafu(display("Cannot resolve the root directory {}", root))]
    RootResolutionError {
        root: String,
        source: std::io::Error,
    },
    #[snafu(display("The root {} is not a directory", root))]
    RootNotDirectoryError { root: String },
    #[snafu(display("Critical failure encountered while materializing the scaffold"))]
    MaterializeError { source: MaterializeError },
}
