use std::{
    cell::RefCell,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use derive_more::Display;

/// The two filesystem operations a layout is built from.
pub trait ScaffoldFilesystem {
    /// Creates `path` and any missing parents. Succeeds if it already exists
    /// as a directory.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    /// Leaves an empty regular file at `path`, discarding prior contents.
    fn truncate_file(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFilesystem;

impl ScaffoldFilesystem for DiskFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn truncate_file(&self, path: &Path) -> io::Result<()> {
        File::create(path).map(drop)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PlannedAction {
    #[display("create directory {}", _0.display())]
    CreateDirectory(PathBuf),
    #[display("truncate file      {}", _0.display())]
    TruncateFile(PathBuf),
}

/// Records operations instead of performing them.
#[derive(Debug, Default)]
pub struct DryRunFilesystem {
    actions: RefCell<Vec<PlannedAction>>,
}

impl DryRunFilesystem {
    pub fn into_actions(self) -> Vec<PlannedAction> {
        self.actions.into_inner()
    }
}

impl ScaffoldFilesystem for DryRunFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.actions
            .borrow_mut()
            .push(PlannedAction::CreateDirectory(path.to_path_buf()));
        Ok(())
    }

    fn truncate_file(&self, path: &Path) -> io::Result<()> {
        self.actions
            .borrow_mut()
            .push(PlannedAction::TruncateFile(path.to_path_buf()));
        Ok(())
    }
}
