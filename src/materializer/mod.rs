//! Turns a [`TreeNode`](crate::scaffold::TreeNode) into directories and empty
//! files below a base directory.

mod filesystem;
mod materializer;

pub use filesystem::{DiskFilesystem, DryRunFilesystem, PlannedAction, ScaffoldFilesystem};
pub use materializer::{MaterializeError, MaterializeSummary, Materializer, materialize};
