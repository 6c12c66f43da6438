use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use derive_more::Display;
use snafu::prelude::*;
use tracing::debug;

use crate::{
    ext::BestEffortPathExt,
    materializer::{DiskFilesystem, ScaffoldFilesystem},
    scaffold::{Entry, ROOT_FILES_KEY, TreeNode},
};

/// Materializes `node` under `base` on the real filesystem.
pub fn materialize(base: &Path, node: &TreeNode) -> Result<MaterializeSummary, MaterializeError> {
    Materializer::new(&DiskFilesystem).materialize(base, node)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("{directories} directories, {files} files")]
pub struct MaterializeSummary {
    pub directories: usize,
    pub files: usize,
}

/// Depth-first, pre-order walk of a [`TreeNode`] that creates every directory
/// it names and leaves every listed file empty.
///
/// `base` must already exist; only the entries below it are created. The
/// first failing operation aborts the walk and everything created before it
/// stays on disk.
pub struct Materializer<'fs, F: ScaffoldFilesystem + ?Sized> {
    filesystem: &'fs F,
}

impl<'fs, F: ScaffoldFilesystem + ?Sized> Materializer<'fs, F> {
    pub fn new(filesystem: &'fs F) -> Self {
        Self { filesystem }
    }

    pub fn materialize(
        &self,
        base: &Path,
        node: &TreeNode,
    ) -> Result<MaterializeSummary, MaterializeError> {
        let mut summary = MaterializeSummary::default();
        self.materialize_into(base, node, &mut summary)?;
        Ok(summary)
    }

    fn materialize_into(
        &self,
        base: &Path,
        node: &TreeNode,
        summary: &mut MaterializeSummary,
    ) -> Result<(), MaterializeError> {
        for (name, entry) in node.iter() {
            match entry {
                Entry::Files(files) => {
                    let target: Cow<Path> = if name == ROOT_FILES_KEY {
                        Cow::Borrowed(base)
                    } else {
                        let dir = base.join(name);
                        self.create_directory(&dir, summary)?;
                        Cow::Owned(dir)
                    };
                    for file in files {
                        self.truncate_file(&target.join(file), summary)?;
                    }
                }
                Entry::Directory(children) => {
                    let dir = base.join(name);
                    self.create_directory(&dir, summary)?;
                    self.materialize_into(&dir, children, summary)?;
                }
            }
        }
        Ok(())
    }

    fn create_directory(
        &self,
        path: &Path,
        summary: &mut MaterializeSummary,
    ) -> Result<(), MaterializeError> {
        debug!("Creating directory {}", path.display());
        self.filesystem
            .create_dir_all(path)
            .context(CreateDirectorySnafu { path })?;
        summary.directories += 1;
        Ok(())
    }

    fn truncate_file(
        &self,
        path: &Path,
        summary: &mut MaterializeSummary,
    ) -> Result<(), MaterializeError> {
        debug!("Truncating file {}", path.display());
        self.filesystem
            .truncate_file(path)
            .context(CreateFileSnafu { path })?;
        summary.files += 1;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create file {}", path.best_effort_path_display()))]
    CreateFileError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, fs};

    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::materializer::{DryRunFilesystem, PlannedAction};

    #[fixture]
    fn base() -> TempDir {
        TempDir::new().expect("Failed to create temp directory")
    }

    fn is_empty_file(path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() == 0)
    }

    fn dir_names(path: &Path) -> BTreeSet<String> {
        fs::read_dir(path)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn nested_tree() -> TreeNode {
        TreeNode::new()
            .with_entry("public", Entry::files(["robots.txt", "placeholder.svg"]))
            .with_entry(
                "src",
                TreeNode::new()
                    .with_entry("lib", Entry::files(["utils.ts"]))
                    .with_entry(ROOT_FILES_KEY, Entry::files(["main.tsx"])),
            )
            .with_entry(ROOT_FILES_KEY, Entry::files(["README.md"]))
    }

    #[rstest]
    fn leaf_group_creates_directory_with_empty_files(base: TempDir) {
        let tree = TreeNode::new().with_entry("public", Entry::files(["robots.txt"]));

        let summary = materialize(base.path(), &tree).unwrap();

        assert!(base.path().join("public").is_dir());
        assert!(is_empty_file(&base.path().join("public/robots.txt")));
        assert_eq!(
            summary,
            MaterializeSummary {
                directories: 1,
                files: 1
            }
        );
    }

    #[rstest]
    fn root_files_land_in_the_current_directory(base: TempDir) {
        let tree = TreeNode::new().with_entry(ROOT_FILES_KEY, Entry::files(["README.md"]));

        materialize(base.path(), &tree).unwrap();

        assert!(is_empty_file(&base.path().join("README.md")));
        assert!(!base.path().join(ROOT_FILES_KEY).exists());
    }

    #[rstest]
    fn nested_root_files_land_in_their_parent(base: TempDir) {
        materialize(base.path(), &nested_tree()).unwrap();

        assert!(is_empty_file(&base.path().join("src/main.tsx")));
        assert!(!base.path().join("src").join(ROOT_FILES_KEY).exists());
        assert_eq!(
            dir_names(&base.path().join("src")),
            BTreeSet::from(["lib".to_string(), "main.tsx".to_string()])
        );
    }

    #[rstest]
    fn root_files_key_with_subtree_is_a_real_directory(base: TempDir) {
        let tree = TreeNode::new().with_entry(
            ROOT_FILES_KEY,
            TreeNode::new().with_entry("docs", Entry::files(["guide.md"])),
        );

        materialize(base.path(), &tree).unwrap();

        assert!(base.path().join(ROOT_FILES_KEY).is_dir());
        assert!(is_empty_file(
            &base.path().join(ROOT_FILES_KEY).join("docs/guide.md")
        ));
    }

    #[rstest]
    fn deeply_nested_subtrees_create_every_intermediate_directory(base: TempDir) {
        let tree = TreeNode::new().with_entry(
            "src",
            TreeNode::new().with_entry(
                "components",
                TreeNode::new().with_entry("ui", Entry::files(["button.tsx", "card.tsx"])),
            ),
        );

        let summary = materialize(base.path(), &tree).unwrap();

        assert!(base.path().join("src").is_dir());
        assert!(base.path().join("src/components").is_dir());
        assert!(base.path().join("src/components/ui").is_dir());
        assert!(is_empty_file(&base.path().join("src/components/ui/button.tsx")));
        assert!(is_empty_file(&base.path().join("src/components/ui/card.tsx")));
        assert_eq!(summary.directories, 3);
        assert_eq!(summary.files, 2);
    }

    #[rstest]
    fn leaf_group_creates_exactly_the_listed_files(base: TempDir) {
        materialize(base.path(), &nested_tree()).unwrap();

        assert_eq!(
            dir_names(&base.path().join("public")),
            BTreeSet::from(["placeholder.svg".to_string(), "robots.txt".to_string()])
        );
        assert_eq!(
            dir_names(base.path()),
            BTreeSet::from([
                "README.md".to_string(),
                "public".to_string(),
                "src".to_string()
            ])
        );
    }

    #[rstest]
    fn empty_groups_and_subtrees_produce_bare_directories(base: TempDir) {
        let tree = TreeNode::new()
            .with_entry("assets", Entry::Files(vec![]))
            .with_entry("src", TreeNode::new());

        let summary = materialize(base.path(), &tree).unwrap();

        assert!(base.path().join("assets").is_dir());
        assert!(base.path().join("src").is_dir());
        assert!(dir_names(&base.path().join("assets")).is_empty());
        assert!(dir_names(&base.path().join("src")).is_empty());
        assert_eq!(summary.files, 0);
    }

    #[rstest]
    fn rerun_keeps_directories_and_unrelated_contents(base: TempDir) {
        let tree = nested_tree();
        materialize(base.path(), &tree).unwrap();
        fs::write(base.path().join("src/lib/extra.ts"), "keep me").unwrap();

        materialize(base.path(), &tree).unwrap();

        assert!(base.path().join("src/lib").is_dir());
        assert_eq!(
            fs::read_to_string(base.path().join("src/lib/extra.ts")).unwrap(),
            "keep me"
        );
    }

    #[rstest]
    fn rerun_truncates_existing_files(base: TempDir) {
        let tree = nested_tree();
        materialize(base.path(), &tree).unwrap();
        fs::write(base.path().join("README.md"), "# Project").unwrap();
        fs::write(base.path().join("src/lib/utils.ts"), "export {}").unwrap();

        materialize(base.path(), &tree).unwrap();

        assert!(is_empty_file(&base.path().join("README.md")));
        assert!(is_empty_file(&base.path().join("src/lib/utils.ts")));
    }

    #[rstest]
    fn duplicate_file_names_are_harmless(base: TempDir) {
        let tree = TreeNode::new().with_entry("lib", Entry::files(["a.ts", "a.ts"]));

        let summary = materialize(base.path(), &tree).unwrap();

        assert!(is_empty_file(&base.path().join("lib/a.ts")));
        assert_eq!(summary.files, 2);
    }

    #[rstest]
    fn file_in_place_of_directory_aborts_the_run(base: TempDir) {
        fs::write(base.path().join("src"), "not a directory").unwrap();
        let tree = TreeNode::new()
            .with_entry("public", Entry::files(["robots.txt"]))
            .with_entry("src", TreeNode::new().with_entry("lib", Entry::files(["a.ts"])))
            .with_entry("later", Entry::files(["never.txt"]));

        let result = materialize(base.path(), &tree);

        match result {
            Err(MaterializeError::CreateDirectoryError { path, .. }) => {
                assert_eq!(path, base.path().join("src"));
            }
            other => panic!("Expected CreateDirectoryError, got {other:?}"),
        }
        assert!(is_empty_file(&base.path().join("public/robots.txt")));
        assert!(!base.path().join("later").exists());
    }

    #[rstest]
    fn directory_in_place_of_file_aborts_the_run(base: TempDir) {
        fs::create_dir_all(base.path().join("public/robots.txt")).unwrap();
        let tree = TreeNode::new().with_entry("public", Entry::files(["robots.txt"]));

        let result = materialize(base.path(), &tree);

        assert!(matches!(
            result,
            Err(MaterializeError::CreateFileError { .. })
        ));
    }

    #[test]
    fn walk_is_depth_first_pre_order() {
        let filesystem = DryRunFilesystem::default();
        let base = Path::new("/proj");

        Materializer::new(&filesystem)
            .materialize(base, &nested_tree())
            .unwrap();

        assert_eq!(
            filesystem.into_actions(),
            vec![
                PlannedAction::CreateDirectory(base.join("public")),
                PlannedAction::TruncateFile(base.join("public/robots.txt")),
                PlannedAction::TruncateFile(base.join("public/placeholder.svg")),
                PlannedAction::CreateDirectory(base.join("src")),
                PlannedAction::CreateDirectory(base.join("src/lib")),
                PlannedAction::TruncateFile(base.join("src/lib/utils.ts")),
                PlannedAction::TruncateFile(base.join("src/main.tsx")),
                PlannedAction::TruncateFile(base.join("README.md")),
            ]
        );
    }

    #[rstest]
    fn dry_run_leaves_the_disk_untouched(base: TempDir) {
        let filesystem = DryRunFilesystem::default();

        let summary = Materializer::new(&filesystem)
            .materialize(base.path(), &nested_tree())
            .unwrap();

        assert!(dir_names(base.path()).is_empty());
        assert_eq!(summary.to_string(), "3 directories, 5 files");
    }
}
