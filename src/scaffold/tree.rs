use derive_more::{From, IsVariant};
use hashlink::LinkedHashMap;

/// Key whose file list lands in the directory being walked instead of a
/// subdirectory of the same name. Only honored for [`Entry::Files`].
pub const ROOT_FILES_KEY: &str = "root_files";

/// What a single key of a [`TreeNode`] describes.
#[derive(Debug, Clone, PartialEq, Eq, From, IsVariant)]
pub enum Entry {
    /// Empty files living directly inside the directory named by the key.
    Files(Vec<String>),
    /// A subdirectory named by the key, laid out recursively.
    Directory(TreeNode),
}

impl Entry {
    pub fn files<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entry::Files(names.into_iter().map(Into::into).collect())
    }
}

/// One level of a directory layout. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    entries: LinkedHashMap<String, Entry>,
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Inserts an entry, returning the one previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(name.into(), entry.into())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of file names reachable from this node, duplicates included.
    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                Entry::Files(names) => names.len(),
                Entry::Directory(children) => children.file_count(),
            })
            .sum()
    }
}
