use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use compio::fs;
use derive_more::Display;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::{
    ext::BestEffortPathExt,
    scaffold::{Entry, TreeNode},
};

const STRUCTURE_KEY: &str = "structure";
const EMBEDDED_SCAFFOLD: &str = include_str!("default_scaffold.yaml");

/// Where the layout to materialize comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
pub enum ScaffoldSource {
    #[default]
    #[display("built-in scaffold")]
    Embedded,
    #[display("{}", _0.display())]
    File(PathBuf),
}

impl ScaffoldSource {
    pub async fn load(&self) -> Result<Scaffold, ScaffoldLoadError> {
        match self {
            ScaffoldSource::Embedded => Scaffold::embedded(),
            ScaffoldSource::File(path) => Scaffold::from_path(path).await,
        }
    }
}

impl From<Option<PathBuf>> for ScaffoldSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(ScaffoldSource::Embedded, ScaffoldSource::File)
    }
}

/// A validated layout description, read from the `structure` section of a
/// YAML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    tree: TreeNode,
}

impl Scaffold {
    pub fn embedded() -> Result<Self, ScaffoldLoadError> {
        EMBEDDED_SCAFFOLD.try_into()
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ScaffoldLoadError> {
        let path = path.as_ref();
        debug!("Reading scaffold file: {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read scaffold file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(InvalidUtf8Snafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    fn parse_tree(
        mapping: &LinkedHashMap<Yaml, Yaml>,
        key_path: &str,
    ) -> Result<TreeNode, ScaffoldLoadError> {
        mapping
            .iter()
            .try_fold(TreeNode::new(), |mut node, (key, value)| -> Result<_, ScaffoldLoadError> {
                let name = key.as_str().context(NonStringKeySnafu {
                    key_path,
                    key: format!("{key:?}"),
                })?;
                let entry = Self::parse_entry(value, &format!("{key_path}/{name}"))?;
                node.insert(name, entry);
                Ok(node)
            })
    }

    fn parse_entry(value: &Yaml, key_path: &str) -> Result<Entry, ScaffoldLoadError> {
        match value {
            Yaml::Mapping(children) => Self::parse_tree(children, key_path).map(Entry::Directory),
            Yaml::Sequence(names) => names
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    name.as_str()
                        .map(str::to_owned)
                        .context(NonStringFileNameSnafu { key_path, index })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Entry::Files),
            other => InvalidEntrySnafu {
                key_path,
                found: describe_yaml(other),
            }
            .fail(),
        }
    }
}

impl TryFrom<&str> for Scaffold {
    type Error = ScaffoldLoadError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedDocumentSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let tree = match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(STRUCTURE_KEY)))) {
            Some(section) => {
                let mapping = section.as_mapping().context(StructureNotMapSnafu)?;
                Self::parse_tree(mapping, STRUCTURE_KEY)?
            }
            None => {
                debug!("No '{STRUCTURE_KEY}' section found, using an empty layout");
                TreeNode::new()
            }
        };

        Ok(Scaffold { tree })
    }
}

fn describe_yaml(value: &Yaml) -> &'static str {
    match value {
        Yaml::Value(Scalar::Null) => "null",
        Yaml::Value(Scalar::Boolean(_)) => "boolean",
        Yaml::Value(Scalar::Integer(_)) | Yaml::Value(Scalar::FloatingPoint(_)) => "number",
        Yaml::Value(Scalar::String(_)) => "string",
        Yaml::Alias(_) => "alias",
        _ => "unsupported value",
    }
}

#[derive(Debug, Snafu)]
pub enum ScaffoldLoadError {
    #[snafu(display("Failed to read the scaffold file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Scaffold file {} is not valid UTF-8", file_path))]
    InvalidUtf8Error {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the scaffold file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Scaffold file contains no YAML document"))]
    MalformedDocumentError,
    #[snafu(display("Top level of the scaffold should be a map"))]
    TopLevelNotMapError,
    #[snafu(display("The '{}' section should be a map", STRUCTURE_KEY))]
    StructureNotMapError,
    #[snafu(display("Key {} under '{}' is not a string", key, key_path))]
    NonStringKeyError { key_path: String, key: String },
    #[snafu(display(
        "'{}' should be a list of file names or a map of subdirectories, found {}",
        key_path,
        found
    ))]
    InvalidEntryError {
        key_path: String,
        found: &'static str,
    },
    #[snafu(display("File name #{} in '{}' is not a string", index, key_path))]
    NonStringFileNameError { key_path: String, index: usize },
}
