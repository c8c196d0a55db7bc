//! Loading of Terraform configuration directories into a [`ConfigTree`].

pub mod convert;
mod error;

pub use error::LoadError;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::record::Record;

const TERRAFORM_EXTENSION: &str = "tf";

/// Block-type name to the records of that type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    blocks: BTreeMap<String, Vec<Record>>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block_type: impl Into<String>, record: Record) {
        self.blocks.entry(block_type.into()).or_default().push(record);
    }

    pub fn get(&self, block_type: &str) -> Option<&[Record]> {
        self.blocks.get(block_type).map(Vec::as_slice)
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.blocks.contains_key(block_type)
    }

    pub fn block_types(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of top-level blocks.
    pub fn len(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Loads a single `.tf` file or every `.tf` file of a directory
/// (non-recursive, in file-name order).
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigTree, LoadError> {
    let path = path.as_ref();
    let files = terraform_files(path)?;

    if files.is_empty() {
        return Err(LoadError::NoConfiguration {
            path: path.to_path_buf(),
        });
    }

    let mut tree = ConfigTree::new();
    for file in &files {
        load_file(&mut tree, file)?;
    }

    tracing::info!(
        path = %path.display(),
        files = files.len(),
        blocks = tree.len(),
        "configuration loaded"
    );

    Ok(tree)
}

/// Parses HCL source and appends its blocks to `tree`.
pub fn load_str(tree: &mut ConfigTree, source: &str, file: &Path) -> Result<(), LoadError> {
    let body = hcl::parse(source).map_err(|source| LoadError::Parse {
        path: file.to_path_buf(),
        source,
    })?;

    for attribute in body.attributes() {
        tracing::warn!(
            file = %file.display(),
            key = attribute.key(),
            "top-level attribute ignored"
        );
    }

    for block in body.blocks() {
        let (block_type, record) = convert::block(block, file);
        tracing::debug!(block_type = %block_type, path = ?record.path(), "block loaded");
        tree.push(block_type, record);
    }

    Ok(())
}

fn load_file(tree: &mut ConfigTree, file: &Path) -> Result<(), LoadError> {
    let source = fs::read_to_string(file).map_err(|source| LoadError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    load_str(tree, &source, file)
}

fn terraform_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_err)?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry_path = entry.map_err(io_err)?.path();
        let is_tf = entry_path
            .extension()
            .is_some_and(|ext| ext == TERRAFORM_EXTENSION);
        if is_tf && entry_path.is_file() {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_load_str_groups_blocks_by_type() {
        let mut tree = ConfigTree::new();
        load_str(
            &mut tree,
            r#"
resource "aws_instance" "a" {
  ami = "ami-1"
}

resource "aws_instance" "b" {
  ami = "ami-2"
}

output "url" {
  value = aws_instance.a.public_ip
}
"#,
            Path::new("main.tf"),
        )
        .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.block_types().collect::<Vec<_>>(), ["aws_instance", "output"]);

        let instances = tree.get("aws_instance").unwrap();
        assert_eq!(instances[0].path(), Some("aws_instance.a"));
        assert_eq!(instances[1].path(), Some("aws_instance.b"));
        assert_eq!(instances[1].get("ami"), Some(&Value::from("ami-2")));
    }

    #[test]
    fn test_load_str_skips_top_level_attributes() {
        let mut tree = ConfigTree::new();
        load_str(&mut tree, "region = \"us-east-1\"\n", Path::new("vars.tf")).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_load_str_parse_error_names_file() {
        let mut tree = ConfigTree::new();
        let err = load_str(&mut tree, "resource \"aws_instance\" {", Path::new("broken.tf"))
            .unwrap_err();

        match err {
            LoadError::Parse { path, .. } => assert_eq!(path, Path::new("broken.tf")),
            other => panic!("expected LoadError::Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_block_type() {
        let tree = ConfigTree::new();
        assert!(tree.get("aws_instance").is_none());
        assert!(!tree.contains("aws_instance"));
    }
}
