//! Loading a directory of schema documents.

use crate::error::SchemaGenError;
use crate::schema::SchemaNode;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File-name pattern for sibling schema documents.
pub const SCHEMA_FILE_PATTERN: &str = "*.schema.json";

/// Every parsed schema document of one generation run, keyed by file name.
///
/// Fully populated by [`SchemaRepository::load`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRepository {
    root_file_name: String,
    documents: BTreeMap<String, SchemaNode>,
}

impl SchemaRepository {
    /// Load the root schema, then every sibling `*.schema.json` in its directory.
    ///
    /// The root is loaded first and is not loaded a second time when it also
    /// matches the sibling pattern.
    ///
    /// # Errors
    ///
    /// Returns `SchemaGenError::SchemaLoad` if the root cannot be resolved or
    /// any document cannot be read or parsed.
    pub fn load(root_path: impl AsRef<Path>) -> Result<Self, SchemaGenError> {
        let root_path: PathBuf =
            root_path
                .as_ref()
                .canonicalize()
                .map_err(|e| SchemaGenError::SchemaLoad {
                    path: root_path.as_ref().to_path_buf(),
                    message: e.to_string(),
                })?;
        let root_file_name: String = file_name(&root_path)?;
        let directory: &Path = root_path.parent().ok_or_else(|| SchemaGenError::SchemaLoad {
            path: root_path.clone(),
            message: "root schema has no containing directory".to_string(),
        })?;

        let mut documents: BTreeMap<String, SchemaNode> = BTreeMap::new();
        documents.insert(root_file_name.clone(), parse_document(&root_path)?);

        for sibling in sibling_schema_files(directory)? {
            let name: String = file_name(&sibling)?;
            if name == root_file_name {
                continue;
            }
            let document: SchemaNode = parse_document(&sibling)?;
            documents.insert(name, document);
        }

        tracing::info!(
            root = %root_path.display(),
            documents = documents.len(),
            "loaded schema documents"
        );
        Ok(Self {
            root_file_name,
            documents,
        })
    }

    /// Build a repository from already-parsed documents.
    #[must_use]
    pub fn from_documents(
        root_file_name: impl Into<String>,
        documents: impl IntoIterator<Item = (String, SchemaNode)>,
    ) -> Self {
        Self {
            root_file_name: root_file_name.into(),
            documents: documents.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn root_file_name(&self) -> &str {
        &self.root_file_name
    }

    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&SchemaNode> {
        self.documents.get(file_name)
    }

    /// All documents in file-name order.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.documents
            .iter()
            .map(|(name, document)| (name.as_str(), document))
    }

    /// Documents whose root `type` is `object`; the only ones that produce a class.
    pub fn object_documents(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.documents()
            .filter(|(_, document)| document.is_object_typed())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn file_name(path: &Path) -> Result<String, SchemaGenError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SchemaGenError::SchemaLoad {
            path: path.to_path_buf(),
            message: "path has no file name".to_string(),
        })
}

fn sibling_schema_files(directory: &Path) -> Result<Vec<PathBuf>, SchemaGenError> {
    let pattern: String = format!(
        "{}/{SCHEMA_FILE_PATTERN}",
        glob::Pattern::escape(&directory.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| SchemaGenError::SchemaLoad {
        path: directory.to_path_buf(),
        message: e.to_string(),
    })?;
    entries
        .map(|entry| {
            entry.map_err(|e| SchemaGenError::SchemaLoad {
                path: e.path().to_path_buf(),
                message: e.error().to_string(),
            })
        })
        .collect()
}

/// Parse one document. Parse errors report the JSON path inside the file.
fn parse_document(path: &Path) -> Result<SchemaNode, SchemaGenError> {
    let text: String = std::fs::read_to_string(path).map_err(|e| SchemaGenError::SchemaLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let document: SchemaNode = parse_schema_str(&text, path)?;
    tracing::debug!(path = %path.display(), "parsed schema document");
    Ok(document)
}

/// Parse schema text; `path` only labels errors.
pub(crate) fn parse_schema_str(text: &str, path: &Path) -> Result<SchemaNode, SchemaGenError> {
    let deserializer = &mut serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserializer).map_err(|e| SchemaGenError::SchemaLoad {
        path: path.to_path_buf(),
        message: format!("at `{}`: {}", e.path(), e.inner()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path: PathBuf = dir.join(name);
        fs::write(&path, contents).expect("write schema file");
        path
    }

    #[test]
    fn loads_root_and_siblings() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root: PathBuf = write(
            dir.path(),
            "glTF.schema.json",
            r#"{ "title": "glTF", "type": "object" }"#,
        );
        write(
            dir.path(),
            "buffer.schema.json",
            r#"{ "title": "Buffer", "type": "object" }"#,
        );
        write(dir.path(), "glTFid.schema.json", r#"{ "type": "integer" }"#);
        write(dir.path(), "notes.json", "not json at all");

        let repository: SchemaRepository = SchemaRepository::load(&root).expect("load succeeds");

        let names: Vec<&str> = repository.documents().map(|(name, _)| name).collect();
        assert_eq!(
            vec!["buffer.schema.json", "glTF.schema.json", "glTFid.schema.json"],
            names
        );
        assert_eq!("glTF.schema.json", repository.root_file_name());
        let objects: Vec<&str> = repository.object_documents().map(|(name, _)| name).collect();
        assert_eq!(vec!["buffer.schema.json", "glTF.schema.json"], objects);
    }

    #[test]
    fn root_outside_pattern_is_still_loaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root: PathBuf = write(dir.path(), "root.json", r#"{ "type": "object" }"#);
        write(dir.path(), "a.schema.json", r#"{ "type": "object" }"#);

        let repository: SchemaRepository = SchemaRepository::load(&root).expect("load succeeds");
        assert_eq!(2, repository.len());
        assert!(repository.get("root.json").is_some());
    }

    #[test]
    fn missing_root_is_a_load_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let actual: SchemaGenError = SchemaRepository::load(dir.path().join("absent.schema.json"))
            .expect_err("missing root must fail");
        assert!(matches!(actual, SchemaGenError::SchemaLoad { .. }));
    }

    #[test]
    fn invalid_sibling_fails_the_whole_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root: PathBuf = write(dir.path(), "glTF.schema.json", r#"{ "type": "object" }"#);
        write(dir.path(), "broken.schema.json", r#"{ "type": "object", "#);

        let actual: SchemaGenError =
            SchemaRepository::load(&root).expect_err("broken sibling must fail");
        let SchemaGenError::SchemaLoad { path, .. } = actual else {
            panic!("expected a load error");
        };
        assert_eq!(Some("broken.schema.json"), path.file_name().and_then(|n| n.to_str()));
    }

    #[test]
    fn parse_error_reports_json_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root: PathBuf = write(
            dir.path(),
            "glTF.schema.json",
            r#"{ "type": "object", "properties": { "count": { "type": "integr" } } }"#,
        );

        let actual: SchemaGenError = SchemaRepository::load(&root).expect_err("unknown type name");
        let SchemaGenError::SchemaLoad { message, .. } = actual else {
            panic!("expected a load error");
        };
        assert!(
            message.starts_with("at `properties.count.type`"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn from_documents_orders_by_file_name() {
        let repository: SchemaRepository = SchemaRepository::from_documents(
            "b.schema.json",
            [
                ("b.schema.json".to_string(), SchemaNode::default()),
                ("a.schema.json".to_string(), SchemaNode::default()),
            ],
        );
        let names: Vec<&str> = repository.documents().map(|(name, _)| name).collect();
        assert_eq!(vec!["a.schema.json", "b.schema.json"], names);
        assert_eq!(0, repository.object_documents().count());
    }
}
