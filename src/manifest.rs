//! `package.json` reading.
//!
//! Only the `dependencies` and `devDependencies` sections are read. Key order
//! from the file is preserved so scan output follows the manifest.

use crate::error::ManifestError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl Manifest {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Runtime and development dependencies merged into one mapping.
    ///
    /// A name declared in both sections keeps its runtime position and takes
    /// the development version constraint.
    pub fn combined_dependencies(&self) -> IndexMap<String, String> {
        let mut combined = self.dependencies.clone();
        for (name, constraint) in &self.dev_dependencies {
            combined.insert(name.clone(), constraint.clone());
        }
        combined
    }

    pub fn dependency_names(&self) -> Vec<String> {
        self.combined_dependencies().into_keys().collect()
    }
}

/// Reads and parses the manifest at `path`.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Manifest::from_json(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_combined_names_keep_file_order() {
        let manifest = Manifest::from_json(
            r#"{
                "name": "demo",
                "dependencies": { "react": "^18.2.0", "left-pad": "1.0.0" },
                "devDependencies": { "typescript": "^5.0.0", "eslint": "^8.0.0" }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("demo"));
        assert_eq!(
            manifest.dependency_names(),
            vec!["react", "left-pad", "typescript", "eslint"]
        );
    }

    #[test]
    fn test_duplicate_collapses_and_dev_wins() {
        let manifest = Manifest::from_json(
            r#"{
                "dependencies": { "lodash": "^4.0.0", "react": "^18.0.0" },
                "devDependencies": { "lodash": "4.17.21", "jest": "^29.0.0" }
            }"#,
        )
        .unwrap();

        let combined = manifest.combined_dependencies();
        assert_eq!(combined.len(), 3);
        assert_eq!(combined["lodash"], "4.17.21");
        assert_eq!(manifest.dependency_names(), vec!["lodash", "react", "jest"]);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let manifest = Manifest::from_json(r#"{ "name": "bare" }"#).unwrap();
        assert!(manifest.dependency_names().is_empty());
    }

    #[test]
    fn test_read_manifest_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dependencies": {{ "@types/node": "^20.0.0" }} }}"#).unwrap();

        let manifest = read_manifest(file.path()).unwrap();
        assert_eq!(manifest.dependency_names(), vec!["@types/node"]);
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");

        let err = read_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(p) if p == path));
    }

    #[test]
    fn test_read_manifest_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_manifest(file.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }
}
