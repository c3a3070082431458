//! Package metadata (name and version) for the CDN base path.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Read-only source of package name and version.
pub trait PackageMetadata {
    fn name(&self) -> Option<&str>;
    fn version(&self) -> Option<&str>;
}

/// Error reading a package descriptor.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The fields of `package.json` the build configuration reads.
///
/// Missing or non-string fields are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PackageJson {
    #[serde(default, deserialize_with = "string_or_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    version: Option<String>,
}

impl PackageJson {
    /// Metadata with the given fields, without touching the filesystem.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
        }
    }

    /// Read and parse a `package.json` file.
    pub fn load(path: &Path) -> Result<Self, PackageError> {
        let content = fs::read_to_string(path).map_err(|source| PackageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let package = Self::parse(&content).map_err(|source| PackageError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            name = ?package.name,
            version = ?package.version,
            "Package metadata loaded"
        );
        Ok(package)
    }

    /// Parse `package.json` content.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

impl PackageMetadata for PackageJson {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_package_json() {
        let package = PackageJson::parse(
            r#"{
                "name": "jianmu-ui",
                "version": "2.4.1",
                "private": true,
                "scripts": { "build": "vite build" }
            }"#,
        )
        .unwrap();
        assert_eq!(package.name(), Some("jianmu-ui"));
        assert_eq!(package.version(), Some("2.4.1"));
    }

    #[test]
    fn test_missing_or_blank_fields() {
        let package = PackageJson::parse(r#"{ "name": "", "version": 3 }"#).unwrap();
        assert_eq!(package.name(), None);
        assert_eq!(package.version(), None);

        let package = PackageJson::parse("{}").unwrap();
        assert_eq!(package, PackageJson::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"name":"foo","version":"1.2.3"}"#).unwrap();

        let package = PackageJson::load(&path).unwrap();
        assert_eq!(package, PackageJson::new("foo", "1.2.3"));
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("package.json");
        assert!(matches!(PackageJson::load(&missing), Err(PackageError::Io { .. })));

        fs::write(&missing, "not json").unwrap();
        assert!(matches!(PackageJson::load(&missing), Err(PackageError::Parse { .. })));
    }
}
