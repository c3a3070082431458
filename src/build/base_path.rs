//! Asset base path resolution.
//!
//! `build` in the CDN mode embeds a versioned CDN URL; every other
//! invocation serves assets from the root.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::build::{BuildCommand, BuildContext};
use crate::config::schema::BaseConfig;
use crate::package::PackageMetadata;

/// Root URL prefix embedded into build output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BasePath {
    /// `/`
    Root,
    /// `https://<host>/<name>/v<version>/`
    Cdn(String),
}

impl BasePath {
    pub fn as_str(&self) -> &str {
        match self {
            BasePath::Root => "/",
            BasePath::Cdn(url) => url,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, BasePath::Root)
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BasePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasePathError {
    #[error("package {0} is required for the CDN base path")]
    MissingMetadata(&'static str),
}

/// Resolve the base path for one build invocation.
///
/// Only `build` in `base.cdn_mode` consults the package metadata; a missing
/// name or version there fails instead of producing a malformed URL.
pub fn resolve_base_path(
    context: &BuildContext,
    base: &BaseConfig,
    package: &dyn PackageMetadata,
) -> Result<BasePath, BasePathError> {
    if context.command != BuildCommand::Build || context.mode != base.cdn_mode {
        tracing::debug!(command = %context.command, mode = %context.mode, "Using root base path");
        return Ok(BasePath::Root);
    }

    let name = package.name().ok_or(BasePathError::MissingMetadata("name"))?;
    let version = package.version().ok_or(BasePathError::MissingMetadata("version"))?;
    let url = format!("https://{}/{}/v{}/", base.cdn_host, name, version);

    tracing::debug!(base = %url, "Using CDN base path");
    Ok(BasePath::Cdn(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageJson;

    fn foo() -> PackageJson {
        PackageJson::new("foo", "1.2.3")
    }

    #[test]
    fn test_cdn_build() {
        let ctx = BuildContext::build("cdn");
        let base = resolve_base_path(&ctx, &BaseConfig::default(), &foo()).unwrap();
        assert_eq!(base, BasePath::Cdn("https://cdn.jianmu.run/foo/v1.2.3/".into()));
        assert_eq!(base.as_str(), "https://cdn.jianmu.run/foo/v1.2.3/");
    }

    #[test]
    fn test_everything_else_is_root() {
        let contexts = [
            BuildContext::serve(),
            BuildContext::new(BuildCommand::Serve, "cdn"),
            BuildContext::build("production"),
            BuildContext::build("development"),
            BuildContext::build("CDN"),
            BuildContext::build(""),
        ];
        for context in &contexts {
            let base = resolve_base_path(context, &BaseConfig::default(), &foo()).unwrap();
            assert_eq!(base, BasePath::Root, "{context:?}");
            assert_eq!(base.to_string(), "/");
        }
    }

    #[test]
    fn test_root_ignores_missing_metadata() {
        let ctx = BuildContext::serve();
        let package = PackageJson::default();
        let base = resolve_base_path(&ctx, &BaseConfig::default(), &package).unwrap();
        assert!(base.is_root());
    }

    #[test]
    fn test_cdn_requires_metadata() {
        let ctx = BuildContext::build("cdn");
        let err =
            resolve_base_path(&ctx, &BaseConfig::default(), &PackageJson::default()).unwrap_err();
        assert_eq!(err, BasePathError::MissingMetadata("name"));

        let no_version = PackageJson::parse(r#"{"name":"foo"}"#).unwrap();
        let err = resolve_base_path(&ctx, &BaseConfig::default(), &no_version).unwrap_err();
        assert_eq!(err, BasePathError::MissingMetadata("version"));
    }

    #[test]
    fn test_custom_cdn_settings() {
        let base = BaseConfig {
            cdn_host: "static.example.com".into(),
            cdn_mode: "release".into(),
        };
        let resolved = resolve_base_path(&BuildContext::build("release"), &base, &foo()).unwrap();
        assert_eq!(resolved.as_str(), "https://static.example.com/foo/v1.2.3/");

        let resolved = resolve_base_path(&BuildContext::build("cdn"), &base, &foo()).unwrap();
        assert!(resolved.is_root());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let ctx = BuildContext::build("cdn");
        let first = resolve_base_path(&ctx, &BaseConfig::default(), &foo()).unwrap();
        let second = resolve_base_path(&ctx, &BaseConfig::default(), &foo()).unwrap();
        assert_eq!(first, second);
    }
}
