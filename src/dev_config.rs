//! The resolved configuration handed to the build tool.
//!
//! Built once per invocation from the build context, the file
//! configuration and the package metadata. Immutable afterwards; share it
//! by reference (or `Arc`) with whatever serves requests.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::alias::AliasTable;
use crate::build::{resolve_base_path, BasePath, BasePathError, BuildContext};
use crate::config::schema::DevProxyConfig;
use crate::package::PackageMetadata;
use crate::routing::{RoutingError, RoutingTable};

#[derive(Debug, Error)]
pub enum DevConfigError {
    #[error(transparent)]
    BasePath(#[from] BasePathError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// Base path, proxy table and aliases for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevConfig {
    base_path: BasePath,
    proxy_routes: RoutingTable,
    alias: AliasTable,
}

impl DevConfig {
    /// Resolve everything the build tool needs for `context`.
    pub fn resolve(
        context: &BuildContext,
        config: &DevProxyConfig,
        package: &dyn PackageMetadata,
        root: &Path,
    ) -> Result<Self, DevConfigError> {
        let base_path = resolve_base_path(context, &config.base, package)?;
        let proxy_routes = RoutingTable::from_config(&config.proxy)?;
        let alias = AliasTable::from_config(&config.alias, root);

        tracing::info!(
            command = %context.command,
            mode = %context.mode,
            base = %base_path,
            route_count = proxy_routes.len(),
            "Build configuration resolved"
        );

        Ok(Self {
            base_path,
            proxy_routes,
            alias,
        })
    }

    pub fn base_path(&self) -> &BasePath {
        &self.base_path
    }

    pub fn proxy_routes(&self) -> &RoutingTable {
        &self.proxy_routes
    }

    pub fn alias(&self) -> &AliasTable {
        &self.alias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageJson;

    #[test]
    fn test_resolve_default_serve() {
        let config = DevConfig::resolve(
            &BuildContext::serve(),
            &DevProxyConfig::default(),
            &PackageJson::default(),
            Path::new("/ui"),
        )
        .unwrap();

        assert!(config.base_path().is_root());
        assert_eq!(config.proxy_routes().len(), 14);
        assert!(config.proxy_routes().match_path("/workers/123").is_some());
        assert_eq!(config.alias().get("@"), Some(Path::new("/ui/src")));
    }

    #[test]
    fn test_cdn_without_metadata_fails() {
        let err = DevConfig::resolve(
            &BuildContext::build("cdn"),
            &DevProxyConfig::default(),
            &PackageJson::default(),
            Path::new("/ui"),
        )
        .unwrap_err();
        assert!(matches!(err, DevConfigError::BasePath(BasePathError::MissingMetadata("name"))));
    }

    #[test]
    fn test_json_shape() {
        let config = DevConfig::resolve(
            &BuildContext::build("cdn"),
            &DevProxyConfig::default(),
            &PackageJson::new("jianmu-ui", "2.0.0"),
            Path::new("/ui"),
        )
        .unwrap();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["basePath"], "https://cdn.jianmu.run/jianmu-ui/v2.0.0/");
        assert_eq!(json["proxyRoutes"].as_array().unwrap().len(), 14);
        assert_eq!(json["proxyRoutes"][0]["prefix"], "/auth");
        assert_eq!(json["proxyRoutes"][0]["targetOrigin"], "http://localhost:8081");
        assert_eq!(json["proxyRoutes"][0]["rewriteOriginHeader"], true);
        assert_eq!(json["alias"]["@"], "/ui/src");
    }
}
