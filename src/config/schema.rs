//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section has defaults, so an empty file describes the stock
//! development setup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend origin used by the stock proxy table.
pub const DEFAULT_TARGET: &str = "http://localhost:8081";

/// CDN host that serves released UI bundles.
pub const DEFAULT_CDN_HOST: &str = "cdn.jianmu.run";

/// Prefixes the stock dev server forwards to the backend.
pub const DEFAULT_PREFIXES: &[&str] = &[
    "/auth",
    "/parameters",
    "/workers",
    "/sessions",
    "/secrets",
    "/task_definitions",
    "/projects",
    "/git",
    "/webhook",
    "/workflow_instances",
    "/logs",
    "/view",
    "/library",
    "/eb",
];

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevProxyConfig {
    /// Asset base path settings.
    pub base: BaseConfig,

    /// Development proxy table.
    pub proxy: ProxyTableConfig,

    /// Module resolution aliases (alias -> directory relative to the root).
    pub alias: AliasConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Base path configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Host part of the CDN URL.
    pub cdn_host: String,

    /// Build mode that switches the base path to the CDN.
    pub cdn_mode: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            cdn_host: DEFAULT_CDN_HOST.to_string(),
            cdn_mode: "cdn".to_string(),
        }
    }
}

/// Proxy table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyTableConfig {
    /// Origin used by routes that do not name their own.
    pub target: String,

    /// Header rewrite flag used by routes that do not set their own.
    pub change_origin: bool,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,
}

impl Default for ProxyTableConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            change_origin: true,
            routes: DEFAULT_PREFIXES
                .iter()
                .map(|prefix| RouteConfig::new(*prefix))
                .collect(),
        }
    }
}

/// A single forwarded prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Path prefix, e.g. `/workers`.
    pub prefix: String,

    /// Per-route origin override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Per-route header rewrite override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_origin: Option<bool>,
}

impl RouteConfig {
    /// Route that inherits the table defaults.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: None,
            change_origin: None,
        }
    }
}

/// Alias table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AliasConfig(pub BTreeMap<String, String>);

impl Default for AliasConfig {
    fn default() -> Self {
        Self(BTreeMap::from([("@".to_string(), "src".to_string())]))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: DevProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.base.cdn_host, DEFAULT_CDN_HOST);
        assert_eq!(config.proxy.target, DEFAULT_TARGET);
        assert!(config.proxy.change_origin);
        assert_eq!(config.proxy.routes.len(), DEFAULT_PREFIXES.len());
        assert_eq!(config.alias.0.get("@").map(String::as_str), Some("src"));
    }

    #[test]
    fn test_route_overrides() {
        let config: DevProxyConfig = toml::from_str(
            r#"
            [proxy]
            target = "http://10.0.0.5:8081"

            [[proxy.routes]]
            prefix = "/auth"

            [[proxy.routes]]
            prefix = "/hub"
            target = "https://hub.example.com"
            change_origin = false
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.target, "http://10.0.0.5:8081");
        assert!(config.proxy.change_origin);
        assert_eq!(config.proxy.routes[0], RouteConfig::new("/auth"));
        assert_eq!(
            config.proxy.routes[1].target.as_deref(),
            Some("https://hub.example.com")
        );
        assert_eq!(config.proxy.routes[1].change_origin, Some(false));
    }
}
