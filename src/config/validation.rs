//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate prefixes and target origins of every route
//! - Detect duplicate and ambiguous prefixes
//! - Check CDN settings, aliases and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DevProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::BTreeSet;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::DevProxyConfig;
use crate::routing::error::RoutingError;
use crate::routing::rule::{check_prefix, parse_target};
use crate::routing::table::ambiguous_pairs;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("proxy.routes[{index}]: {source}")]
    Route {
        index: usize,
        #[source]
        source: RoutingError,
    },

    #[error("proxy: {0}")]
    Table(RoutingError),

    #[error("base.{field}: {reason}")]
    Base { field: &'static str, reason: &'static str },

    #[error("alias {alias:?}: {reason}")]
    Alias { alias: String, reason: &'static str },

    #[error("observability.log_level: unknown level {0:?}")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DevProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_base(config, &mut errors);
    validate_routes(config, &mut errors);
    validate_aliases(config, &mut errors);

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            tracing::warn!(%error, "Invalid configuration");
        }
        Err(errors)
    }
}

fn validate_base(config: &DevProxyConfig, errors: &mut Vec<ValidationError>) {
    let host = config.base.cdn_host.as_str();
    let reason = if host.is_empty() {
        Some("must not be empty")
    } else if host.contains("://") {
        Some("must be a host name without scheme")
    } else if host.contains(['/', '?', '#']) || host.chars().any(char::is_whitespace) {
        Some("must be a bare host name")
    } else {
        None
    };
    if let Some(reason) = reason {
        errors.push(ValidationError::Base {
            field: "cdn_host",
            reason,
        });
    }

    if config.base.cdn_mode.trim().is_empty() {
        errors.push(ValidationError::Base {
            field: "cdn_mode",
            reason: "must not be empty",
        });
    }
}

fn validate_routes(config: &DevProxyConfig, errors: &mut Vec<ValidationError>) {
    let table = &config.proxy;
    let mut seen = BTreeSet::new();

    for (index, route) in table.routes.iter().enumerate() {
        if let Err(source) = check_prefix(&route.prefix) {
            errors.push(ValidationError::Route { index, source });
            continue;
        }

        let target = route.target.as_deref().unwrap_or(&table.target);
        if let Err(reason) = parse_target(target) {
            errors.push(ValidationError::Route {
                index,
                source: RoutingError::InvalidTarget {
                    prefix: route.prefix.clone(),
                    target: target.to_string(),
                    reason: reason.to_string(),
                },
            });
        }

        if !seen.insert(route.prefix.as_str()) {
            errors.push(ValidationError::Route {
                index,
                source: RoutingError::DuplicatePrefix(route.prefix.clone()),
            });
        }
    }

    for (shorter, longer) in ambiguous_pairs(seen) {
        errors.push(ValidationError::Table(RoutingError::AmbiguousPrefix { shorter, longer }));
    }
}

fn validate_aliases(config: &DevProxyConfig, errors: &mut Vec<ValidationError>) {
    for (alias, dir) in &config.alias.0 {
        if alias.is_empty() || alias.ends_with('/') {
            errors.push(ValidationError::Alias {
                alias: alias.clone(),
                reason: "key must be non-empty and must not end with '/'",
            });
        } else if dir.trim().is_empty() {
            errors.push(ValidationError::Alias {
                alias: alias.clone(),
                reason: "directory must not be empty",
            });
        }
    }
}
