//! Development build configuration: asset base path and dev proxy routing.

pub mod alias;
pub mod build;
pub mod config;
pub mod dev_config;
pub mod observability;
pub mod package;
pub mod routing;

pub use build::{BasePath, BuildCommand, BuildContext};
pub use config::schema::DevProxyConfig;
pub use dev_config::DevConfig;
pub use routing::{Dispatch, ProxyRule, RoutingTable};
