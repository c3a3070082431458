//! Build invocation context and asset base path.
//!
//! # Data Flow
//! ```text
//! (command, mode) from the invoking build tool
//!     → BuildContext
//!     → base_path.rs (+ package metadata, CDN settings)
//!     → BasePath embedded into emitted assets
//! ```

pub mod base_path;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use base_path::{resolve_base_path, BasePath, BasePathError};

/// What the build tool was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildCommand {
    /// Run the development server.
    Serve,
    /// Produce a production bundle.
    Build,
}

impl BuildCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildCommand::Serve => "serve",
            BuildCommand::Build => "build",
        }
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build command {0:?} (expected \"serve\" or \"build\")")]
pub struct UnknownCommand(pub String);

impl FromStr for BuildCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serve" => Ok(BuildCommand::Serve),
            "build" => Ok(BuildCommand::Build),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// One build tool invocation: command plus free-form mode name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BuildContext {
    pub command: BuildCommand,
    pub mode: String,
}

impl BuildContext {
    pub fn new(command: BuildCommand, mode: impl Into<String>) -> Self {
        Self {
            command,
            mode: mode.into(),
        }
    }

    /// `serve` in `development` mode.
    pub fn serve() -> Self {
        Self::new(BuildCommand::Serve, "development")
    }

    /// `build` in the given mode.
    pub fn build(mode: impl Into<String>) -> Self {
        Self::new(BuildCommand::Build, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_str() {
        assert_eq!("serve".parse::<BuildCommand>().unwrap(), BuildCommand::Serve);
        assert_eq!("build".parse::<BuildCommand>().unwrap(), BuildCommand::Build);
        assert_eq!(
            "Build".parse::<BuildCommand>().unwrap_err(),
            UnknownCommand("Build".into())
        );
    }

    #[test]
    fn test_command_display_round_trips() {
        for command in [BuildCommand::Serve, BuildCommand::Build] {
            assert_eq!(command.to_string().parse::<BuildCommand>().unwrap(), command);
        }
    }
}
