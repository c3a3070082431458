//! devproxy: build configuration for the UI dev server.
//!
//! # Architecture Overview
//!
//! ```text
//!   (command, mode)     package.json       devproxy.toml
//!         │                  │                   │
//!         ▼                  ▼                   ▼
//!   ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   build   │◀───│   package    │    │    config    │
//!   │ base path │    │   metadata   │    │ load+validate│
//!   └─────┬─────┘    └──────────────┘    └──────┬───────┘
//!         │                                     │
//!         │          ┌──────────────┐           │
//!         └─────────▶│  DevConfig   │◀──────────┘
//!                    │ base path    │
//!                    │ routing table│──▶ dispatch(request) → Forward | Local
//!                    │ aliases      │──▶ resolve(specifier) → path
//!                    └──────────────┘
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use axum::body::Body;
use axum::http::header::HOST;
use axum::http::Request;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use devproxy::alias::AliasTable;
use devproxy::build::{BuildCommand, BuildContext};
use devproxy::config::{load_config, validate_config, DevProxyConfig};
use devproxy::observability::init_logging;
use devproxy::package::PackageJson;
use devproxy::routing::{Dispatch, RoutingTable};
use devproxy::DevConfig;

#[derive(Parser)]
#[command(name = "devproxy")]
#[command(about = "Resolve the UI build base path and dev proxy table", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Package descriptor providing name and version.
    #[arg(short, long, default_value = "package.json")]
    package: PathBuf,

    /// Project root that alias directories are relative to.
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Log level (off, error, warn, info, debug, trace); RUST_LOG takes precedence.
    #[arg(long)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration as JSON
    Resolve {
        /// Build tool command (serve or build)
        #[arg(long, default_value = "serve")]
        command: BuildCommand,

        /// Build mode (e.g. development, production, cdn)
        #[arg(long, default_value = "development")]
        mode: String,
    },
    /// Show how the dev server would dispatch a request path
    Route {
        /// Request path, optionally with a query string
        path: String,

        /// Host header sent by the browser
        #[arg(long, default_value = "localhost:3000")]
        host: String,
    },
    /// Resolve an import specifier through the alias table
    Alias {
        specifier: String,
    },
    /// Validate the configuration
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let defaults = DevProxyConfig::default();
    let level = match cli.log_level {
        Some(level) => level.to_string().to_lowercase(),
        None => defaults.observability.log_level.clone(),
    };
    let logging = init_logging(&level);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => defaults,
    };
    if cli.log_level.is_none() {
        logging.set_level(&config.observability.log_level);
    }

    match cli.command {
        Commands::Resolve { command, mode } => {
            let context = BuildContext::new(command, mode);
            let package = read_package(&cli.package)?;
            let resolved = DevConfig::resolve(&context, &config, &package, &cli.root)?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Commands::Route { path, host } => {
            let table = RoutingTable::from_config(&config.proxy)?;
            let request = Request::builder()
                .uri(path.as_str())
                .header(HOST, host)
                .body(Body::empty())?;

            match table.dispatch(request)? {
                Dispatch::Forward { rule, request } => {
                    let host = request
                        .headers()
                        .get(HOST)
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("");
                    println!("forward {} -> {} (host: {})", rule.prefix(), request.uri(), host);
                }
                Dispatch::Local(request) => {
                    println!("local {}", request.uri());
                }
            }
        }
        Commands::Alias { specifier } => {
            let aliases = AliasTable::from_config(&config.alias, &cli.root);
            match aliases.resolve(&specifier) {
                Some(path) => println!("{}", path.display()),
                None => return Err(format!("no alias matches {:?}", specifier).into()),
            }
        }
        Commands::Check => {
            validate_config(&config).map_err(|errors| {
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            RoutingTable::from_config(&config.proxy)?;
            println!("ok: {} proxy routes", config.proxy.routes.len());
        }
    }

    Ok(())
}

/// Read package metadata; a missing file yields empty metadata so that
/// non-CDN builds work without one.
fn read_package(path: &Path) -> Result<PackageJson, Box<dyn Error>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No package descriptor found");
        return Ok(PackageJson::default());
    }
    Ok(PackageJson::load(path)?)
}
