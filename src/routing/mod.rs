//! Development proxy routing.
//!
//! # Data Flow
//! ```text
//! Table Compilation (at startup):
//!     RouteConfig[] + table defaults
//!     → rule.rs (validate prefix, parse target origin)
//!     → table.rs (reject duplicates and ambiguous prefixes)
//!     → Freeze as immutable RoutingTable
//!
//! Incoming Request (path, headers)
//!     → table.rs (longest-prefix lookup)
//!     → forward.rs (rewrite URI and Host/Origin headers)
//!     → Dispatch::Forward or Dispatch::Local
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable afterwards (shared without locks)
//! - Prefixes match on whole path segments, never mid-segment
//! - Longest prefix wins; declaration order never matters
//! - No I/O: the outbound request is built, not sent

pub mod error;
pub mod forward;
pub mod matcher;
pub mod rule;
pub mod table;

pub use error::RoutingError;
pub use forward::Dispatch;
pub use rule::ProxyRule;
pub use table::RoutingTable;
