//! Route table lookup.
//!
//! # Responsibilities
//! - Store compiled rules keyed by prefix
//! - Reject duplicate and ambiguous prefixes at construction
//! - Look up the longest matching rule for a path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Sorted map keyed by prefix; lookup probes each segment boundary of the
//!   path, longest first, so cost is O(segments) not O(rules)
//! - Explicit no-match (`None`) rather than a silent default

use std::collections::btree_map::{BTreeMap, Entry};

use axum::http::Request;
use serde::{Serialize, Serializer};

use crate::config::schema::ProxyTableConfig;
use crate::routing::error::RoutingError;
use crate::routing::forward::{rewrite_request, Dispatch};
use crate::routing::matcher::segment_prefixes;
use crate::routing::rule::ProxyRule;

/// Immutable prefix -> rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    rules: BTreeMap<String, ProxyRule>,
}

impl RoutingTable {
    /// Build a table, failing on the first duplicate or ambiguous prefix.
    pub fn new(rules: impl IntoIterator<Item = ProxyRule>) -> Result<Self, RoutingError> {
        let mut map = BTreeMap::new();
        for rule in rules {
            match map.entry(rule.prefix().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(RoutingError::DuplicatePrefix(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(rule);
                }
            }
        }

        let mut ambiguous = ambiguous_pairs(map.keys().map(String::as_str)).into_iter();
        if let Some((shorter, longer)) = ambiguous.next() {
            return Err(RoutingError::AmbiguousPrefix { shorter, longer });
        }

        tracing::debug!(route_count = map.len(), "Routing table compiled");
        Ok(Self { rules: map })
    }

    /// Build a table from configuration, applying the table defaults.
    pub fn from_config(config: &ProxyTableConfig) -> Result<Self, RoutingError> {
        let rules = config
            .routes
            .iter()
            .map(|route| {
                ProxyRule::new(
                    route.prefix.clone(),
                    route.target.as_deref().unwrap_or(&config.target),
                    route.change_origin.unwrap_or(config.change_origin),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = &ProxyRule> {
        self.rules.values()
    }

    /// Rule declared for exactly `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&ProxyRule> {
        self.rules.get(prefix)
    }

    /// Longest rule whose prefix matches `path` on a segment boundary.
    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        segment_prefixes(path).find_map(|candidate| self.rules.get(candidate))
    }

    /// Decide whether a request is forwarded or served locally.
    ///
    /// Forwarded requests come back with their URI pointed at the rule's
    /// target and, if the rule asks for it, `Host`/`Origin` rewritten.
    pub fn dispatch<B>(&self, request: Request<B>) -> Result<Dispatch<'_, B>, RoutingError> {
        match self.match_path(request.uri().path()) {
            Some(rule) => {
                tracing::debug!(
                    path = %request.uri().path(),
                    prefix = %rule.prefix(),
                    target = %rule.target_origin(),
                    "Forwarding request"
                );
                let request = rewrite_request(rule, request)?;
                Ok(Dispatch::Forward { rule, request })
            }
            None => {
                tracing::trace!(path = %request.uri().path(), "No proxy rule matched");
                Ok(Dispatch::Local(request))
            }
        }
    }
}

impl<'a> IntoIterator for &'a RoutingTable {
    type Item = &'a ProxyRule;
    type IntoIter = std::collections::btree_map::Values<'a, String, ProxyRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.values()
    }
}

impl Serialize for RoutingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rules.values())
    }
}

/// Pairs of prefixes where the first is a literal string prefix of the second.
///
/// Input must be sorted. If `a` is a prefix of `c`, everything sorted between
/// them also starts with `a`, so comparing neighbours finds every ambiguous
/// table.
pub fn ambiguous_pairs<'a>(sorted: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    let sorted: Vec<&str> = sorted.into_iter().collect();
    sorted
        .windows(2)
        .filter(|pair| pair[1].starts_with(pair[0]))
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}
