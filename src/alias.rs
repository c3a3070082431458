//! Import specifier aliases (`@/components/Foo.vue` -> `<root>/src/components/Foo.vue`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::config::schema::AliasConfig;
use crate::routing::matcher::segment_prefixes;

/// Alias keys mapped to absolute directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, PathBuf>,
}

impl AliasTable {
    /// Resolve configured directories against `root`.
    pub fn from_config(config: &AliasConfig, root: &Path) -> Self {
        let entries = config
            .0
            .iter()
            .map(|(alias, dir)| (alias.clone(), root.join(dir)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, alias: &str) -> Option<&Path> {
        self.entries.get(alias).map(PathBuf::as_path)
    }

    /// Resolve an import specifier.
    ///
    /// The longest alias that matches whole segments wins; `@foo` does not
    /// match alias `@`.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        segment_prefixes(specifier).find_map(|candidate| {
            let dir = self.entries.get(candidate)?;
            let rest = specifier[candidate.len()..].trim_start_matches('/');
            Some(if rest.is_empty() { dir.clone() } else { dir.join(rest) })
        })
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(alias, dir)| (alias, dir.display().to_string())),
        )
    }
}
