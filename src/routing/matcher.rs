//! Path prefix matching.
//!
//! # Design Decisions
//! - Case-sensitive, byte-wise comparison
//! - A prefix only matches whole segments: `/git` matches `/git` and
//!   `/git/repos`, never `/github`
//! - No regex

/// Candidate prefixes of `path`, longest first.
///
/// Yields `path` itself, then every leading run of segments.
/// `/a/b/c` yields `/a/b/c`, `/a/b`, `/a`.
pub fn segment_prefixes(path: &str) -> impl Iterator<Item = &str> {
    let mut end = Some(path.len());
    std::iter::from_fn(move || {
        let current = end?;
        let candidate = &path[..current];
        end = candidate.rfind('/').filter(|idx| *idx > 0);
        Some(candidate)
    })
    .filter(|candidate| !candidate.is_empty())
}
