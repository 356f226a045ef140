//! Shell-style wildcard matching for paths and exclusion lists.

/// Return true when `value` matches at least one pattern.
///
/// Patterns use shell-style wildcards (`*`, `?`) with default glob options,
/// so `*` crosses path separators. An empty pattern list behaves as matching
/// against "no value": it matches only when the value itself is empty.
/// Invalid patterns match nothing rather than erroring.
pub fn matches_any(value: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return value.is_empty();
    }
    patterns.iter().any(|p| {
        glob::Pattern::new(p)
            .map(|pat| pat.matches(value))
            .unwrap_or(false)
    })
}

/// Return true when `value` matches none of the patterns.
pub fn matches_none(value: &str, patterns: &[String]) -> bool {
    !matches_any(value, patterns)
}
