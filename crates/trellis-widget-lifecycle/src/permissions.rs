//! Pattern matching and rule merging for widget permissions.

use std::cmp::Ordering;

use crate::config::{WidgetPermissionRule, WidgetPermissionsConfig};

/// Check whether `value` matches `pattern`.
///
/// A pattern ending in `*` matches any value starting with the part before
/// the `*`; otherwise matching is exact and case-sensitive.
#[must_use]
pub fn match_pattern(value: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => value == pattern,
    }
}

/// Case-insensitive lexicographic comparison used to order matched rule
/// patterns, so that alphabetically later patterns are applied last and
/// their fields win the merge.
///
/// Alphabetical order stands in for "more specific wins": a longer pattern
/// sorts after its own prefix, but a pattern that sorts later is not
/// necessarily more specific. Existing deployments rely on this exact
/// ordering, so it must not be replaced with longest-prefix-wins.
#[must_use]
pub fn sort_longest_match_last(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Resolve the effective permission rule for a widget URL.
///
/// Collects every pattern in `config` matching `widget_url`, orders the
/// matches with [`sort_longest_match_last`], and folds them left to right
/// with per-field overwrite: a later rule's present fields replace the
/// accumulator's, while its absent fields leave earlier values intact.
/// Unknown extra fields merge the same way, key by key. Returns an empty
/// rule when nothing matches.
#[must_use]
pub fn construct_widget_permissions(
    config: &WidgetPermissionsConfig,
    widget_url: &str,
) -> WidgetPermissionRule {
    let mut matched: Vec<&str> = config
        .keys()
        .map(String::as_str)
        .filter(|pattern| match_pattern(widget_url, pattern))
        .collect();
    matched.sort_by(|a, b| sort_longest_match_last(a, b));

    let mut merged = WidgetPermissionRule::default();
    for pattern in matched {
        let rule = &config[pattern];
        if let Some(approved) = rule.preload_approved {
            merged.preload_approved = Some(approved);
        }
        if let Some(approved) = rule.identity_approved {
            merged.identity_approved = Some(approved);
        }
        if let Some(patterns) = &rule.capabilities_approved {
            merged.capabilities_approved = Some(patterns.clone());
        }
        for (key, value) in &rule.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
