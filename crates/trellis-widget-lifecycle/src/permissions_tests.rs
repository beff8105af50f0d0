use serde_json::json;

use super::*;

// ---------------------------------------------------------------------------
// match_pattern
// ---------------------------------------------------------------------------

#[test]
fn exact_pattern_requires_equality() {
    assert!(match_pattern("https://a.com/", "https://a.com/"));
    assert!(!match_pattern("https://a.com/x", "https://a.com/"));
    assert!(!match_pattern("https://A.com/", "https://a.com/"));
}

#[test]
fn wildcard_pattern_matches_prefix() {
    assert!(match_pattern("https://a.com/some", "https://a.com/*"));
    assert!(match_pattern("https://a.com/", "https://a.com/*"));
    assert!(!match_pattern("https://b.com/", "https://a.com/*"));
    // Bare "*" matches everything.
    assert!(match_pattern("anything", "*"));
}

#[test]
fn only_a_trailing_wildcard_counts() {
    assert!(!match_pattern("https://a.com/x", "https://*.com/x"));
    assert!(match_pattern("https://*.com/x", "https://*.com/x"));
}

// ---------------------------------------------------------------------------
// sort_longest_match_last
// ---------------------------------------------------------------------------

#[test]
fn sorts_longest_match_last() {
    let mut patterns = vec![
        "cap:receive.state_event:custom",
        "cap:receive.*",
        "CAP:RECEIVE.STATE_EVENT:*",
        "*",
    ];
    patterns.sort_by(|a, b| sort_longest_match_last(a, b));
    assert_eq!(
        patterns,
        vec![
            "*",
            "cap:receive.*",
            "CAP:RECEIVE.STATE_EVENT:*",
            "cap:receive.state_event:custom",
        ]
    );
}

// ---------------------------------------------------------------------------
// construct_widget_permissions
// ---------------------------------------------------------------------------

fn config(value: serde_json::Value) -> WidgetPermissionsConfig {
    serde_json::from_value(value).unwrap()
}

#[test]
fn finds_exact_match() {
    let config = config(json!({ "https://a.com/": { "preload_approved": true } }));
    let merged = construct_widget_permissions(&config, "https://a.com/");
    assert_eq!(merged.preload_approved, Some(true));
    assert_eq!(merged.identity_approved, None);
    assert_eq!(merged.capabilities_approved, None);
}

#[test]
fn finds_prefix_match() {
    let config = config(json!({ "https://a.com/*": { "preload_approved": true } }));
    let merged = construct_widget_permissions(&config, "https://a.com/some");
    assert_eq!(merged.preload_approved, Some(true));
}

#[test]
fn merges_multiple_permissions() {
    // "https://b.com/*" sorts before "https://b.com/path", so the
    // path-specific rule's explicit fields win, while its absent
    // identity_approved does not erase the broader rule's value.
    let config = config(json!({
        "https://b.com/path": {
            "preload_approved": false,
            "capabilities_approved": ["cap:timeline:*"],
        },
        "https://b.com/*": {
            "preload_approved": true,
            "identity_approved": true,
            "capabilities_approved": ["cap:navigate"],
        },
    }));

    let merged = construct_widget_permissions(&config, "https://b.com/path");
    assert_eq!(merged.preload_approved, Some(false));
    assert_eq!(merged.identity_approved, Some(true));
    assert_eq!(
        merged.capabilities_approved,
        Some(vec!["cap:timeline:*".into()])
    );
}

#[test]
fn skips_unknown_url() {
    let config = config(json!({ "https://a.com/": { "preload_approved": true } }));
    let merged = construct_widget_permissions(&config, "https://a.com/x");
    assert_eq!(merged, WidgetPermissionRule::default());
}

#[test]
fn merges_unknown_fields_per_key() {
    let config = config(json!({
        "https://b.com/*": { "team": "widgets", "review": "pending" },
        "https://b.com/path": { "team": "platform" },
    }));

    let merged = construct_widget_permissions(&config, "https://b.com/path");
    assert_eq!(merged.extra["team"], json!("platform"));
    assert_eq!(merged.extra["review"], json!("pending"));
}
