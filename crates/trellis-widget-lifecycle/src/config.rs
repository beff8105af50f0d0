//! Widget lifecycle configuration parsing and validation.
//!
//! The raw configuration arrives as an untyped JSON value from the host's
//! config surface. Parsing fails closed: a missing or falsy value yields an
//! empty rule table, while a present-but-malformed value produces a
//! descriptive [`ConfigParseError`] that the owning module logs and
//! recovers from. A module misconfiguration must never break the host.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The host configuration key under which the widget lifecycle module
/// configuration is stored.
pub const CONFIG_KEY: &str = "io.trellis.modules.widget-lifecycle";

/// Per-widget approval settings: preload, identity, and capabilities.
///
/// A partial record — every field is optional, and an absent field never
/// erases a value accumulated from a less specific rule during merging.
/// Unknown fields are preserved, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetPermissionRule {
    /// Whether the widget may be preloaded without user interaction.
    #[serde(
        default,
        deserialize_with = "strict_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub preload_approved: Option<bool>,
    /// Whether the widget may receive the user's identity token without
    /// user interaction.
    #[serde(
        default,
        deserialize_with = "strict_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub identity_approved: Option<bool>,
    /// Capability patterns to auto-approve. Each pattern is a non-empty
    /// string, optionally ending in `*` for prefix matching.
    #[serde(
        default,
        deserialize_with = "strict_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub capabilities_approved: Option<Vec<String>>,
    /// Fields this version of the module does not know about.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Map from URL patterns to their widget approval configuration.
pub type WidgetPermissionsConfig = HashMap<String, WidgetPermissionRule>;

/// Errors from widget lifecycle configuration parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    /// The configuration value does not match the expected schema.
    #[error("errors in the module configuration for \"{key}\": {message}")]
    Schema {
        /// The configuration key the value was read from.
        key: &'static str,
        /// What the schema check rejected.
        message: String,
    },

    /// A capability pattern was an empty string.
    #[error(
        "errors in the module configuration for \"{key}\": \
         empty capability pattern in the rule for \"{pattern}\""
    )]
    EmptyCapabilityPattern {
        /// The configuration key the value was read from.
        key: &'static str,
        /// The URL pattern whose rule contains the empty entry.
        pattern: String,
    },
}

/// Deserialize a present field strictly: `null` is a type error rather
/// than an absent value. Absent fields still default to `None`.
fn strict_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
struct RawModuleConfig {
    #[serde(default, deserialize_with = "strict_option")]
    widget_permissions: Option<WidgetPermissionsConfig>,
}

/// Whether a configuration value counts as "not configured".
///
/// Mirrors the host convention that an absent section may surface as any
/// falsy value rather than only as a missing key.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse and validate the widget lifecycle module configuration.
///
/// A missing or falsy value yields an empty rule table: every widget is
/// unconfigured and all approvers defer.
///
/// # Errors
///
/// Returns [`ConfigParseError`] if a value is present but malformed —
/// wrong field types (including explicit `null`s) or empty capability
/// pattern strings. Callers are expected to log the error and continue
/// with an empty rule table.
pub fn parse_widget_lifecycle_config(
    value: Option<&Value>,
) -> Result<WidgetPermissionsConfig, ConfigParseError> {
    let Some(value) = value else {
        return Ok(WidgetPermissionsConfig::default());
    };
    if is_falsy(value) {
        return Ok(WidgetPermissionsConfig::default());
    }

    let raw: RawModuleConfig =
        serde_json::from_value(value.clone()).map_err(|e| ConfigParseError::Schema {
            key: CONFIG_KEY,
            message: e.to_string(),
        })?;
    let config = raw.widget_permissions.unwrap_or_default();

    for (pattern, rule) in &config {
        if let Some(capabilities) = &rule.capabilities_approved
            && capabilities.iter().any(String::is_empty)
        {
            return Err(ConfigParseError::EmptyCapabilityPattern {
                key: CONFIG_KEY,
                pattern: pattern.clone(),
            });
        }
    }

    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
