//! Trellis Widget Lifecycle - auto-approval of widget permissions based on
//! URL-pattern rules.
//!
//! This module auto-approves widget preloading, identity token requests,
//! and capability requests based on URL-pattern rules read from host
//! configuration. A widget with no matching rule always falls through to
//! the host's normal interactive consent flow — never to silent denial or
//! silent approval beyond what is explicitly configured.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod config;
pub mod module;
pub mod permissions;
pub mod url;

pub use config::{
    CONFIG_KEY, ConfigParseError, WidgetPermissionRule, WidgetPermissionsConfig,
    parse_widget_lifecycle_config,
};
pub use module::{
    MODULE_API_VERSION, PermissionEngine, WidgetLifecycleModule, WidgetLifecycleModuleFactory,
};
pub use permissions::{construct_widget_permissions, match_pattern, sort_longest_match_last};
pub use self::url::normalize_widget_url;
