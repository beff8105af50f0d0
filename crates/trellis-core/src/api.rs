//! Host API surface consumed by modules.
//!
//! A module never sees the host directly: it receives a capability-scoped
//! [`ModuleApi`] handle at construction time and reaches the host only
//! through the traits bundled here.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use trellis_watch::Watchable;

use crate::profile::Profile;
use crate::widget::WidgetDescriptor;

/// Read access to host configuration.
///
/// Sections are keyed by reverse-DNS strings (e.g.
/// `"io.trellis.modules.widget-lifecycle"`). A missing section yields
/// `None`; the caller decides whether that is an error.
pub trait ConfigApi: Send + Sync {
    /// Return the raw configuration value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<serde_json::Value>;
}

/// Decides whether a widget may be preloaded without user interaction.
///
/// Approvers may be synchronous or suspending; either way they must not
/// fail — an approver that cannot decide answers `false`.
#[async_trait]
pub trait PreloadApprover: Send + Sync {
    /// `true` auto-approves preloading; any other answer defers to the
    /// host's default consent flow.
    async fn preapprove_preload(&self, widget: &WidgetDescriptor) -> bool;
}

/// Decides whether a widget may receive the user's identity token without
/// user interaction.
#[async_trait]
pub trait IdentityApprover: Send + Sync {
    /// `true` auto-approves identity-token issuance; any other answer
    /// defers to the host's default consent flow.
    async fn preapprove_identity(&self, widget: &WidgetDescriptor) -> bool;
}

/// Decides which of a widget's requested capabilities are auto-approved.
#[async_trait]
pub trait CapabilitiesApprover: Send + Sync {
    /// Return the subset of `requested` to approve, or `None` to defer the
    /// whole request to the host's default consent flow.
    ///
    /// The two answers are observably different to the host: `None` means
    /// "no opinion", while a set explicitly approves its members (and only
    /// them). Implementations never answer an empty set.
    async fn preapprove_capabilities(
        &self,
        widget: &WidgetDescriptor,
        requested: &HashSet<String>,
    ) -> Option<HashSet<String>>;
}

/// Registration surface through which modules attach widget lifecycle
/// approvers to the host.
pub trait WidgetLifecycleApi: Send + Sync {
    /// Register a handler that can auto-approve widget preloading.
    fn register_preload_approver(&self, approver: Arc<dyn PreloadApprover>);

    /// Register a handler that can auto-approve identity token requests.
    fn register_identity_approver(&self, approver: Arc<dyn IdentityApprover>);

    /// Register a handler that can auto-approve requested capabilities.
    fn register_capabilities_approver(&self, approver: Arc<dyn CapabilitiesApprover>);
}

/// Capability-scoped handle through which a module reaches the host.
///
/// The host owns the handle and passes a clone to each module instance at
/// construction. Surfaces a host build does not provide are simply absent
/// (e.g. [`widget_lifecycle`](Self::widget_lifecycle) on hosts without
/// widget support), and modules are expected to cope.
#[derive(Clone)]
pub struct ModuleApi {
    config: Arc<dyn ConfigApi>,
    widget_lifecycle: Option<Arc<dyn WidgetLifecycleApi>>,
    profile: Arc<Watchable<Profile>>,
}

impl ModuleApi {
    /// Create a handle exposing only the configuration surface.
    #[must_use]
    pub fn new(config: Arc<dyn ConfigApi>) -> Self {
        Self {
            config,
            widget_lifecycle: None,
            profile: Arc::new(Watchable::new(Profile::default())),
        }
    }

    /// Attach the widget lifecycle registration surface.
    #[must_use]
    pub fn with_widget_lifecycle(mut self, api: Arc<dyn WidgetLifecycleApi>) -> Self {
        self.widget_lifecycle = Some(api);
        self
    }

    /// Share a live profile container instead of the default empty one.
    #[must_use]
    pub fn with_profile(mut self, profile: Arc<Watchable<Profile>>) -> Self {
        self.profile = profile;
        self
    }

    /// The configuration read surface.
    #[must_use]
    pub fn config(&self) -> &dyn ConfigApi {
        self.config.as_ref()
    }

    /// The widget lifecycle registration surface, if this host provides one.
    #[must_use]
    pub fn widget_lifecycle(&self) -> Option<&Arc<dyn WidgetLifecycleApi>> {
        self.widget_lifecycle.as_ref()
    }

    /// The profile of the user currently logged in, as a live container.
    #[must_use]
    pub fn profile(&self) -> &Watchable<Profile> {
        self.profile.as_ref()
    }
}

impl std::fmt::Debug for ModuleApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleApi")
            .field("widget_lifecycle", &self.widget_lifecycle.is_some())
            .finish_non_exhaustive()
    }
}
