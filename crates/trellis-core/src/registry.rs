//! Host-side store of registered widget lifecycle approvers.
//!
//! The widget sandbox asks this registry before showing a consent prompt;
//! a positive answer from any registered approver grants the action
//! silently.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::api::{CapabilitiesApprover, IdentityApprover, PreloadApprover, WidgetLifecycleApi};
use crate::widget::WidgetDescriptor;

/// Registry of widget lifecycle approvers.
///
/// Modules register approvers through the [`WidgetLifecycleApi`] impl; the
/// host queries the dispatch methods. Approvers are invoked outside the
/// internal lock, so a slow approver never blocks registration.
#[derive(Default)]
pub struct WidgetLifecycleRegistry {
    preload: RwLock<Vec<Arc<dyn PreloadApprover>>>,
    identity: RwLock<Vec<Arc<dyn IdentityApprover>>>,
    capabilities: RwLock<Vec<Arc<dyn CapabilitiesApprover>>>,
}

impl std::fmt::Debug for WidgetLifecycleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetLifecycleRegistry")
            .field("approver_count", &self.approver_count())
            .finish()
    }
}

impl WidgetLifecycleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered approvers across all three kinds.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn approver_count(&self) -> usize {
        self.preload
            .read()
            .expect("lock poisoned")
            .len()
            .saturating_add(self.identity.read().expect("lock poisoned").len())
            .saturating_add(self.capabilities.read().expect("lock poisoned").len())
    }

    /// Whether any registered approver auto-approves preloading `widget`.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn preload_approved(&self, widget: &WidgetDescriptor) -> bool {
        let approvers: Vec<_> = self.preload.read().expect("lock poisoned").clone();
        for approver in approvers {
            if approver.preapprove_preload(widget).await {
                debug!(widget_id = %widget.id, "Widget preload auto-approved");
                return true;
            }
        }
        false
    }

    /// Whether any registered approver auto-approves issuing the user's
    /// identity token to `widget`.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn identity_approved(&self, widget: &WidgetDescriptor) -> bool {
        let approvers: Vec<_> = self.identity.read().expect("lock poisoned").clone();
        for approver in approvers {
            if approver.preapprove_identity(widget).await {
                debug!(widget_id = %widget.id, "Widget identity request auto-approved");
                return true;
            }
        }
        false
    }

    /// The union of capabilities auto-approved for `widget` across all
    /// registered approvers, or `None` if every approver defers.
    ///
    /// An approver that defers contributes nothing; only when all of them
    /// defer does the whole request fall through to the host's interactive
    /// consent flow.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn approved_capabilities(
        &self,
        widget: &WidgetDescriptor,
        requested: &HashSet<String>,
    ) -> Option<HashSet<String>> {
        let approvers: Vec<_> = self.capabilities.read().expect("lock poisoned").clone();
        let mut union: Option<HashSet<String>> = None;
        for approver in approvers {
            if let Some(approved) = approver.preapprove_capabilities(widget, requested).await {
                union.get_or_insert_with(HashSet::new).extend(approved);
            }
        }
        if let Some(approved) = &union {
            debug!(
                widget_id = %widget.id,
                approved = approved.len(),
                requested = requested.len(),
                "Widget capabilities auto-approved"
            );
        }
        union
    }
}

impl WidgetLifecycleApi for WidgetLifecycleRegistry {
    fn register_preload_approver(&self, approver: Arc<dyn PreloadApprover>) {
        self.preload.write().expect("lock poisoned").push(approver);
        debug!("Preload approver registered");
    }

    fn register_identity_approver(&self, approver: Arc<dyn IdentityApprover>) {
        self.identity.write().expect("lock poisoned").push(approver);
        debug!("Identity approver registered");
    }

    fn register_capabilities_approver(&self, approver: Arc<dyn CapabilitiesApprover>) {
        self.capabilities
            .write()
            .expect("lock poisoned")
            .push(approver);
        debug!("Capabilities approver registered");
    }
}
