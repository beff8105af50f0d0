//! The widget lifecycle module and its permission engine.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use trellis_core::{
    CapabilitiesApprover, IdentityApprover, ModuleApi, PreloadApprover, WidgetDescriptor,
};
use trellis_modules::{Module, ModuleError, ModuleFactory, ModuleResult};

use crate::config::{
    CONFIG_KEY, WidgetPermissionRule, WidgetPermissionsConfig, parse_widget_lifecycle_config,
};
use crate::permissions::{construct_widget_permissions, match_pattern};
use crate::url::normalize_widget_url;

/// The range of host module-api versions this module supports.
pub const MODULE_API_VERSION: &str = "^1.0.0";

/// Pure decision logic over an immutable rule table.
///
/// One engine instance backs all three approvers registered by the module.
/// Decisions are lookups only: an engine never fails, it answers "no
/// approval" instead.
pub struct PermissionEngine {
    config: WidgetPermissionsConfig,
}

impl PermissionEngine {
    /// Create an engine over a parsed rule table.
    #[must_use]
    pub fn new(config: WidgetPermissionsConfig) -> Self {
        Self { config }
    }

    /// Resolve the merged rule for a widget's template URL.
    ///
    /// A template URL that does not parse matches no rules, so the widget
    /// falls through to the host's interactive consent flow.
    fn rule_for(&self, template_url: &str) -> WidgetPermissionRule {
        match normalize_widget_url(template_url) {
            Ok(normalized) => construct_widget_permissions(&self.config, &normalized),
            Err(e) => {
                debug!(error = %e, "Widget template URL did not parse, no rules apply");
                WidgetPermissionRule::default()
            },
        }
    }
}

#[async_trait]
impl PreloadApprover for PermissionEngine {
    async fn preapprove_preload(&self, widget: &WidgetDescriptor) -> bool {
        self.rule_for(&widget.template_url).preload_approved == Some(true)
    }
}

#[async_trait]
impl IdentityApprover for PermissionEngine {
    async fn preapprove_identity(&self, widget: &WidgetDescriptor) -> bool {
        self.rule_for(&widget.template_url).identity_approved == Some(true)
    }
}

#[async_trait]
impl CapabilitiesApprover for PermissionEngine {
    async fn preapprove_capabilities(
        &self,
        widget: &WidgetDescriptor,
        requested: &HashSet<String>,
    ) -> Option<HashSet<String>> {
        let rule = self.rule_for(&widget.template_url);
        let approved_patterns = rule.capabilities_approved?;

        let approved: HashSet<String> = requested
            .iter()
            .filter(|capability| {
                approved_patterns
                    .iter()
                    .any(|pattern| match_pattern(capability, pattern))
            })
            .cloned()
            .collect();

        // A configured list that matches nothing behaves as if no rule
        // existed: defer, never an explicit empty approval.
        if approved.is_empty() {
            None
        } else {
            Some(approved)
        }
    }
}

/// Factory for [`WidgetLifecycleModule`].
#[derive(Debug, Default)]
pub struct WidgetLifecycleModuleFactory;

impl ModuleFactory for WidgetLifecycleModuleFactory {
    fn module_api_version(&self) -> &str {
        MODULE_API_VERSION
    }

    fn create(&self, api: ModuleApi) -> Box<dyn Module> {
        Box::new(WidgetLifecycleModule { api })
    }
}

/// Module that auto-approves widget preloading, identity token requests,
/// and capability requests based on URL-pattern rules from host
/// configuration.
pub struct WidgetLifecycleModule {
    api: ModuleApi,
}

#[async_trait]
impl Module for WidgetLifecycleModule {
    async fn load(&mut self) -> ModuleResult<()> {
        let Some(widget_lifecycle) = self.api.widget_lifecycle().map(Arc::clone) else {
            return Err(ModuleError::LoadFailed {
                message: "widget lifecycle API is not available; update the host to a build \
                          that provides widget lifecycle module support"
                    .into(),
            });
        };

        let config = match parse_widget_lifecycle_config(self.api.config().get(CONFIG_KEY).as_ref())
        {
            Ok(config) => config,
            Err(e) => {
                error!(
                    error = %e,
                    "Failed to initialize the widget lifecycle module, continuing with an \
                     empty rule table"
                );
                WidgetPermissionsConfig::default()
            },
        };

        let engine = Arc::new(PermissionEngine::new(config));
        widget_lifecycle.register_preload_approver(Arc::clone(&engine) as Arc<dyn PreloadApprover>);
        widget_lifecycle
            .register_identity_approver(Arc::clone(&engine) as Arc<dyn IdentityApprover>);
        widget_lifecycle.register_capabilities_approver(engine);
        debug!("Widget lifecycle approvers registered");
        Ok(())
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
