//! Raw module exports and the structural module probe.
//!
//! The host's discovery layer hands the loader whatever a module bundle
//! exported, with no guarantees about its shape. [`ModuleExport`] carries
//! those exports untyped; [`is_module`] is the capability probe that
//! decides whether the bundle satisfies the module contract before any of
//! its code is invoked.

use std::collections::HashMap;
use std::sync::Arc;

use crate::module::ModuleFactory;

/// A single named value exported by a module bundle.
///
/// Well-formed module bundles export a [`Factory`](ExportValue::Factory)
/// under the name `"default"`; everything else is what a malformed or
/// foreign bundle might hand over instead.
pub enum ExportValue {
    /// A constructible module factory.
    Factory(Arc<dyn ModuleFactory>),
    /// A boolean value.
    Bool(bool),
    /// A numeric value.
    Number(f64),
    /// A string value.
    String(String),
    /// Structured data that is not a factory.
    Data(serde_json::Value),
}

impl std::fmt::Debug for ExportValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Factory(factory) => f
                .debug_struct("Factory")
                .field("module_api_version", &factory.module_api_version())
                .finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Number(v) => f.debug_tuple("Number").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Data(v) => f.debug_tuple("Data").field(v).finish(),
        }
    }
}

/// The raw exports of a candidate module bundle, keyed by export name.
///
/// Untrusted until [`is_module`] has accepted it.
#[derive(Debug, Default)]
pub struct ModuleExport {
    entries: HashMap<String, ExportValue>,
}

impl ModuleExport {
    /// Create an empty export table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a well-formed bundle: a factory under
    /// the `"default"` export name.
    #[must_use]
    pub fn with_default(factory: Arc<dyn ModuleFactory>) -> Self {
        let mut export = Self::new();
        export.insert("default", ExportValue::Factory(factory));
        export
    }

    /// Add or replace a named export.
    pub fn insert(&mut self, name: impl Into<String>, value: ExportValue) {
        self.entries.insert(name.into(), value);
    }

    /// Look up a named export.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExportValue> {
        self.entries.get(name)
    }

    /// The default export's factory, if the default export is one.
    #[must_use]
    pub fn default_factory(&self) -> Option<&Arc<dyn ModuleFactory>> {
        match self.get("default") {
            Some(ExportValue::Factory(factory)) => Some(factory),
            _ => None,
        }
    }
}

/// Structural check that a candidate export satisfies the module contract.
///
/// The probe validates, without invoking any module code, that the bundle
/// exports a `"default"` entry, that the entry is a constructible factory
/// rather than a plain value, and that the factory declares a non-empty
/// module-api version string. Whether the declared range actually admits
/// the running host version is a separate, distinguishable failure checked
/// at registration time.
#[must_use]
pub fn is_module(export: &ModuleExport) -> bool {
    export
        .default_factory()
        .is_some_and(|factory| !factory.module_api_version().is_empty())
}
