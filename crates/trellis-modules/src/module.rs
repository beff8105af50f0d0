//! The contract a module implements to run inside the host.

use async_trait::async_trait;

use trellis_core::ModuleApi;

use crate::error::ModuleResult;

/// A module instance living inside the host.
///
/// Instances are constructed by a [`ModuleFactory`] and owned by the
/// loader for their registration lifetime. `load` is the module's own
/// async initializer; it shares a name with
/// [`ModuleLoader::load`](crate::ModuleLoader::load) deliberately — the
/// loader registers, the module initializes.
#[async_trait]
pub trait Module: Send + Sync {
    /// Initialize the module: read configuration, register callbacks and
    /// handlers with the host-provided API surfaces.
    ///
    /// Called exactly once, from [`ModuleLoader::start`](crate::ModuleLoader::start),
    /// concurrently with the other registered modules' initializers.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot initialize; the failure is
    /// surfaced out of `start()` without rolling back side effects other
    /// modules have already applied.
    async fn load(&mut self) -> ModuleResult<()>;
}

/// Constructs [`Module`] instances and declares which host versions the
/// module can run against.
pub trait ModuleFactory: Send + Sync {
    /// The range of host module-api versions this module supports, as a
    /// semver range string (e.g. `"^1.0.0"`).
    fn module_api_version(&self) -> &str;

    /// Construct the module with its capability-scoped host API handle.
    fn create(&self, api: ModuleApi) -> Box<dyn Module>;
}
