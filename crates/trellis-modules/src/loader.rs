//! The module loader: validation, version gating, and the one-shot start.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use semver::{Version, VersionReq};
use tracing::{debug, info, warn};

use trellis_core::ModuleApi;

use crate::error::{ModuleError, ModuleResult};
use crate::export::{ModuleExport, is_module};
use crate::module::Module;

/// Lifecycle state of a registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleState {
    /// Validated and instantiated, waiting for [`ModuleLoader::start`].
    Registered,
    /// The module's initializer resolved.
    Started,
    /// The module's initializer failed.
    Failed(String),
}

struct ModuleEntry {
    module: Box<dyn Module>,
    state: ModuleState,
}

/// Loads and starts modules.
///
/// Registration (`load`) validates an untrusted export's shape and checks
/// the declared version range against the running host version before any
/// module code is constructed. `start` then runs every registered module's
/// own initializer concurrently, exactly once for the lifetime of the
/// loader.
pub struct ModuleLoader {
    api: ModuleApi,
    host_version: Version,
    modules: Vec<ModuleEntry>,
    started: bool,
}

impl ModuleLoader {
    /// Create a loader for a host running `host_version`, handing `api` to
    /// every module it constructs.
    #[must_use]
    pub fn new(api: ModuleApi, host_version: Version) -> Self {
        Self {
            api,
            host_version,
            modules: Vec::new(),
            started: false,
        }
    }

    /// Validate `export` and register its module for the next [`start`](Self::start).
    ///
    /// Nothing from the export is invoked unless validation passes; on
    /// success the factory constructs the instance with a clone of the host
    /// API handle.
    ///
    /// # Errors
    ///
    /// - [`ModuleError::AlreadyStarted`] if `start()` has been called; no
    ///   further modules may be registered once the runtime has started.
    /// - [`ModuleError::InvalidModule`] if the export does not satisfy the
    ///   structural module contract.
    /// - [`ModuleError::Incompatible`] if the declared version range does
    ///   not include the running host version. An unparseable range is
    ///   incompatible, not a panic.
    pub fn load(&mut self, export: &ModuleExport) -> ModuleResult<()> {
        if self.started {
            return Err(ModuleError::AlreadyStarted);
        }
        if !is_module(export) {
            return Err(ModuleError::InvalidModule);
        }
        let factory = export
            .default_factory()
            .ok_or(ModuleError::InvalidModule)?;

        let required = factory.module_api_version();
        let compatible = VersionReq::parse(required)
            .is_ok_and(|range| range.matches(&self.host_version));
        if !compatible {
            return Err(ModuleError::Incompatible {
                required: required.to_owned(),
                running: self.host_version.clone(),
            });
        }

        self.modules.push(ModuleEntry {
            module: factory.create(self.api.clone()),
            state: ModuleState::Registered,
        });
        debug!(
            required = %required,
            host_version = %self.host_version,
            "Module registered"
        );
        Ok(())
    }

    /// Run every registered module's initializer concurrently and wait for
    /// them to settle.
    ///
    /// Initializers are all launched before any is awaited; there is no
    /// completion-order guarantee. The first failure is surfaced as soon as
    /// it occurs without cancelling the other in-flight initializers — they
    /// run to completion detached, their side effects still taking hold.
    /// No rollback is provided.
    ///
    /// # Errors
    ///
    /// - [`ModuleError::AlreadyStarted`] on the second and every later call.
    /// - The first initializer failure, propagated verbatim; a panicking
    ///   initializer is reported as [`ModuleError::LoadFailed`].
    pub async fn start(&mut self) -> ModuleResult<()> {
        if self.started {
            return Err(ModuleError::AlreadyStarted);
        }
        self.started = true;

        let pending = std::mem::take(&mut self.modules);
        info!(modules = pending.len(), "Starting modules");

        let mut tasks = FuturesUnordered::new();
        for entry in pending {
            let mut module = entry.module;
            tasks.push(tokio::spawn(async move {
                let result = module.load().await;
                (module, result)
            }));
        }

        while let Some(joined) = tasks.next().await {
            let (module, result) = joined.map_err(|e| ModuleError::LoadFailed {
                message: format!("module initializer panicked: {e}"),
            })?;
            match result {
                Ok(()) => {
                    self.modules.push(ModuleEntry {
                        module,
                        state: ModuleState::Started,
                    });
                },
                Err(e) => {
                    warn!(error = %e, "Module initialization failed");
                    self.modules.push(ModuleEntry {
                        module,
                        state: ModuleState::Failed(e.to_string()),
                    });
                    return Err(e);
                },
            }
        }

        debug!(modules = self.modules.len(), "All modules started");
        Ok(())
    }

    /// Whether [`start`](Self::start) has been called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of modules currently held by the loader.
    ///
    /// Before `start()` this counts registered modules; afterwards it
    /// counts the modules whose initializers have settled (an early error
    /// return leaves later-settling modules detached and uncounted).
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// The lifecycle states of the modules held by the loader.
    #[must_use]
    pub fn states(&self) -> Vec<ModuleState> {
        self.modules.iter().map(|e| e.state.clone()).collect()
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("host_version", &self.host_version)
            .field("modules", &self.modules.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
