//! Module error types.

/// Errors from module validation, registration, and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The candidate export does not structurally satisfy the module
    /// contract. Raised before any of the module's code has run.
    #[error("invalid module: export does not satisfy the module contract")]
    InvalidModule,

    /// The factory's declared compatible-version range excludes the running
    /// host version. Carries the declared range for diagnostics.
    #[error("module requires host version {required}, but {running} is running")]
    Incompatible {
        /// The range the module declared, verbatim.
        required: String,
        /// The version the host is running.
        running: semver::Version,
    },

    /// `load()` was called after `start()`, or `start()` was called twice.
    /// A programmer error in host wiring, fatal to that call only.
    #[error("module loader has already been started")]
    AlreadyStarted,

    /// A module's own initializer failed during `start()`.
    #[error("module initialization failed: {message}")]
    LoadFailed {
        /// Failure reason, as reported by the module.
        message: String,
    },
}

/// Result type for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;
