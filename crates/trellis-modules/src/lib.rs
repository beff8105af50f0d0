//! Trellis Modules - Module contract, structural validation, and loader for
//! the Trellis module runtime.
//!
//! A module is a unit of third-party code loaded into the host at startup.
//! This crate provides:
//! - The [`Module`] and [`ModuleFactory`] contract modules implement
//! - The untyped [`ModuleExport`] carrier and the [`is_module`] structural
//!   probe that validates it before any module code runs
//! - The [`ModuleLoader`], which gates registration on shape and version
//!   compatibility and drives the one-shot concurrent start
//! - The [`ModuleError`] taxonomy for everything that can go wrong

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod export;
pub mod loader;
pub mod module;

pub use error::{ModuleError, ModuleResult};
pub use export::{ExportValue, ModuleExport, is_module};
pub use loader::{ModuleLoader, ModuleState};
pub use module::{Module, ModuleFactory};
