//! Trellis Core - Foundation types and host API surface for the Trellis
//! module runtime.
//!
//! This crate provides:
//! - The [`WidgetDescriptor`] handed to approver callbacks
//! - The approver traits for widget preloading, identity-token issuance,
//!   and capability requests
//! - The [`WidgetLifecycleApi`] registration surface and the host-side
//!   [`WidgetLifecycleRegistry`] that dispatches to registered approvers
//! - The [`ModuleApi`] handle through which modules reach the host

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod api;
pub mod profile;
pub mod registry;
pub mod widget;

pub use api::{
    CapabilitiesApprover, ConfigApi, IdentityApprover, ModuleApi, PreloadApprover,
    WidgetLifecycleApi,
};
pub use profile::Profile;
pub use registry::WidgetLifecycleRegistry;
pub use widget::WidgetDescriptor;
