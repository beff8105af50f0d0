//! Trellis Watch - Reactive value container for the Trellis module runtime.
//!
//! This crate provides [`Watchable`], the primitive used to propagate host
//! state (profile, configuration) to modules without a full event bus. A
//! `Watchable` owns a current value and a set of listener callbacks; the
//! listeners are notified if and only if a newly assigned value actually
//! differs from the current one.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod watchable;

pub use watchable::{WatchHooks, WatchId, Watchable};
