//! bow-operator library crate
//!
//! The update decision engine behind the bow controller: given a workload,
//! a candidate image reference observed in a registry and a per-workload
//! policy, decide whether the workload should move to the candidate and
//! produce the exact mutated workload.
//!
//! The three entry points surrounding code uses:
//! - [`ImageRef::parse`] to parse image reference strings,
//! - [`Policy::from_label`] to build a policy from its `bow.sh/policy` form,
//! - [`UpdateEngine::check_for_update`] to produce an [`UpdatePlan`].
//!
//! Everything is pure computation: no I/O, no persisted state, and a
//! single injected [`Clock`] as the only source of non-determinism.

pub mod clock;
pub mod engine;
pub mod error;
pub mod image;
pub mod labels;
pub mod plan;
pub mod policy;
pub mod provider;
pub mod version;
pub mod workload;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::UpdateEngine;
pub use error::{Error, Result};
pub use image::ImageRef;
pub use plan::UpdatePlan;
pub use policy::{Policy, SemverGate};
pub use workload::{TrackedResource, Workload};
