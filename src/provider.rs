//! Interfaces to the subsystems surrounding the engine.
//!
//! Triggers (registry polling, webhooks, pubsub) feed [`Event`]s in;
//! providers own a class of workloads and apply accepted plans. Only the
//! seam is defined here - polling, approvals, notifications and wire
//! calls live in their own subsystems.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::image::ImageRef;
use crate::labels::POLL_DEFAULT_SCHEDULE;

/// How updates for an image are triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Registry push events (webhook / pubsub)
    #[default]
    Default,
    /// Periodic registry polling
    Poll,
}

/// An image a provider wants watched by the trigger subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedImage {
    /// The image reference as declared by the workload
    pub image: ImageRef,
    /// How candidates for this image arrive
    pub trigger: Trigger,
    /// Poll schedule, from `bow.sh/poll-schedule` or the default
    pub poll_schedule: String,
    /// Name of the owning provider
    pub provider: String,
    /// Provider-specific metadata (selectors, chart identity)
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl TrackedImage {
    /// Track an image with the default trigger and poll schedule
    pub fn new(image: ImageRef, provider: impl Into<String>) -> Self {
        Self {
            image,
            trigger: Trigger::default(),
            poll_schedule: POLL_DEFAULT_SCHEDULE.to_string(),
            provider: provider.into(),
            meta: BTreeMap::new(),
        }
    }
}

/// A candidate image newly observed in a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The observed reference, tag included
    pub candidate: ImageRef,
    /// When the trigger saw it
    pub created_at: Timestamp,
    /// Name of the trigger that produced the event
    pub trigger_name: String,
}

/// A workload provider: the subsystem owning a class of workloads
/// (Kubernetes kinds, Helm releases), evaluating events against them and
/// applying accepted plans.
pub trait Provider {
    /// Provider name, used in logs and tracked-image records
    fn name(&self) -> &str;

    /// Hand a registry event to the provider for evaluation
    fn submit(&mut self, event: Event) -> Result<()>;

    /// Images the provider's workloads currently reference
    fn tracked_images(&self) -> Result<Vec<TrackedImage>>;
}
