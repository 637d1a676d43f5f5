//! Uniform read/write view over the supported workload kinds.
//!
//! The engine walks containers and stamps annotations through the
//! [`Workload`] trait and never inspects kind identity; each supported
//! kind (Deployment, DaemonSet, StatefulSet, CronJob, Helm release)
//! implements the same contract. Unknown kinds fail at construction with
//! [`Error::UnsupportedKind`].

mod cron_job;
mod daemon_set;
mod deployment;
mod helm_release;
mod pod_template;
mod stateful_set;

pub use cron_job::CronJobWorkload;
pub use daemon_set::DaemonSetWorkload;
pub use deployment::DeploymentWorkload;
pub use helm_release::HelmReleaseWorkload;
pub use stateful_set::StatefulSetWorkload;

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::CronJob;
use kube::core::DynamicObject;

use crate::error::{Error, Result};

/// Stable identifier of a workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadIdentity {
    /// Workload kind (`Deployment`, `DaemonSet`, ...)
    pub kind: String,
    /// Namespace, empty when cluster-scoped or unset
    pub namespace: String,
    /// Object name
    pub name: String,
}

impl fmt::Display for WorkloadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// One container slot of a workload: its position and current image string.
///
/// Indices run over init containers first, then main containers, in
/// declaration order, and stay valid across [`Workload::set_container_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    /// Position within the workload's container sequence
    pub index: usize,
    /// Raw image string as declared, empty when the container has none
    pub image: String,
}

/// Capability set every supported workload kind provides.
pub trait Workload {
    /// Stable identifier
    fn identity(&self) -> WorkloadIdentity;

    /// Top-level labels; read-only for the engine
    fn labels(&self) -> BTreeMap<String, String>;

    /// Top-level annotations; read-only for the engine
    fn annotations(&self) -> BTreeMap<String, String>;

    /// Ordered container sequence, init containers first
    fn containers(&self) -> Vec<ContainerImage>;

    /// Replace the image of the container at `index`; out-of-range
    /// indices are ignored
    fn set_container_image(&mut self, index: usize, image: &str);

    /// Annotations on the pod template (not the workload itself)
    fn spec_annotations(&self) -> BTreeMap<String, String>;

    /// Replace the pod template annotations. Writing here is what makes
    /// the orchestrator observe a spec change and roll the workload.
    fn set_spec_annotations(&mut self, annotations: BTreeMap<String, String>);
}

/// A workload of any supported kind.
///
/// Construction is the single place kinds are dispatched; everything
/// downstream goes through the [`Workload`] contract.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackedResource {
    /// apps/v1 Deployment
    Deployment(DeploymentWorkload),
    /// apps/v1 DaemonSet
    DaemonSet(DaemonSetWorkload),
    /// apps/v1 StatefulSet
    StatefulSet(StatefulSetWorkload),
    /// batch/v1 CronJob
    CronJob(CronJobWorkload),
    /// Helm release tracked through chart values
    HelmRelease(HelmReleaseWorkload),
}

impl TrackedResource {
    /// Construct from a dynamic Kubernetes object, dispatching on its kind.
    pub fn from_dynamic(object: &DynamicObject) -> Result<Self> {
        let kind = object
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default();
        let value = serde_json::to_value(object)?;
        match kind {
            "Deployment" => Ok(Self::Deployment(DeploymentWorkload::new(
                serde_json::from_value(value)?,
            ))),
            "DaemonSet" => Ok(Self::DaemonSet(DaemonSetWorkload::new(
                serde_json::from_value(value)?,
            ))),
            "StatefulSet" => Ok(Self::StatefulSet(StatefulSetWorkload::new(
                serde_json::from_value(value)?,
            ))),
            "CronJob" => Ok(Self::CronJob(CronJobWorkload::new(serde_json::from_value(
                value,
            )?))),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }

    fn inner(&self) -> &dyn Workload {
        match self {
            Self::Deployment(w) => w,
            Self::DaemonSet(w) => w,
            Self::StatefulSet(w) => w,
            Self::CronJob(w) => w,
            Self::HelmRelease(w) => w,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Workload {
        match self {
            Self::Deployment(w) => w,
            Self::DaemonSet(w) => w,
            Self::StatefulSet(w) => w,
            Self::CronJob(w) => w,
            Self::HelmRelease(w) => w,
        }
    }
}

impl Workload for TrackedResource {
    fn identity(&self) -> WorkloadIdentity {
        self.inner().identity()
    }

    fn labels(&self) -> BTreeMap<String, String> {
        self.inner().labels()
    }

    fn annotations(&self) -> BTreeMap<String, String> {
        self.inner().annotations()
    }

    fn containers(&self) -> Vec<ContainerImage> {
        self.inner().containers()
    }

    fn set_container_image(&mut self, index: usize, image: &str) {
        self.inner_mut().set_container_image(index, image);
    }

    fn spec_annotations(&self) -> BTreeMap<String, String> {
        self.inner().spec_annotations()
    }

    fn set_spec_annotations(&mut self, annotations: BTreeMap<String, String>) {
        self.inner_mut().set_spec_annotations(annotations);
    }
}

impl From<Deployment> for TrackedResource {
    fn from(resource: Deployment) -> Self {
        Self::Deployment(DeploymentWorkload::new(resource))
    }
}

impl From<DaemonSet> for TrackedResource {
    fn from(resource: DaemonSet) -> Self {
        Self::DaemonSet(DaemonSetWorkload::new(resource))
    }
}

impl From<StatefulSet> for TrackedResource {
    fn from(resource: StatefulSet) -> Self {
        Self::StatefulSet(StatefulSetWorkload::new(resource))
    }
}

impl From<CronJob> for TrackedResource {
    fn from(resource: CronJob) -> Self {
        Self::CronJob(CronJobWorkload::new(resource))
    }
}

impl From<HelmReleaseWorkload> for TrackedResource {
    fn from(resource: HelmReleaseWorkload) -> Self {
        Self::HelmRelease(resource)
    }
}
