//! CronJob adapter.
//!
//! The pod template sits one level deeper than in the apps/v1 kinds:
//! `spec.jobTemplate.spec.template`.

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::ResourceExt;

use super::{ContainerImage, Workload, WorkloadIdentity, pod_template};

/// A CronJob viewed through the workload contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CronJobWorkload {
    resource: CronJob,
}

impl CronJobWorkload {
    /// Wrap a CronJob
    pub fn new(resource: CronJob) -> Self {
        Self { resource }
    }

    /// Borrow the underlying CronJob
    pub fn get(&self) -> &CronJob {
        &self.resource
    }

    /// Unwrap into the underlying CronJob
    pub fn into_inner(self) -> CronJob {
        self.resource
    }

    fn template(&self) -> Option<&PodTemplateSpec> {
        self.resource
            .spec
            .as_ref()
            .and_then(|spec| spec.job_template.spec.as_ref())
            .map(|job| &job.template)
    }

    fn template_mut(&mut self) -> Option<&mut PodTemplateSpec> {
        self.resource
            .spec
            .as_mut()
            .and_then(|spec| spec.job_template.spec.as_mut())
            .map(|job| &mut job.template)
    }
}

impl Workload for CronJobWorkload {
    fn identity(&self) -> WorkloadIdentity {
        WorkloadIdentity {
            kind: "CronJob".to_string(),
            namespace: self.resource.namespace().unwrap_or_default(),
            name: self.resource.name_any(),
        }
    }

    fn labels(&self) -> BTreeMap<String, String> {
        self.resource.labels().clone()
    }

    fn annotations(&self) -> BTreeMap<String, String> {
        self.resource.annotations().clone()
    }

    fn containers(&self) -> Vec<ContainerImage> {
        pod_template::images(self.template())
    }

    fn set_container_image(&mut self, index: usize, image: &str) {
        pod_template::set_image(self.template_mut(), index, image);
    }

    fn spec_annotations(&self) -> BTreeMap<String, String> {
        pod_template::annotations(self.template())
    }

    fn set_spec_annotations(&mut self, annotations: BTreeMap<String, String>) {
        pod_template::set_annotations(self.template_mut(), annotations);
    }
}
