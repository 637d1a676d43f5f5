//! StatefulSet adapter.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::ResourceExt;

use super::{ContainerImage, Workload, WorkloadIdentity, pod_template};

/// A StatefulSet viewed through the workload contract.
#[derive(Debug, Clone, PartialEq)]
pub struct StatefulSetWorkload {
    resource: StatefulSet,
}

impl StatefulSetWorkload {
    /// Wrap a StatefulSet
    pub fn new(resource: StatefulSet) -> Self {
        Self { resource }
    }

    /// Borrow the underlying StatefulSet
    pub fn get(&self) -> &StatefulSet {
        &self.resource
    }

    /// Unwrap into the underlying StatefulSet
    pub fn into_inner(self) -> StatefulSet {
        self.resource
    }

    fn template(&self) -> Option<&PodTemplateSpec> {
        self.resource.spec.as_ref().map(|spec| &spec.template)
    }

    fn template_mut(&mut self) -> Option<&mut PodTemplateSpec> {
        self.resource.spec.as_mut().map(|spec| &mut spec.template)
    }
}

impl Workload for StatefulSetWorkload {
    fn identity(&self) -> WorkloadIdentity {
        WorkloadIdentity {
            kind: "StatefulSet".to_string(),
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
