//! Test fixtures and builder patterns for workloads.
//!
//! Test code is allowed to panic on failure; not every test target uses
//! every fixture.
#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetSpec, Deployment, DeploymentSpec, StatefulSet, StatefulSetSpec,
};
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec, JobTemplateSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use bow_operator::Workload;
use bow_operator::labels::UPDATE_TIME_ANNOTATION;

/// Builder for workload test fixtures across the supported kinds.
///
/// # Example
/// ```ignore
/// let deployment = WorkloadBuilder::new("dep-1")
///     .policy_label("all")
///     .pod_annotation("this", "that")
///     .image("gcr.io/v2-namespace/hello-world:1.1.1")
///     .deployment();
/// ```
#[derive(Clone, Debug)]
pub struct WorkloadBuilder {
    name: String,
    namespace: String,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    pod_annotations: BTreeMap<String, String>,
    init_images: Vec<String>,
    images: Vec<String>,
}

impl WorkloadBuilder {
    /// Create a new builder with the given workload name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "unittest".to_string(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            pod_annotations: BTreeMap::new(),
            init_images: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Set the namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add a workload label.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add the `bow.sh/policy` label.
    pub fn policy_label(self, policy: impl Into<String>) -> Self {
        self.label(bow_operator::labels::POLICY_LABEL, policy)
    }

    /// Add a workload annotation.
    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Add a pod template annotation.
    pub fn pod_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pod_annotations.insert(key.into(), value.into());
        self
    }

    /// Add a main container with the given image.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }

    /// Add an init container with the given image.
    pub fn init_image(mut self, image: impl Into<String>) -> Self {
        self.init_images.push(image.into());
        self
    }

    fn metadata(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.clone()),
            namespace: Some(self.namespace.clone()),
            labels: if self.labels.is_empty() {
                None
            } else {
                Some(self.labels.clone())
            },
            annotations: if self.annotations.is_empty() {
                None
            } else {
                Some(self.annotations.clone())
            },
            ..Default::default()
        }
    }

    fn pod_template(&self) -> PodTemplateSpec {
        let container = |image: &String| Container {
            image: Some(image.clone()),
            ..Default::default()
        };
        PodTemplateSpec {
            metadata: if self.pod_annotations.is_empty() {
                None
            } else {
                Some(ObjectMeta {
                    annotations: Some(self.pod_annotations.clone()),
                    ..Default::default()
                })
            },
            spec: Some(PodSpec {
                init_containers: if self.init_images.is_empty() {
                    None
                } else {
                    Some(self.init_images.iter().map(container).collect())
                },
                containers: self.images.iter().map(container).collect(),
                ..Default::default()
            }),
        }
    }

    /// Build a Deployment.
    pub fn deployment(&self) -> Deployment {
        Deployment {
            metadata: self.metadata(),
            spec: Some(DeploymentSpec {
                template: self.pod_template(),
                ..Default::default()
            }),
            status: None,
        }
    }

    /// Build a DaemonSet.
    pub fn daemon_set(&self) -> DaemonSet {
        DaemonSet {
            metadata: self.metadata(),
            spec: Some(DaemonSetSpec {
                template: self.pod_template(),
                ..Default::default()
            }),
            status: None,
        }
    }

    /// Build a StatefulSet.
    pub fn stateful_set(&self) -> StatefulSet {
        StatefulSet {
            metadata: self.metadata(),
            spec: Some(StatefulSetSpec {
                template: self.pod_template(),
                ..Default::default()
            }),
            status: None,
        }
    }

    /// Build a CronJob.
    pub fn cron_job(&self) -> CronJob {
        CronJob {
            metadata: self.metadata(),
            spec: Some(CronJobSpec {
                schedule: "0 3 * * *".to_string(),
                job_template: JobTemplateSpec {
                    metadata: None,
                    spec: Some(JobSpec {
                        template: self.pod_template(),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            status: None,
        }
    }
}

/// Assert the bookkeeping annotation was stamped, then strip it so plans
/// can be compared against pristine fixtures.
pub fn strip_update_time<W: Workload>(mut resource: W) -> W {
    let mut annotations = resource.spec_annotations();
    assert!(
        annotations.remove(UPDATE_TIME_ANNOTATION).is_some(),
        "missing {UPDATE_TIME_ANNOTATION} annotation on updated workload"
    );
    resource.set_spec_annotations(annotations);
    resource
}
