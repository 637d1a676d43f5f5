//! Helm release adapter.
//!
//! Releases declare the images they run under chart values paths rather
//! than in a pod template. The adapter carries them as an ordered list so
//! the engine treats a release like any multi-container workload; the
//! bookkeeping annotation lands in the release's update metadata, which
//! the applier pushes back as a values override on upgrade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContainerImage, Workload, WorkloadIdentity};

/// A Helm release viewed through the workload contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HelmReleaseWorkload {
    name: String,
    namespace: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
    #[serde(default)]
    update_metadata: BTreeMap<String, String>,
    #[serde(default)]
    images: Vec<String>,
}

impl HelmReleaseWorkload {
    /// Create a release with no tracked images
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Track an image declared in the release's values
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }

    /// Attach a label (policy labels live here, as in chart values)
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Attach an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Tracked images in declaration order
    pub fn images(&self) -> &[String] {
        &self.images
    }
}

impl Workload for HelmReleaseWorkload {
    fn identity(&self) -> WorkloadIdentity {
        WorkloadIdentity {
            kind: "HelmRelease".to_string(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    fn labels(&self) -> BTreeMap<String, String> {
        self.labels.clone()
    }

    fn annotations(&self) -> BTreeMap<String, String> {
        self.annotations.clone()
    }

    fn containers(&self) -> Vec<ContainerImage> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, image)| ContainerImage {
                index,
                image: image.clone(),
            })
            .collect()
    }

    fn set_container_image(&mut self, index: usize, image: &str) {
        if let Some(slot) = self.images.get_mut(index) {
            *slot = image.to_string();
        }
    }

    fn spec_annotations(&self) -> BTreeMap<String, String> {
        self.update_metadata.clone()
    }

    fn set_spec_annotations(&mut self, annotations: BTreeMap<String, String>) {
        self.update_metadata = annotations;
    }
}
