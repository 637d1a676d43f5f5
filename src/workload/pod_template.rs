//! Shared pod-template plumbing for the Kubernetes adapters.
//!
//! Every pod-template kind walks containers the same way: init containers
//! first, then main containers, with one continuous index space.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::ContainerImage;

pub(super) fn images(template: Option<&PodTemplateSpec>) -> Vec<ContainerImage> {
    let Some(spec) = template.and_then(|t| t.spec.as_ref()) else {
        return Vec::new();
    };
    let init = spec.init_containers.as_deref().unwrap_or_default();
    init.iter()
        .chain(spec.containers.iter())
        .enumerate()
        .map(|(index, container)| ContainerImage {
            index,
            image: container.image.clone().unwrap_or_default(),
        })
        .collect()
}

pub(super) fn set_image(template: Option<&mut PodTemplateSpec>, index: usize, image: &str) {
    let Some(spec) = template.and_then(|t| t.spec.as_mut()) else {
        return;
    };
    let init_len = spec.init_containers.as_ref().map_or(0, Vec::len);
    let target = if index < init_len {
        spec.init_containers
            .as_mut()
            .and_then(|containers| containers.get_mut(index))
    } else {
        spec.containers.get_mut(index - init_len)
    };
    if let Some(container) = target {
        container.image = Some(image.to_string());
    }
}

pub(super) fn annotations(template: Option<&PodTemplateSpec>) -> BTreeMap<String, String> {
    template
        .and_then(|t| t.metadata.as_ref())
        .and_then(|m| m.annotations.clone())
        .unwrap_or_default()
}

pub(super) fn set_annotations(
    template: Option<&mut PodTemplateSpec>,
    annotations: BTreeMap<String, String>,
) {
    let Some(template) = template else {
        return;
    };
    let metadata = template.metadata.get_or_insert_with(ObjectMeta::default);
    metadata.annotations = if annotations.is_empty() {
        None
    } else {
        Some(annotations)
    };
}
