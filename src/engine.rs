//! The update decision engine.
//!
//! Given a policy, a candidate image reference and a workload, decide
//! whether the workload should move to the candidate and produce the
//! mutated workload if so. Pure computation: the injected clock is the
//! only source of non-determinism, and the input workload is never
//! touched - mutations happen on a clone carried by the plan.

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::image::ImageRef;
use crate::labels::UPDATE_TIME_ANNOTATION;
use crate::plan::UpdatePlan;
use crate::policy::{Policy, TagMatch};
use crate::workload::Workload;

/// Decides updates for workloads.
#[derive(Debug, Clone)]
pub struct UpdateEngine<C = SystemClock> {
    clock: C,
}

impl UpdateEngine<SystemClock> {
    /// Engine stamping plans with the system time
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for UpdateEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> UpdateEngine<C> {
    /// Engine with an injected clock
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Check whether `workload` should be updated to `candidate` under
    /// `policy`.
    ///
    /// Walks init and main containers in declaration order; a container
    /// participates when its image parses, points at the candidate's
    /// repository and the policy accepts the tag pair. Every matched
    /// container is rewritten to the candidate's canonical form and the
    /// `bow.sh/update-time` annotation is stamped into the pod template -
    /// also when the image string itself did not change, since the
    /// annotation bump is what triggers the rollout under force policies.
    ///
    /// Containers whose image does not parse are skipped, not fatal.
    pub fn check_for_update<W>(
        &self,
        policy: &Policy,
        candidate: &ImageRef,
        workload: &W,
    ) -> Result<(UpdatePlan<W>, bool)>
    where
        W: Workload + Clone,
    {
        let identity = workload.identity();

        // Digest-push candidates carry no tag and never produce a plan
        if candidate.tag().is_empty() {
            debug!(
                workload = %identity,
                image = %candidate,
                "candidate has no tag, skipping"
            );
            return Ok((UpdatePlan::empty(), false));
        }

        let mut matched: Vec<(usize, TagMatch)> = Vec::new();
        for container in workload.containers() {
            let image = match ImageRef::parse(&container.image) {
                Ok(image) => image,
                Err(err) => {
                    debug!(
                        workload = %identity,
                        image = %container.image,
                        error = %err,
                        "skipping container with unparseable image"
                    );
                    continue;
                }
            };
            if !image.same_repository(candidate) {
                continue;
            }
            let Some(outcome) = policy.evaluate(image.tag(), candidate.tag()) else {
                debug!(
                    workload = %identity,
                    policy = %policy,
                    current = image.tag(),
                    candidate = candidate.tag(),
                    "policy rejected candidate tag"
                );
                continue;
            };
            matched.push((container.index, outcome));
        }

        // The first match decides what the plan reports
        let Some((_, first)) = matched.first() else {
            return Ok((UpdatePlan::empty(), false));
        };
        let current_version = first.current.clone();
        let new_version = first.new.clone();

        let mut updated = workload.clone();
        let rewritten = candidate.canonical();
        for (index, _) in &matched {
            updated.set_container_image(*index, &rewritten);
        }

        let mut annotations = updated.spec_annotations();
        annotations.insert(
            UPDATE_TIME_ANNOTATION.to_string(),
            self.clock.now().to_string(),
        );
        updated.set_spec_annotations(annotations);

        info!(
            workload = %identity,
            policy = %policy,
            current = %current_version,
            new = %new_version,
            containers = matched.len(),
            "update plan created"
        );

        Ok((
            UpdatePlan {
                resource: Some(updated),
                current_version,
                new_version,
            },
            true,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::workload::HelmReleaseWorkload;

    fn engine() -> UpdateEngine<FixedClock> {
        UpdateEngine::with_clock(FixedClock::epoch())
    }

    #[test]
    fn test_untagged_candidate_is_rejected() {
        let candidate = ImageRef::from_parts(None, "karolisr/bow", "").unwrap();
        let release = HelmReleaseWorkload::new("bow", "default").with_image("karolisr/bow:latest");

        let (plan, should_update) = engine()
            .check_for_update(&Policy::Force { match_tag: false }, &candidate, &release)
            .unwrap();
        assert!(!should_update);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_no_matching_repository_leaves_plan_empty() {
        let candidate = ImageRef::parse("gcr.io/ns/hello-world:latest").unwrap();
        let release = HelmReleaseWorkload::new("bow", "default").with_image("gcr.io/ns/goodbye:1.0.0");

        let (plan, should_update) = engine()
            .check_for_update(&Policy::Force { match_tag: false }, &candidate, &release)
            .unwrap();
        assert!(!should_update);
        assert_eq!(plan, UpdatePlan::empty());
    }

    #[test]
    fn test_annotation_is_stamped_with_clock_time() {
        let candidate = ImageRef::parse("gcr.io/ns/hello-world:1.1.2").unwrap();
        let release =
            HelmReleaseWorkload::new("hello", "default").with_image("gcr.io/ns/hello-world:1.1.1");

        let (plan, should_update) = engine()
            .check_for_update(&Policy::from_label("all", false).unwrap(), &candidate, &release)
            .unwrap();
        assert!(should_update);

        let updated = plan.resource.unwrap();
        assert_eq!(
            updated.spec_annotations().get(UPDATE_TIME_ANNOTATION),
            Some(&"1970-01-01T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_unparseable_container_is_skipped() {
        let candidate = ImageRef::parse("gcr.io/ns/hello-world:1.1.2").unwrap();
        let release = HelmReleaseWorkload::new("hello", "default")
            .with_image("")
            .with_image("gcr.io/ns/hello-world:1.1.1");

        let (plan, should_update) = engine()
            .check_for_update(&Policy::from_label("all", false).unwrap(), &candidate, &release)
            .unwrap();
        assert!(should_update);

        let updated = plan.resource.unwrap();
        assert_eq!(updated.images()[0], "");
        assert_eq!(updated.images()[1], "gcr.io/ns/hello-world:1.1.2");
    }
}
