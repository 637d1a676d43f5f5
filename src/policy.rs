//! Update policies.
//!
//! A policy decides whether a candidate tag supersedes the tag a container
//! currently runs. Policies are constructed once, at configuration time,
//! from the `bow.sh/policy` label; pattern compilation failures surface
//! there and never during a decision.

use std::collections::BTreeMap;
use std::fmt;

use glob::Pattern;
use regex::Regex;

use crate::error::{Error, Result};
use crate::labels::{MATCH_TAG_LABEL, POLICY_LABEL};
use crate::version::{BumpKind, TagVersion};

/// Maximum semver bump a [`Policy::Semver`] policy lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemverGate {
    /// Any strictly newer version
    All,
    /// Major, minor and patch bumps
    Major,
    /// Minor and patch bumps
    Minor,
    /// Patch bumps only
    Patch,
}

impl SemverGate {
    fn permits(self, bump: BumpKind) -> bool {
        match self {
            SemverGate::All => true,
            SemverGate::Major => {
                matches!(bump, BumpKind::Major | BumpKind::Minor | BumpKind::Patch)
            }
            SemverGate::Minor => matches!(bump, BumpKind::Minor | BumpKind::Patch),
            SemverGate::Patch => matches!(bump, BumpKind::Patch),
        }
    }

    fn label(self) -> &'static str {
        match self {
            SemverGate::All => "all",
            SemverGate::Major => "major",
            SemverGate::Minor => "minor",
            SemverGate::Patch => "patch",
        }
    }
}

/// Outcome of an accepted policy evaluation: the tag strings a plan reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Tag the container currently runs, as the plan should report it
    pub current: String,
    /// Tag the container moves to
    pub new: String,
}

/// A per-workload update policy.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Accept any candidate; with `match_tag` the candidate tag must equal
    /// the container's current tag exactly
    Force {
        /// Require an exact tag match
        match_tag: bool,
    },
    /// Accept candidates whose tag matches a shell-style wildcard pattern
    Glob {
        /// Compiled pattern from a `glob:<pat>` label
        pattern: Pattern,
    },
    /// Accept candidates whose tag matches a regular expression
    Regexp {
        /// Compiled pattern from a `regexp:<pat>` label
        pattern: Regex,
    },
    /// Accept strictly newer semantic versions within a bump gate
    Semver {
        /// Maximum permitted bump kind
        gate: SemverGate,
        /// Whether pre-release versions may participate on either side
        pre_releases: bool,
    },
}

impl Policy {
    /// Construct a policy from its label form.
    ///
    /// `match_tag` comes from the separate `bow.sh/match-tag` label and
    /// only affects the `force` policy.
    pub fn from_label(label: &str, match_tag: bool) -> Result<Self> {
        if let Some(pattern) = label.strip_prefix("glob:") {
            return Ok(Policy::Glob {
                pattern: Pattern::new(pattern)?,
            });
        }
        if let Some(pattern) = label.strip_prefix("regexp:") {
            return Ok(Policy::Regexp {
                pattern: Regex::new(pattern)?,
            });
        }
        match label {
            "all" => Ok(Policy::semver(SemverGate::All)),
            "major" => Ok(Policy::semver(SemverGate::Major)),
            "minor" => Ok(Policy::semver(SemverGate::Minor)),
            "patch" => Ok(Policy::semver(SemverGate::Patch)),
            "force" => Ok(Policy::Force { match_tag }),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }

    /// Construct a policy from a workload's labels, or `None` when the
    /// workload does not carry a policy label.
    pub fn from_workload_labels(labels: &BTreeMap<String, String>) -> Result<Option<Self>> {
        let Some(label) = labels.get(POLICY_LABEL) else {
            return Ok(None);
        };
        let match_tag = labels.get(MATCH_TAG_LABEL).is_some_and(|v| v == "true");
        Self::from_label(label, match_tag).map(Some)
    }

    fn semver(gate: SemverGate) -> Self {
        Policy::Semver {
            gate,
            pre_releases: false,
        }
    }

    /// Decide whether `candidate_tag` supersedes `current_tag`.
    ///
    /// Returns the tag strings the plan should carry when accepted; for
    /// semver policies these are rendered versions preserving each side's
    /// original `v` prefix.
    pub fn evaluate(&self, current_tag: &str, candidate_tag: &str) -> Option<TagMatch> {
        match self {
            Policy::Force { match_tag: false } => Some(TagMatch {
                current: current_tag.to_string(),
                new: candidate_tag.to_string(),
            }),
            Policy::Force { match_tag: true } => (current_tag == candidate_tag).then(|| TagMatch {
                current: candidate_tag.to_string(),
                new: candidate_tag.to_string(),
            }),
            Policy::Glob { pattern } => pattern.matches(candidate_tag).then(|| TagMatch {
                current: current_tag.to_string(),
                new: candidate_tag.to_string(),
            }),
            Policy::Regexp { pattern } => pattern.is_match(candidate_tag).then(|| TagMatch {
                current: current_tag.to_string(),
                new: candidate_tag.to_string(),
            }),
            Policy::Semver { gate, pre_releases } => {
                let current = TagVersion::parse(current_tag)?;
                let candidate = TagVersion::parse(candidate_tag)?;
                if !pre_releases && (current.is_prerelease() || candidate.is_prerelease()) {
                    return None;
                }
                if candidate.compare(&current) != std::cmp::Ordering::Greater {
                    return None;
                }
                gate.permits(current.bump_to(&candidate)).then(|| TagMatch {
                    current: current.to_string(),
                    new: candidate.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Force { .. } => write!(f, "force"),
            Policy::Glob { pattern } => write!(f, "glob:{}", pattern.as_str()),
            Policy::Regexp { pattern } => write!(f, "regexp:{}", pattern.as_str()),
            Policy::Semver { gate, .. } => write!(f, "{}", gate.label()),
        }
    }
}

impl PartialEq for Policy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Policy::Force { match_tag: a }, Policy::Force { match_tag: b }) => a == b,
            (Policy::Glob { pattern: a }, Policy::Glob { pattern: b }) => a == b,
            (Policy::Regexp { pattern: a }, Policy::Regexp { pattern: b }) => {
                a.as_str() == b.as_str()
            }
            (
                Policy::Semver {
                    gate: a,
                    pre_releases: ap,
                },
                Policy::Semver {
                    gate: b,
                    pre_releases: bp,
                },
            ) => a == b && ap == bp,
            _ => false,
        }
    }
}
