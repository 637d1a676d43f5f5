//! Label and annotation keys read or written by the engine.
//!
//! These strings are part of the external contract: workloads opt into
//! updates by carrying them, and downstream tooling greps for them.

/// Workload label selecting the update policy
/// (`all` / `major` / `minor` / `patch` / `force` / `glob:<pat>` / `regexp:<pat>`)
pub const POLICY_LABEL: &str = "bow.sh/policy";

/// Workload label; `"true"` makes a force policy require an exact tag match
pub const MATCH_TAG_LABEL: &str = "bow.sh/match-tag";

/// Pod-template annotation stamped by the engine on every accepted plan.
/// The value is the injected clock's current time; the write is what makes
/// the orchestrator observe a spec change and roll the workload.
pub const UPDATE_TIME_ANNOTATION: &str = "bow.sh/update-time";

/// Workload annotation carrying a poll schedule. Read by the trigger
/// subsystem only; the engine ignores it.
pub const POLL_SCHEDULE_ANNOTATION: &str = "bow.sh/poll-schedule";

/// Default schedule used when a workload enables polling without one
pub const POLL_DEFAULT_SCHEDULE: &str = "@every 1m";
