//! Update plans - what a decision would change, no I/O.

/// The proposed outcome of an update decision.
///
/// Plans are plain values: the engine creates them, the applier consumes
/// them immediately, nothing persists them. For multi-container workloads
/// `current_version` is the tag of the first matched container.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan<W> {
    /// The fully mutated workload, `None` when there is nothing to do
    pub resource: Option<W>,
    /// Tag observed before the update
    pub current_version: String,
    /// Tag the workload moves to
    pub new_version: String,
}

impl<W> UpdatePlan<W> {
    /// Plan describing "no update"
    pub fn empty() -> Self {
        Self {
            resource: None,
            current_version: String::new(),
            new_version: String::new(),
        }
    }

    /// Check if the plan carries no work
    pub fn is_empty(&self) -> bool {
        self.resource.is_none()
    }
}

impl<W> Default for UpdatePlan<W> {
    fn default() -> Self {
        Self::empty()
    }
}
