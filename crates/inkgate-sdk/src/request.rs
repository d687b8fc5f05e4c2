//! Decision request type

use inkgate_core::{DecisionContext, ScopeSelector};
use inkgate_store::Actor;
use serde::{Deserialize, Serialize};

/// A decision request submitted by the booking/intake subsystem
///
/// Idempotent by construction: the same context against the same rule set
/// always yields the same decision. The only clock read in the flow is
/// the `evaluated_at` stamp on the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Workspace/artist pair the booking targets
    pub scope: ScopeSelector,

    /// Declared answers, inferred attributes and computed risk scores
    pub context: DecisionContext,

    /// Actor recorded against the decision's audit entry; defaults to the
    /// intake subsystem
    #[serde(default)]
    pub actor: Option<Actor>,
}

impl DecisionRequest {
    pub fn new(scope: ScopeSelector, context: DecisionContext) -> Self {
        Self {
            scope,
            context,
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }
}
