//! Actions — what a caller asks a bee to do.
//!
//! Each role has its own payload. Optional fields carry injected stimulus;
//! when absent, the swarm asks its [`Stimulus`](crate::stimulus::Stimulus)
//! collaborator instead. Dispatch always follows the bee's current role: a
//! payload for another role is ignored and the bee acts on generated
//! stimulus.

use crate::stimulus::{Discovery, ThreatReport};
use crate::types::Role;
use serde::{Deserialize, Serialize};

/// Scout payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutAction {
    pub discovery: Option<Discovery>,
}

/// Worker payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerAction {
    /// Value of the completed work, in [0, 1].
    pub value: Option<f64>,
}

/// Guard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardAction {
    pub threat: Option<ThreatReport>,
}

/// A single action request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum BeeAction {
    Scout(ScoutAction),
    Worker(WorkerAction),
    /// Nurses need no input: they heal whoever is nearby and exhausted.
    Nurse,
    Guard(GuardAction),
    /// Anything a queen does triggers a broadcast.
    Queen,
}

impl BeeAction {
    /// An action with every stimulus left to the collaborator.
    pub fn generated(role: Role) -> Self {
        match role {
            Role::Scout => BeeAction::Scout(ScoutAction::default()),
            Role::Worker => BeeAction::Worker(WorkerAction::default()),
            Role::Nurse => BeeAction::Nurse,
            Role::Guard => BeeAction::Guard(GuardAction::default()),
            Role::Queen => BeeAction::Queen,
        }
    }

    pub fn scout(discovery: Discovery) -> Self {
        BeeAction::Scout(ScoutAction {
            discovery: Some(discovery),
        })
    }

    pub fn worker(value: f64) -> Self {
        BeeAction::Worker(WorkerAction { value: Some(value) })
    }

    pub fn nurse() -> Self {
        BeeAction::Nurse
    }

    pub fn guard(threat: ThreatReport) -> Self {
        BeeAction::Guard(GuardAction {
            threat: Some(threat),
        })
    }

    /// The role this payload was written for.
    pub fn role(&self) -> Role {
        match self {
            BeeAction::Scout(_) => Role::Scout,
            BeeAction::Worker(_) => Role::Worker,
            BeeAction::Nurse => Role::Nurse,
            BeeAction::Guard(_) => Role::Guard,
            BeeAction::Queen => Role::Queen,
        }
    }
}
