//! Swarm events — typed notifications emitted by the coordinator.
//!
//! Dashboards, voice layers and logs observe the swarm through these.
//! Every variant serializes with an `event` tag and camelCase fields so it
//! can go straight onto a websocket.

use crate::stimulus::ThreatReport;
use crate::types::{BeeId, FlowerId, Mood, Role, SwarmState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SwarmEvent {
    /// A scout found something worth marking with a trail.
    #[serde(rename_all = "camelCase")]
    Discovery {
        scout: BeeId,
        quality: f64,
        work_source_id: Option<FlowerId>,
    },
    /// A bee moved from an over-represented role to an under-represented one.
    #[serde(rename_all = "camelCase")]
    RoleShift {
        agent: BeeId,
        from: Role,
        to: Role,
        reason: String,
    },
    /// A guard sensed a threat above 0.7 and called in reinforcements.
    #[serde(rename_all = "camelCase")]
    Threat {
        guard: BeeId,
        threat: ThreatReport,
        reinforcements: usize,
    },
    /// A nurse restored an exhausted neighbor.
    #[serde(rename_all = "camelCase")]
    Healing { nurse: BeeId, target: BeeId },
    #[serde(rename_all = "camelCase")]
    BeeSpawned {
        id: BeeId,
        role: Role,
        target: Option<FlowerId>,
    },
    #[serde(rename_all = "camelCase")]
    FlowerSpawned { id: FlowerId, quality: f64 },
    #[serde(rename_all = "camelCase")]
    QueenPulse {
        mood: Mood,
        coherence: f64,
        bee_count: usize,
        flower_count: usize,
        signal: String,
    },
    /// Emitted once per tick.
    StateUpdate(SwarmState),
    /// The weakest bee made room for a new spawn.
    #[serde(rename_all = "camelCase")]
    BeeEvicted { id: BeeId, role: Role, energy: f64 },
}

impl SwarmEvent {
    /// The wire tag of this event.
    pub fn name(&self) -> &'static str {
        match self {
            SwarmEvent::Discovery { .. } => "discovery",
            SwarmEvent::RoleShift { .. } => "roleShift",
            SwarmEvent::Threat { .. } => "threat",
            SwarmEvent::Healing { .. } => "healing",
            SwarmEvent::BeeSpawned { .. } => "beeSpawned",
            SwarmEvent::FlowerSpawned { .. } => "flowerSpawned",
            SwarmEvent::QueenPulse { .. } => "queenPulse",
            SwarmEvent::StateUpdate(_) => "stateUpdate",
            SwarmEvent::BeeEvicted { .. } => "beeEvicted",
        }
    }
}
