//! Shared types used across the hive crates.

use crate::error::HiveError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a bee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeeId(pub Uuid);

impl BeeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id, for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(0xB0B0, seed))
    }
}

impl Default for BeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bee-{}", &self.0.simple().to_string()[..8])
    }
}

/// Unique identifier for a flower (work source).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowerId(pub Uuid);

impl FlowerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flower-{}", &self.0.simple().to_string()[..8])
    }
}

/// Unique identifier for a pheromone trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrailId(pub Uuid);

impl TrailId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrailId {
    fn default() -> Self {
        Self::new()
    }
}

/// A point in the swarm's 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Euclidean distance.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// The job a bee currently performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Scout,
    Worker,
    Nurse,
    Guard,
    Queen,
}

impl Role {
    /// The rebalanced roles, in tie-break order. Queens never shift.
    pub const CASTES: [Role; 4] = [Role::Scout, Role::Worker, Role::Nurse, Role::Guard];

    /// Every role, queens last.
    pub const ALL: [Role; 5] = [
        Role::Scout,
        Role::Worker,
        Role::Nurse,
        Role::Guard,
        Role::Queen,
    ];

    /// Share of the whole population this role should hold.
    pub fn target_ratio(&self) -> f64 {
        match self {
            Role::Scout => 0.1,
            Role::Worker => 0.6,
            Role::Nurse => 0.2,
            Role::Guard => 0.1,
            Role::Queen => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Scout => "scout",
            Role::Worker => "worker",
            Role::Nurse => "nurse",
            Role::Guard => "guard",
            Role::Queen => "queen",
        }
    }

    pub fn is_caste(&self) -> bool {
        !matches!(self, Role::Queen)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scout" => Ok(Role::Scout),
            "worker" => Ok(Role::Worker),
            "nurse" => Ok(Role::Nurse),
            "guard" => Ok(Role::Guard),
            "queen" => Ok(Role::Queen),
            other => Err(HiveError::UnknownRole(other.to_string())),
        }
    }
}

/// Weight of the biometrics signal in flower quality.
pub const BIOMETRICS_WEIGHT: f64 = 0.3;
/// Weight of the activity signal in flower quality.
pub const ACTIVITY_WEIGHT: f64 = 0.3;
/// Weight of the sovereignty score in flower quality.
pub const SOVEREIGNTY_WEIGHT: f64 = 0.4;

/// Input for spawning a flower.
///
/// `biometrics` and `activity` only count by presence; their content is
/// kept as flower metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowerSeed {
    #[serde(default)]
    pub biometrics: Option<Value>,
    #[serde(default)]
    pub activity: Option<Value>,
    #[serde(default)]
    pub sovereignty_score: f64,
    /// Where to place the flower. Random when absent.
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl FlowerSeed {
    pub fn new(sovereignty_score: f64) -> Self {
        Self {
            sovereignty_score,
            ..Self::default()
        }
    }

    pub fn with_biometrics(mut self, biometrics: impl Into<Value>) -> Self {
        self.biometrics = Some(biometrics.into());
        self
    }

    pub fn with_activity(mut self, activity: impl Into<Value>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Quality score in [0, 1].
    pub fn quality(&self) -> f64 {
        let present = |v: &Option<Value>| match v {
            None | Some(Value::Null) => 0.0,
            Some(_) => 1.0,
        };
        let sovereignty = if self.sovereignty_score.is_nan() {
            0.0
        } else {
            self.sovereignty_score
        };
        let raw = BIOMETRICS_WEIGHT * present(&self.biometrics)
            + ACTIVITY_WEIGHT * present(&self.activity)
            + SOVEREIGNTY_WEIGHT * sovereignty;
        raw.clamp(0.0, 1.0)
    }
}

/// A scored work source that bees service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flower {
    pub id: FlowerId,
    pub position: Position,
    pub quality: f64,
    /// Live count of bees assigned to this flower.
    pub bee_count: usize,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// A single agent in the swarm.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bee {
    pub id: BeeId,
    pub role: Role,
    pub position: Position,
    /// In [0, 1]. Spent per action, restored by nurses.
    pub energy: f64,
    /// In [0, 1].
    pub pheromone_load: f64,
    /// Lookup-only reference; the flower may no longer exist.
    pub flower: Option<FlowerId>,
    pub last_active: DateTime<Utc>,
    #[serde(skip)]
    pub last_pulse: Option<Arc<QueenPulse>>,
}

impl Bee {
    pub fn new(role: Role, position: Position, now: DateTime<Utc>) -> Self {
        Self {
            id: BeeId::new(),
            role,
            position,
            energy: 1.0,
            pheromone_load: 0.0,
            flower: None,
            last_active: now,
            last_pulse: None,
        }
    }

    pub fn with_id(mut self, id: BeeId) -> Self {
        self.id = id;
        self
    }
}

/// A decaying spatial signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub id: TrailId,
    pub position: Position,
    #[serde(rename = "type")]
    pub kind: String,
    /// Always within [0, 1].
    pub intensity: f64,
    pub flower: Option<FlowerId>,
    /// Free-form qualifier, e.g. the threat kind behind a `threat_detected` trail.
    pub detail: Option<String>,
    pub deposits: u64,
    pub created_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
    /// Point up to which decay has already been applied.
    pub decayed_at: DateTime<Utc>,
}

/// Coarse classification of the swarm's aggregate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Threat,
    Guarding,
    Healing,
    Exploring,
    Sync,
    Foraging,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Threat => "threat",
            Mood::Guarding => "guarding",
            Mood::Healing => "healing",
            Mood::Exploring => "exploring",
            Mood::Sync => "sync",
            Mood::Foraging => "foraging",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threat" => Ok(Mood::Threat),
            "guarding" => Ok(Mood::Guarding),
            "healing" => Ok(Mood::Healing),
            "exploring" => Ok(Mood::Exploring),
            "sync" => Ok(Mood::Sync),
            "foraging" => Ok(Mood::Foraging),
            other => Err(HiveError::UnknownMood(other.to_string())),
        }
    }
}

/// Aggregate snapshot recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmState {
    pub timestamp: DateTime<Utc>,
    pub bee_count: usize,
    pub flower_count: usize,
    pub trail_count: usize,
    pub mood: Mood,
    /// In [0, 1]; 1.0 means the role mix matches its targets exactly.
    pub coherence: f64,
    pub last_broadcast: Option<DateTime<Utc>>,
}

/// A queen broadcast. Bees hold it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueenPulse {
    pub mood: Mood,
    pub coherence: f64,
    pub bee_count: usize,
    pub flower_count: usize,
    pub signal: String,
    pub sent_at: DateTime<Utc>,
}

/// Summed trail intensity for one trail type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub intensity: f64,
}

/// Outcome of an emergent-consensus query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: String,
    pub confidence: f64,
}

impl Decision {
    pub const WAIT: &'static str = "wait";
    pub const EXPLORE: &'static str = "explore";

    pub fn wait() -> Self {
        Self {
            decision: Self::WAIT.to_string(),
            confidence: 0.0,
        }
    }

    pub fn explore(confidence: f64) -> Self {
        Self {
            decision: Self::EXPLORE.to_string(),
            confidence,
        }
    }
}
