//! Convenience re-exports.

pub use crate::action::{BeeAction, GuardAction, ScoutAction, WorkerAction};
pub use crate::census::RoleCensus;
pub use crate::clock::{elapsed_secs, Clock, ManualClock, SystemClock};
pub use crate::error::{HiveError, Result};
pub use crate::event::SwarmEvent;
pub use crate::stimulus::{
    Discovery, DiscoverySource, QuietStimulus, Stimulus, ThreatDetector, ThreatReport, WorkValuer,
};
pub use crate::types::*;
