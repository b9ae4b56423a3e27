//! Timed source cycling for scene-based stream composition.
//!
//! Each scene owns an ordered list of sources that are shown one at a time, with a gap
//! between items and a cooldown after a full pass. Passes start manually or from a
//! chance-gated random roll. A single [`Scheduler`] evaluates every scene on a shared
//! heartbeat; [`SceneCycler`] runs it as a tokio actor.

pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod handle;
pub mod provider;
pub mod random;
pub mod scheduler;
pub mod sequence;
pub mod source;
pub mod state;
pub mod types;

pub use config::{CyclerConfig, SceneSettings};
pub use duration::{format_duration, normalize_duration, parse_duration};
pub use engine::{CyclerCommand, CyclerEngine};
pub use error::{CyclerError, Result};
pub use handle::SceneCycler;
pub use provider::{InMemorySceneGraph, Roster, RosterScene, SceneGraph, VisibilityChange};
pub use random::{PercentRoll, ScriptedRolls, ThreadRoll};
pub use scheduler::Scheduler;
pub use sequence::{Phase, SceneSequence};
pub use source::{format_source_list, normalize_source_list, parse_source_list, SourceEntry};
pub use state::{CyclerState, SceneStatus};
pub use types::{SceneName, TimeMs};
