use crate::sequence::Phase;
use crate::types::TimeMs;
use serde::{Deserialize, Serialize};

/// Read-only view of one scene's sequencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStatus {
	pub scene: String,
	pub enabled: bool,
	pub phase: Phase,
	pub index: usize,
	pub phase_deadline: TimeMs,
	pub next_random_check: TimeMs,
	/// Source currently made visible by the sequencer
	pub current_source: Option<String>,
}

impl SceneStatus {
	pub fn is_running(&self) -> bool {
		self.phase != Phase::Idle
	}
}

/// Snapshot of every scene, published by the engine whenever it changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclerState {
	pub active_scene: Option<String>,
	pub only_active_scene: bool,
	pub scenes: Vec<SceneStatus>,
}

impl CyclerState {
	pub fn scene(&self, name: &str) -> Option<&SceneStatus> {
		self.scenes.iter().find(|s| s.scene == name)
	}

	pub fn running_count(&self) -> usize {
		self.scenes.iter().filter(|s| s.is_running()).count()
	}
}
