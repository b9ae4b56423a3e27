use crate::config::SceneSettings;
use crate::duration::parse_duration;
use crate::source::{parse_source_list, SourceEntry};
use crate::state::SceneStatus;
use crate::types::TimeMs;
use serde::{Deserialize, Serialize};

/// Where a scene's sequencer currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
	#[default]
	Idle,
	Showing,
	Gap,
	Cooldown,
}

impl Phase {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Showing => "showing",
			Self::Gap => "gap",
			Self::Cooldown => "cooldown",
		}
	}
}

impl std::fmt::Display for Phase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Parsed configuration and run state of one scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSequence {
	pub(crate) enabled: bool,
	/// Raw list text; reparsed on every evaluation so live edits apply immediately
	pub(crate) sources_text: String,
	pub(crate) gap: TimeMs,
	pub(crate) cooldown: TimeMs,
	pub(crate) tick_interval: TimeMs,
	pub(crate) trigger_chance: u32,

	pub(crate) phase: Phase,
	/// 1-based position in the current pass, 0 while idle
	pub(crate) index: usize,
	pub(crate) phase_deadline: TimeMs,
	pub(crate) next_random_check: TimeMs,
	/// Source this sequencer last made visible
	pub(crate) shown: Option<String>,
}

impl SceneSequence {
	/// Build from stored settings with the run state reset to idle.
	pub fn new(settings: &SceneSettings, now: TimeMs) -> Self {
		let mut sequence = Self {
			enabled: false,
			sources_text: String::new(),
			gap: 0,
			cooldown: 0,
			tick_interval: 0,
			trigger_chance: 0,
			phase: Phase::Idle,
			index: 0,
			phase_deadline: now,
			next_random_check: now,
			shown: None,
		};
		sequence.apply_settings(settings);
		sequence.reset(now);
		sequence
	}

	/// Replace the configuration fields, leaving the run state untouched.
	pub fn apply_settings(&mut self, settings: &SceneSettings) {
		self.enabled = settings.enabled;
		self.sources_text.clone_from(&settings.sources);
		self.gap = parse_duration(&settings.gap);
		self.cooldown = parse_duration(&settings.cooldown);
		self.tick_interval = parse_duration(&settings.tick);
		self.trigger_chance = settings.trigger_chance.clamp(1, 100);
	}

	/// Back to idle with the random check re-armed one tick interval out.
	pub fn reset(&mut self, now: TimeMs) {
		self.phase = Phase::Idle;
		self.index = 0;
		self.phase_deadline = now;
		self.next_random_check = now.saturating_add(self.tick_interval);
		self.shown = None;
	}

	pub fn sources(&self) -> Vec<SourceEntry> {
		parse_source_list(&self.sources_text)
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn phase_deadline(&self) -> TimeMs {
		self.phase_deadline
	}

	pub fn next_random_check(&self) -> TimeMs {
		self.next_random_check
	}

	pub fn gap(&self) -> TimeMs {
		self.gap
	}

	pub fn cooldown(&self) -> TimeMs {
		self.cooldown
	}

	pub fn tick_interval(&self) -> TimeMs {
		self.tick_interval
	}

	pub fn trigger_chance(&self) -> u32 {
		self.trigger_chance
	}

	pub fn shown_source(&self) -> Option<&str> {
		self.shown.as_deref()
	}

	pub fn status(&self, scene: &str) -> SceneStatus {
		SceneStatus {
			scene: scene.to_string(),
			enabled: self.enabled,
			phase: self.phase,
			index: self.index,
			phase_deadline: self.phase_deadline,
			next_random_check: self.next_random_check,
			current_source: self.shown.clone(),
		}
	}
}
