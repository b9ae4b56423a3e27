use crate::duration::normalize_duration;
use crate::error::Result;
use crate::source::normalize_source_list;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ADD_DURATION: &str = "00:00:06.000";
pub const DEFAULT_GAP: &str = "00:00:00.500";
pub const DEFAULT_COOLDOWN: &str = "00:00:04.000";
pub const DEFAULT_TICK: &str = "00:00:30.000";
pub const DEFAULT_TRIGGER_CHANCE: u32 = 20;

/// Persisted per-scene settings, stored as the operator typed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneSettings {
	/// Master switch for the scene
	pub enabled: bool,

	/// Newline-separated `name|duration` lines
	pub sources: String,

	/// Duration given to a source when it is appended to the list
	pub add_duration: String,

	/// Pause between two sources of the same pass
	pub gap: String,

	/// Pause after a full pass before the scene can trigger again
	pub cooldown: String,

	/// How often an idle scene rolls for a random start (zero disables rolling)
	pub tick: String,

	/// Chance in percent that a roll starts the sequence
	pub trigger_chance: u32,
}

impl Default for SceneSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			sources: String::new(),
			add_duration: DEFAULT_ADD_DURATION.to_string(),
			gap: DEFAULT_GAP.to_string(),
			cooldown: DEFAULT_COOLDOWN.to_string(),
			tick: DEFAULT_TICK.to_string(),
			trigger_chance: DEFAULT_TRIGGER_CHANCE,
		}
	}
}

impl SceneSettings {
	pub fn new(sources: impl Into<String>) -> Self {
		Self {
			sources: sources.into(),
			..Self::default()
		}
	}

	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn with_gap(mut self, gap: impl Into<String>) -> Self {
		self.gap = gap.into();
		self
	}

	pub fn with_cooldown(mut self, cooldown: impl Into<String>) -> Self {
		self.cooldown = cooldown.into();
		self
	}

	pub fn with_tick(mut self, tick: impl Into<String>) -> Self {
		self.tick = tick.into();
		self
	}

	pub fn with_trigger_chance(mut self, chance: u32) -> Self {
		self.trigger_chance = chance;
		self
	}

	/// Rewrite every duration field in canonical form and clamp the trigger chance.
	pub fn normalize(&mut self) {
		self.sources = normalize_source_list(&self.sources);
		self.add_duration = normalize_duration(&self.add_duration);
		self.gap = normalize_duration(&self.gap);
		self.cooldown = normalize_duration(&self.cooldown);
		self.tick = normalize_duration(&self.tick);
		self.trigger_chance = self.trigger_chance.clamp(1, 100);
	}

	/// Append a source using the configured add duration.
	pub fn push_source(&mut self, name: &str) {
		let line = format!("{}|{}", name.trim(), normalize_duration(&self.add_duration));
		if self.sources.trim().is_empty() {
			self.sources = line;
		} else {
			self.sources = format!("{}\n{line}", self.sources.trim_end());
		}
	}
}

/// Complete cycler configuration: one global flag plus settings per scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CyclerConfig {
	/// Only the scene currently on program advances or triggers
	pub only_active_scene: bool,

	/// Heartbeat period of the engine
	pub heartbeat_ms: u64,

	/// Settings keyed by scene name
	pub scenes: BTreeMap<String, SceneSettings>,
}

fn default_heartbeat() -> u64 {
	100 // 100ms heartbeat
}

impl Default for CyclerConfig {
	fn default() -> Self {
		Self {
			only_active_scene: false,
			heartbeat_ms: default_heartbeat(),
			scenes: BTreeMap::new(),
		}
	}
}

impl CyclerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_scene(mut self, scene: impl Into<String>, settings: SceneSettings) -> Self {
		self.scenes.insert(scene.into(), settings);
		self
	}

	pub fn with_only_active_scene(mut self, enabled: bool) -> Self {
		self.only_active_scene = enabled;
		self
	}

	pub fn with_heartbeat(mut self, heartbeat_ms: u64) -> Self {
		self.heartbeat_ms = heartbeat_ms;
		self
	}

	/// Heartbeat period, never zero
	pub fn heartbeat(&self) -> Duration {
		Duration::from_millis(self.heartbeat_ms.max(1))
	}

	pub fn normalize(&mut self) {
		for settings in self.scenes.values_mut() {
			settings.normalize();
		}
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}

	/// Load from `path`, falling back to defaults when the file does not exist yet.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if path.exists() {
			Self::load(path)
		} else {
			Ok(Self::default())
		}
	}

	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let raw = serde_json::to_string_pretty(self)?;
		std::fs::write(path, raw)?;
		Ok(())
	}
}
