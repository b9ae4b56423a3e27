use crate::config::{CyclerConfig, SceneSettings};
use crate::provider::SceneGraph;
use crate::random::PercentRoll;
use crate::sequence::{Phase, SceneSequence};
use crate::source::SourceEntry;
use crate::state::{CyclerState, SceneStatus};
use crate::types::TimeMs;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Per-scene sequencers evaluated together on every heartbeat.
///
/// All time values are caller-supplied milliseconds on one monotonic clock; the
/// scheduler never reads a clock itself, which keeps every tick deterministic.
pub struct Scheduler<G, R> {
	graph: G,
	rng: R,
	config: CyclerConfig,
	scenes: BTreeMap<String, SceneSequence>,
	active_scene: Option<String>,
}

impl<G: SceneGraph, R: PercentRoll> Scheduler<G, R> {
	/// Create an empty scheduler. Call [`Scheduler::load`] to populate scenes.
	pub fn new(graph: G, rng: R) -> Self {
		let active_scene = graph.current_active_scene();
		Self {
			graph,
			rng,
			config: CyclerConfig::default(),
			scenes: BTreeMap::new(),
			active_scene,
		}
	}

	pub fn with_config(graph: G, rng: R, config: CyclerConfig, now: TimeMs) -> Self {
		let mut scheduler = Self::new(graph, rng);
		scheduler.load(config, now);
		scheduler
	}

	/// (Re)load configuration against the current scene roster.
	///
	/// Every in-flight sequence is abandoned: all scenes go back to idle, the source
	/// each sequencer had on screen is hidden, and so is every listed source. Settings stored for scenes missing from the roster
	/// stay in the configuration but get no sequencer.
	pub fn load(&mut self, mut config: CyclerConfig, now: TimeMs) {
		for (scene, sequence) in &mut self.scenes {
			hide_shown(scene, sequence, &mut self.graph);
		}

		let roster = self.graph.list_scenes();
		let mut scenes = BTreeMap::new();

		for scene in roster {
			let settings = config.scenes.entry(scene.clone()).or_default();
			settings.normalize();

			let sequence = SceneSequence::new(settings, now);
			for entry in sequence.sources() {
				self.graph.set_visible(&scene, &entry.name, false);
			}
			scenes.insert(scene, sequence);
		}

		for (scene, settings) in config.scenes.iter_mut().filter(|(name, _)| !scenes.contains_key(*name)) {
			debug!(scene = %scene, "Scene not in roster, keeping settings without a sequencer");
			settings.normalize();
		}

		info!(
			scenes = scenes.len(),
			enabled = scenes.values().filter(|s| s.is_enabled()).count(),
			only_active_scene = config.only_active_scene,
			"Cycler configuration loaded"
		);

		self.scenes = scenes;
		self.config = config;
		self.refresh_active_scene();
	}

	/// Evaluate every enabled scene once.
	pub fn tick(&mut self, now: TimeMs) {
		let only_active = self.config.only_active_scene;
		for (scene, sequence) in &mut self.scenes {
			if !sequence.enabled {
				continue;
			}
			if only_active && self.active_scene.as_deref() != Some(scene.as_str()) {
				continue;
			}
			advance(scene, sequence, now, &mut self.graph, &mut self.rng);
		}
	}

	/// Start a pass on one scene.
	///
	/// Returns `false` without side effects when the scene is unknown, disabled, not
	/// idle, has an empty list, or is filtered out by active-scene scoping.
	pub fn start_sequence(&mut self, scene: &str, now: TimeMs) -> bool {
		if self.config.only_active_scene && self.active_scene.as_deref() != Some(scene) {
			return false;
		}
		match self.scenes.get_mut(scene) {
			Some(sequence) if sequence.enabled => begin(scene, sequence, now, &mut self.graph),
			_ => false,
		}
	}

	/// Manual "start now" request. Returns how many scenes started.
	///
	/// Without scoping every enabled scene is tried. With active-scene scoping only the
	/// first enabled scene matching the active scene is tried.
	pub fn trigger(&mut self, now: TimeMs) -> usize {
		let only_active = self.config.only_active_scene;
		let mut started = 0;

		for (scene, sequence) in &mut self.scenes {
			if !sequence.enabled {
				continue;
			}
			if only_active && self.active_scene.as_deref() != Some(scene.as_str()) {
				continue;
			}
			if begin(scene, sequence, now, &mut self.graph) {
				started += 1;
			}
			if only_active {
				break;
			}
		}

		debug!(started, "Manual trigger handled");
		started
	}

	/// Live edit of one scene's settings. Run state is kept; a new source list is
	/// picked up on the next evaluation. Disabling a scene stops its pass: the shown
	/// source is hidden and the scene goes back to idle. Returns `false` for scenes
	/// without a sequencer.
	pub fn edit_scene(&mut self, scene: &str, mut settings: SceneSettings, now: TimeMs) -> bool {
		let Some(sequence) = self.scenes.get_mut(scene) else {
			return false;
		};
		settings.normalize();

		let disabling = sequence.enabled && !settings.enabled;
		sequence.apply_settings(&settings);
		if disabling {
			hide_shown(scene, sequence, &mut self.graph);
			sequence.reset(now);
			info!(scene, "Scene disabled, sequence stopped");
		}
		self.config.scenes.insert(scene.to_string(), settings);
		true
	}

	pub fn set_only_active_scene(&mut self, enabled: bool) {
		self.config.only_active_scene = enabled;
	}

	pub fn set_active_scene(&mut self, scene: Option<String>) {
		if self.active_scene != scene {
			debug!("Active scene changed: {:?} -> {:?}", self.active_scene, scene);
			self.active_scene = scene;
		}
	}

	/// Pull the active scene from the scene graph (on scene-change events).
	pub fn refresh_active_scene(&mut self) {
		let scene = self.graph.current_active_scene().filter(|s| !s.is_empty());
		self.set_active_scene(scene);
	}

	pub fn active_scene(&self) -> Option<&str> {
		self.active_scene.as_deref()
	}

	pub fn config(&self) -> &CyclerConfig {
		&self.config
	}

	pub fn sequence(&self, scene: &str) -> Option<&SceneSequence> {
		self.scenes.get(scene)
	}

	pub fn graph(&self) -> &G {
		&self.graph
	}

	pub fn graph_mut(&mut self) -> &mut G {
		&mut self.graph
	}

	pub fn status(&self) -> Vec<SceneStatus> {
		self.scenes.iter().map(|(scene, sequence)| sequence.status(scene)).collect()
	}

	pub fn snapshot(&self) -> CyclerState {
		CyclerState {
			active_scene: self.active_scene.clone(),
			only_active_scene: self.config.only_active_scene,
			scenes: self.status(),
		}
	}
}

/// One state machine step for one scene.
fn advance<G: SceneGraph, R: PercentRoll>(scene: &str, sequence: &mut SceneSequence, now: TimeMs, graph: &mut G, rng: &mut R) {
	match sequence.phase {
		Phase::Idle => {
			if sequence.tick_interval == 0 || now < sequence.next_random_check {
				return;
			}
			sequence.next_random_check = now.saturating_add(sequence.tick_interval);

			let roll = rng.roll();
			if roll <= sequence.trigger_chance {
				debug!(scene, roll, chance = sequence.trigger_chance, "Random check passed");
				begin(scene, sequence, now, graph);
			}
		}

		Phase::Showing => {
			if now < sequence.phase_deadline {
				return;
			}

			let sources = sequence.sources();
			if sequence.index == 0 || sequence.index > sources.len() {
				debug!(scene, index = sequence.index, len = sources.len(), "Source list shrank mid-sequence, back to idle");
				hide_shown(scene, sequence, graph);
				sequence.phase = Phase::Idle;
				sequence.index = 0;
				return;
			}

			hide_shown(scene, sequence, graph);

			if sequence.index < sources.len() && sequence.gap > 0 {
				sequence.phase = Phase::Gap;
				sequence.phase_deadline = now.saturating_add(sequence.gap);
				debug!(scene, index = sequence.index, "Entering gap");
			} else {
				step_forward(scene, sequence, &sources, now, graph);
			}
		}

		Phase::Gap => {
			if now < sequence.phase_deadline {
				return;
			}
			let sources = sequence.sources();
			step_forward(scene, sequence, &sources, now, graph);
		}

		Phase::Cooldown => {
			if now < sequence.phase_deadline {
				return;
			}
			sequence.phase = Phase::Idle;
			sequence.index = 0;
			info!(scene, "Sequence finished");
		}
	}
}

/// Start a pass if the scene is idle and has sources.
fn begin<G: SceneGraph>(scene: &str, sequence: &mut SceneSequence, now: TimeMs, graph: &mut G) -> bool {
	if sequence.phase != Phase::Idle {
		return false;
	}

	let sources = sequence.sources();
	let Some(first) = sources.first() else {
		return false;
	};

	for entry in &sources {
		graph.set_visible(scene, &entry.name, false);
	}

	sequence.index = 1;
	show(scene, sequence, first, now, graph);
	info!(scene, sources = sources.len(), "Sequence started");
	true
}

/// Move to the next entry, or into cooldown once the pass is exhausted.
fn step_forward<G: SceneGraph>(scene: &str, sequence: &mut SceneSequence, sources: &[SourceEntry], now: TimeMs, graph: &mut G) {
	sequence.index += 1;
	match sources.get(sequence.index - 1) {
		Some(entry) => show(scene, sequence, entry, now, graph),
		None => {
			sequence.phase = Phase::Cooldown;
			sequence.phase_deadline = now.saturating_add(sequence.cooldown);
			debug!(scene, cooldown = sequence.cooldown, "Pass complete, cooling down");
		}
	}
}

fn show<G: SceneGraph>(scene: &str, sequence: &mut SceneSequence, entry: &SourceEntry, now: TimeMs, graph: &mut G) {
	graph.set_visible(scene, &entry.name, true);
	sequence.phase = Phase::Showing;
	sequence.phase_deadline = now.saturating_add(entry.duration);
	sequence.shown = Some(entry.name.clone());
	debug!(scene, source = %entry.name, index = sequence.index, until = sequence.phase_deadline, "Showing source");
}

fn hide_shown<G: SceneGraph>(scene: &str, sequence: &mut SceneSequence, graph: &mut G) {
	if let Some(source) = sequence.shown.take() {
		graph.set_visible(scene, &source, false);
	}
}
