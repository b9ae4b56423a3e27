//! Scene graph seam.
//!
//! The sequencer never touches a real compositor directly; it goes through
//! [`SceneGraph`]. [`InMemorySceneGraph`] is a shared, cloneable graph used by the
//! host binary and by tests.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Host-side view of scenes and their show/hide-able sources
pub trait SceneGraph {
	/// Scene names in host order
	fn list_scenes(&self) -> Vec<String>;

	/// Source names of a scene in host order, empty for unknown scenes
	fn list_sources(&self, scene: &str) -> Vec<String>;

	/// Show or hide a source. Unknown scenes or sources are ignored.
	fn set_visible(&mut self, scene: &str, source: &str, visible: bool);

	/// Scene currently on program, if any
	fn current_active_scene(&self) -> Option<String>;
}

/// One applied visibility change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityChange {
	pub scene: String,
	pub source: String,
	pub visible: bool,
}

impl VisibilityChange {
	pub fn new(scene: impl Into<String>, source: impl Into<String>, visible: bool) -> Self {
		Self {
			scene: scene.into(),
			source: source.into(),
			visible,
		}
	}

	pub fn show(scene: impl Into<String>, source: impl Into<String>) -> Self {
		Self::new(scene, source, true)
	}

	pub fn hide(scene: impl Into<String>, source: impl Into<String>) -> Self {
		Self::new(scene, source, false)
	}
}

/// Scene roster file: which scenes exist and what they contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Roster {
	pub current_scene: Option<String>,
	pub scenes: Vec<RosterScene>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterScene {
	pub name: String,
	#[serde(default)]
	pub sources: Vec<String>,
}

impl Roster {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}
}

#[derive(Debug)]
struct SourceNode {
	name: String,
	visible: bool,
}

#[derive(Debug)]
struct SceneNode {
	name: String,
	sources: Vec<SourceNode>,
}

#[derive(Debug, Default)]
struct GraphState {
	scenes: Vec<SceneNode>,
	current_scene: Option<String>,
	history: Vec<VisibilityChange>,
}

impl GraphState {
	fn scene(&self, name: &str) -> Option<&SceneNode> {
		self.scenes.iter().find(|s| s.name == name)
	}

	fn scene_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
		self.scenes.iter_mut().find(|s| s.name == name)
	}
}

/// Shared in-memory scene graph. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySceneGraph {
	inner: Arc<RwLock<GraphState>>,
}

impl InMemorySceneGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_roster(roster: &Roster) -> Self {
		let graph = Self::new();
		for scene in &roster.scenes {
			graph.add_scene(&scene.name, scene.sources.iter().map(String::as_str));
		}
		graph.set_current_scene(roster.current_scene.as_deref());
		graph
	}

	/// Builder-style scene registration
	pub fn with_scene<'a>(self, name: &str, sources: impl IntoIterator<Item = &'a str>) -> Self {
		self.add_scene(name, sources);
		self
	}

	/// Register a scene; all of its sources start hidden.
	pub fn add_scene<'a>(&self, name: &str, sources: impl IntoIterator<Item = &'a str>) {
		let sources = sources
			.into_iter()
			.map(|source| SourceNode {
				name: source.to_string(),
				visible: false,
			})
			.collect();

		let mut state = self.write();
		state.scenes.retain(|s| s.name != name);
		state.scenes.push(SceneNode { name: name.to_string(), sources });
	}

	pub fn remove_scene(&self, name: &str) {
		let mut state = self.write();
		state.scenes.retain(|s| s.name != name);
		if state.current_scene.as_deref() == Some(name) {
			state.current_scene = None;
		}
	}

	/// Switch the program scene, the way a host's scene-change event would.
	pub fn set_current_scene(&self, scene: Option<&str>) {
		let mut state = self.write();
		state.current_scene = scene.map(str::to_string);
		info!("Program scene is now {:?}", state.current_scene);
	}

	/// Visibility of a source, `None` when it does not exist
	pub fn is_visible(&self, scene: &str, source: &str) -> Option<bool> {
		let state = self.read();
		state.scene(scene)?.sources.iter().find(|s| s.name == source).map(|s| s.visible)
	}

	pub fn visible_sources(&self, scene: &str) -> Vec<String> {
		let state = self.read();
		state
			.scene(scene)
			.map(|s| s.sources.iter().filter(|source| source.visible).map(|source| source.name.clone()).collect())
			.unwrap_or_default()
	}

	pub fn history(&self) -> Vec<VisibilityChange> {
		self.read().history.clone()
	}

	/// Drain the applied visibility changes recorded so far.
	pub fn take_history(&self) -> Vec<VisibilityChange> {
		std::mem::take(&mut self.write().history)
	}

	fn read(&self) -> RwLockReadGuard<'_, GraphState> {
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, GraphState> {
		self.inner.write().unwrap_or_else(PoisonError::into_inner)
	}
}

impl SceneGraph for InMemorySceneGraph {
	fn list_scenes(&self) -> Vec<String> {
		self.read().scenes.iter().map(|s| s.name.clone()).collect()
	}

	fn list_sources(&self, scene: &str) -> Vec<String> {
		let state = self.read();
		state.scene(scene).map(|s| s.sources.iter().map(|source| source.name.clone()).collect()).unwrap_or_default()
	}

	fn set_visible(&mut self, scene: &str, source: &str, visible: bool) {
		let mut state = self.write();
		let Some(node) = state.scene_mut(scene) else {
			debug!(scene, source, "set_visible on unknown scene ignored");
			return;
		};

		let mut applied = false;
		for item in node.sources.iter_mut().filter(|s| s.name == source) {
			item.visible = visible;
			applied = true;
		}

		if applied {
			state.history.push(VisibilityChange::new(scene, source, visible));
		} else {
			debug!(scene, source, "set_visible on unknown source ignored");
		}
	}

	fn current_active_scene(&self) -> Option<String> {
		self.read().current_scene.clone()
	}
}
