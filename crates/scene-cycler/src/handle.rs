use crate::config::{CyclerConfig, SceneSettings};
use crate::engine::{CyclerCommand, CyclerEngine};
use crate::error::{CyclerError, Result};
use crate::provider::SceneGraph;
use crate::random::PercentRoll;
use crate::state::CyclerState;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Front-end to a running cycler engine.
/// All requests are `&self` and fire-and-forget; the engine applies them on its own task.
pub struct SceneCycler {
	command_tx: mpsc::UnboundedSender<CyclerCommand>,
	state_rx: watch::Receiver<CyclerState>,
	task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
	cancel_token: CancellationToken,
}

impl SceneCycler {
	/// Spawn the engine on the current tokio runtime.
	pub fn spawn<G, R>(graph: G, rng: R, config: CyclerConfig) -> Self
	where
		G: SceneGraph + Send + 'static,
		R: PercentRoll + Send + 'static,
	{
		let cancel_token = CancellationToken::new();
		let (command_tx, command_rx) = mpsc::unbounded_channel();

		let engine = CyclerEngine::new(graph, rng, config);
		let state_rx = engine.subscribe();

		let task_handle = tokio::spawn(engine.run(command_rx, cancel_token.clone()));

		Self {
			command_tx,
			state_rx,
			task_handle: Arc::new(Mutex::new(Some(task_handle))),
			cancel_token,
		}
	}

	fn send_command(&self, command: CyclerCommand) -> Result<()> {
		self.command_tx.send(command).map_err(|_| CyclerError::EngineStopped)
	}

	/// Manual "start sequence now" (hotkey, preview button)
	pub fn trigger(&self) -> Result<()> {
		self.send_command(CyclerCommand::Trigger)
	}

	pub fn start_scene(&self, scene: impl Into<String>) -> Result<()> {
		self.send_command(CyclerCommand::StartScene(scene.into()))
	}

	/// Notify the engine that the program scene changed in the scene graph
	pub fn scene_changed(&self) -> Result<()> {
		self.send_command(CyclerCommand::SceneChanged)
	}

	pub fn set_active_scene(&self, scene: Option<String>) -> Result<()> {
		self.send_command(CyclerCommand::SetActiveScene(scene))
	}

	pub fn set_only_active_scene(&self, enabled: bool) -> Result<()> {
		self.send_command(CyclerCommand::SetOnlyActiveScene(enabled))
	}

	pub fn edit_scene(&self, scene: impl Into<String>, settings: SceneSettings) -> Result<()> {
		self.send_command(CyclerCommand::EditScene { scene: scene.into(), settings })
	}

	pub fn reload(&self, config: CyclerConfig) -> Result<()> {
		self.send_command(CyclerCommand::Reload(config))
	}

	pub fn subscribe(&self) -> watch::Receiver<CyclerState> {
		self.state_rx.clone()
	}

	pub fn current_state(&self) -> CyclerState {
		self.state_rx.borrow().clone()
	}

	/// Stop the engine and wait for its task to finish
	pub async fn shutdown(self) {
		info!("Shutting down cycler");
		self.cancel_token.cancel();

		if let Some(handle) = self.task_handle.lock().await.take() {
			let _ = handle.await;
		}

		info!("Cycler shut down complete");
	}
}

impl Drop for SceneCycler {
	fn drop(&mut self) {
		self.cancel_token.cancel();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::InMemorySceneGraph;
	use crate::random::ScriptedRolls;
	use crate::sequence::Phase;

	fn graph() -> InMemorySceneGraph {
		InMemorySceneGraph::new().with_scene("Main", ["A", "B"]).with_scene("Side", ["X"])
	}

	fn config() -> CyclerConfig {
		CyclerConfig::new()
			.with_heartbeat(10)
			.with_scene("Main", SceneSettings::new("A|1h\nB|1h").with_enabled(true).with_tick("0"))
			.with_scene("Side", SceneSettings::new("X|1h").with_enabled(true).with_tick("0"))
	}

	#[tokio::test]
	async fn test_trigger_starts_enabled_scenes() {
		let graph = graph();
		let cycler = SceneCycler::spawn(graph.clone(), ScriptedRolls::default(), config());
		let mut state_rx = cycler.subscribe();

		cycler.trigger().unwrap();
		state_rx.wait_for(|s| s.running_count() == 2).await.unwrap();

		assert_eq!(graph.visible_sources("Main"), vec!["A"]);
		assert_eq!(graph.visible_sources("Side"), vec!["X"]);

		cycler.shutdown().await;
	}

	#[tokio::test]
	async fn test_active_scene_scoping() {
		let graph = graph();
		graph.set_current_scene(Some("Side"));
		let cycler = SceneCycler::spawn(graph.clone(), ScriptedRolls::default(), config().with_only_active_scene(true));
		let mut state_rx = cycler.subscribe();

		cycler.start_scene("Main").unwrap();
		cycler.trigger().unwrap();
		state_rx.wait_for(|s| s.running_count() == 1).await.unwrap();

		let state = cycler.current_state();
		assert_eq!(state.active_scene.as_deref(), Some("Side"));
		assert_eq!(state.scene("Main").unwrap().phase, Phase::Idle);
		assert_eq!(state.scene("Side").unwrap().phase, Phase::Showing);

		graph.set_current_scene(Some("Main"));
		cycler.scene_changed().unwrap();
		cycler.start_scene("Main").unwrap();
		state_rx.wait_for(|s| s.running_count() == 2).await.unwrap();

		cycler.shutdown().await;
	}

	#[tokio::test]
	async fn test_commands_after_shutdown_fail() {
		let cycler = SceneCycler::spawn(graph(), ScriptedRolls::default(), config());
		let command_tx = cycler.command_tx.clone();
		cycler.shutdown().await;

		assert!(command_tx.send(CyclerCommand::Trigger).is_err());
	}
}
