use crate::config::{CyclerConfig, SceneSettings};
use crate::provider::SceneGraph;
use crate::random::PercentRoll;
use crate::scheduler::Scheduler;
use crate::state::CyclerState;
use crate::types::TimeMs;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Commands accepted by the engine actor
#[derive(Debug, Clone)]
pub enum CyclerCommand {
	/// Manual "start sequence now"
	Trigger,
	/// Start one named scene
	StartScene(String),
	/// Host reported a scene change; re-read the active scene from the graph
	SceneChanged,
	/// Override the tracked active scene
	SetActiveScene(Option<String>),
	SetOnlyActiveScene(bool),
	/// Live edit of one scene's settings
	EditScene { scene: String, settings: SceneSettings },
	/// Reload all configuration, abandoning every running sequence
	Reload(CyclerConfig),
}

/// Heartbeat actor owning the scheduler.
///
/// Time is measured in milliseconds since the engine was created.
pub struct CyclerEngine<G, R> {
	scheduler: Scheduler<G, R>,
	heartbeat: Duration,
	started_at: Instant,
	state_tx: watch::Sender<CyclerState>,
}

impl<G, R> CyclerEngine<G, R>
where
	G: SceneGraph + Send + 'static,
	R: PercentRoll + Send + 'static,
{
	pub fn new(graph: G, rng: R, config: CyclerConfig) -> Self {
		let heartbeat = config.heartbeat();
		let scheduler = Scheduler::with_config(graph, rng, config, 0);
		let (state_tx, _state_rx) = watch::channel(scheduler.snapshot());

		Self {
			scheduler,
			heartbeat,
			started_at: Instant::now(),
			state_tx,
		}
	}

	/// Get a receiver for state updates
	pub fn subscribe(&self) -> watch::Receiver<CyclerState> {
		self.state_tx.subscribe()
	}

	fn now(&self) -> TimeMs {
		TimeMs::try_from(self.started_at.elapsed().as_millis()).unwrap_or(TimeMs::MAX)
	}

	/// Run the engine actor loop until cancelled
	pub async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<CyclerCommand>, cancel_token: CancellationToken) {
		let mut ticker = Self::ticker(self.heartbeat);

		info!("Starting cycler engine with heartbeat: {:?}", self.heartbeat);

		loop {
			tokio::select! {
				_ = ticker.tick() => {
					let now = self.now();
					self.scheduler.tick(now);
					self.publish();
				}
				Some(command) = command_rx.recv() => {
					self.handle_command(command, &mut ticker);
					self.publish();
				}
				_ = cancel_token.cancelled() => {
					info!("Cycler engine cancelled");
					break;
				}
			}
		}

		info!("Cycler engine stopped");
	}

	fn ticker(heartbeat: Duration) -> Interval {
		let mut ticker = interval(heartbeat);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
		ticker
	}

	fn handle_command(&mut self, command: CyclerCommand, ticker: &mut Interval) {
		let now = self.now();
		debug!(?command, now, "Handling command");

		match command {
			CyclerCommand::Trigger => {
				let started = self.scheduler.trigger(now);
				info!(started, "Manual trigger");
			}

			CyclerCommand::StartScene(scene) => {
				if !self.scheduler.start_sequence(&scene, now) {
					info!(scene = %scene, "Start request ignored");
				}
			}

			CyclerCommand::SceneChanged => self.scheduler.refresh_active_scene(),

			CyclerCommand::SetActiveScene(scene) => self.scheduler.set_active_scene(scene),

			CyclerCommand::SetOnlyActiveScene(enabled) => {
				self.scheduler.set_only_active_scene(enabled);
				info!(enabled, "Active scene scoping updated");
			}

			CyclerCommand::EditScene { scene, settings } => {
				if !self.scheduler.edit_scene(&scene, settings, now) {
					info!(scene = %scene, "Edit for unknown scene ignored");
				}
			}

			CyclerCommand::Reload(config) => {
				let heartbeat = config.heartbeat();
				self.scheduler.load(config, now);

				if heartbeat != self.heartbeat {
					info!("Heartbeat changed: {:?} -> {:?}", self.heartbeat, heartbeat);
					self.heartbeat = heartbeat;
					*ticker = Self::ticker(heartbeat);
				}
			}
		}
	}

	fn publish(&self) {
		let next = self.scheduler.snapshot();
		self.state_tx.send_if_modified(|state| {
			if *state == next {
				false
			} else {
				*state = next;
				true
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::InMemorySceneGraph;
	use crate::random::ScriptedRolls;
	use crate::sequence::Phase;

	#[tokio::test]
	async fn test_engine_via_commands() {
		let graph = InMemorySceneGraph::new().with_scene("Main", ["A"]);
		let config = CyclerConfig::new().with_heartbeat(10).with_scene("Main", SceneSettings::new("A|1h").with_enabled(true).with_tick("0"));

		let engine = CyclerEngine::new(graph.clone(), ScriptedRolls::default(), config);
		let mut state_rx = engine.subscribe();
		let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
		let cancel = CancellationToken::new();

		let engine_handle = tokio::spawn({
			let cancel = cancel.clone();
			async move {
				engine.run(cmd_rx, cancel).await;
			}
		});

		cmd_tx.send(CyclerCommand::Trigger).unwrap();
		state_rx.wait_for(|s| s.scene("Main").is_some_and(|m| m.phase == Phase::Showing)).await.unwrap();
		assert_eq!(graph.is_visible("Main", "A"), Some(true));

		cmd_tx.send(CyclerCommand::Reload(CyclerConfig::new().with_heartbeat(20))).unwrap();
		state_rx.wait_for(|s| s.running_count() == 0).await.unwrap();
		assert_eq!(graph.is_visible("Main", "A"), Some(false));

		cancel.cancel();
		engine_handle.await.unwrap();
	}
}
