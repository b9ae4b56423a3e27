use crate::CyclerService;
use scene_cycler::{CyclerState, Phase};
use std::collections::HashMap;
use std::sync::Arc;

impl CyclerService {
	/// Spawn task that logs every phase change published by the engine
	pub fn spawn_state_monitor(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
		tokio::spawn(async move {
			tracing::info!("📈 Starting state monitor");

			let mut state_rx = self.cycler.subscribe();
			let mut phases = phase_map(&state_rx.borrow_and_update());

			loop {
				tokio::select! {
					_ = self.cancel_token.cancelled() => {
						tracing::info!("🛑 State monitor shutting down");
						break;
					}
					changed = state_rx.changed() => {
						if changed.is_err() {
							tracing::warn!("⚠️ Cycler engine stopped publishing");
							break;
						}

						let state = state_rx.borrow_and_update().clone();
						for scene in &state.scenes {
							let previous = phases.get(&scene.scene).copied().unwrap_or_default();
							if previous != scene.phase {
								tracing::info!(
									scene = %scene.scene,
									source = scene.current_source.as_deref().unwrap_or("-"),
									index = scene.index,
									"🎞️ {} -> {}",
									previous,
									scene.phase
								);
							}
						}
						phases = phase_map(&state);
					}
				}
			}

			tracing::info!("✅ State monitor stopped");
		})
	}
}

fn phase_map(state: &CyclerState) -> HashMap<String, Phase> {
	state.scenes.iter().map(|s| (s.scene.clone(), s.phase)).collect()
}
