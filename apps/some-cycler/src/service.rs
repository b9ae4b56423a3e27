use crate::{Config, Result};
use scene_cycler::{CyclerConfig, InMemorySceneGraph, Roster, SceneCycler, ThreadRoll};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod input;
pub mod monitor;

/// Hosts the cycler engine against an in-memory scene graph built from the roster file
pub struct CyclerService {
	config: Config,
	graph: InMemorySceneGraph,
	cycler: SceneCycler,
	cancel_token: CancellationToken,
}

impl CyclerService {
	/// Load roster and settings, then spawn the engine
	pub fn new(config: Config) -> Result<Self> {
		tracing::info!("🔌 Initializing cycler service");

		let roster = Roster::load(&config.roster)?;
		let graph = InMemorySceneGraph::from_roster(&roster);
		if let Some(scene) = &config.active_scene {
			graph.set_current_scene(Some(scene));
		}
		tracing::info!("🎬 Roster loaded with {} scenes", roster.scenes.len());

		let cycler_config = load_settings(&config)?;
		let cycler = SceneCycler::spawn(graph.clone(), ThreadRoll::new(), cycler_config);

		Ok(Self {
			config,
			graph,
			cycler,
			cancel_token: CancellationToken::new(),
		})
	}

	/// Run until Ctrl+C or a `quit` command
	pub async fn run(self) -> Result<()> {
		let service = Arc::new(self);

		let shutdown_token = service.cancel_token.clone();
		tokio::spawn(async move {
			match tokio::signal::ctrl_c().await {
				Ok(()) => {
					tracing::info!("🛑 Shutdown signal received");
					shutdown_token.cancel();
				}
				Err(e) => {
					tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
				}
			}
		});

		let monitor = service.clone().spawn_state_monitor();
		let input = service.clone().spawn_console_input();

		service.cancel_token.cancelled().await;
		tracing::info!("🔄 Initiating graceful shutdown...");

		let _ = tokio::join!(monitor, input);

		match Arc::try_unwrap(service) {
			Ok(service) => service.cycler.shutdown().await,
			Err(_) => tracing::warn!("⚠️ Cycler still referenced at shutdown, relying on drop"),
		}

		tracing::info!("✅ Graceful shutdown complete");
		Ok(())
	}
}

/// Read the settings file, applying command line overrides and optional write-back.
pub fn load_settings(config: &Config) -> Result<CyclerConfig> {
	let mut settings = CyclerConfig::load_or_default(&config.config)?;
	if config.only_active_scene {
		settings.only_active_scene = true;
	}
	settings.normalize();

	if config.write_back {
		settings.save(&config.config)?;
		tracing::info!("💾 Normalized settings written to {}", config.config.display());
	}

	tracing::info!("📋 Settings loaded for {} scenes", settings.scenes.len());
	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;
	use scene_cycler::SceneSettings;
	use std::path::PathBuf;

	fn config(dir: &std::path::Path) -> Config {
		Config {
			config: dir.join("cycler.json"),
			roster: PathBuf::from("unused.json"),
			active_scene: None,
			only_active_scene: false,
			write_back: false,
		}
	}

	#[test]
	fn test_missing_settings_file_uses_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let settings = load_settings(&config(dir.path())).unwrap();
		assert_eq!(settings, CyclerConfig::default());
	}

	#[test]
	fn test_write_back_normalizes_file() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = config(dir.path());
		config.write_back = true;
		config.only_active_scene = true;

		CyclerConfig::new().with_scene("Main", SceneSettings::new("Cam|90s").with_gap("1s")).save(&config.config).unwrap();

		let settings = load_settings(&config).unwrap();
		assert!(settings.only_active_scene);

		let stored = CyclerConfig::load(&config.config).unwrap();
		assert_eq!(stored, settings);
		assert_eq!(stored.scenes["Main"].sources, "Cam|00:01:30.000");
		assert_eq!(stored.scenes["Main"].gap, "00:00:01.000");
	}
}
