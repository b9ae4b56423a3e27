use crate::console::{ConsoleCommand, HELP};
use crate::service::load_settings;
use crate::{CyclerService, Error, Result};
use scene_cycler::SceneGraph;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

impl CyclerService {
	/// Spawn the console front-end. Stdin is read on a plain thread so a pending read
	/// never holds up runtime shutdown.
	pub fn spawn_console_input(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
		let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

		std::thread::spawn(move || {
			for line in std::io::stdin().lock().lines() {
				let Ok(line) = line else { break };
				if line_tx.blocking_send(line).is_err() {
					break;
				}
			}
		});

		tokio::spawn(async move {
			tracing::info!("⌨️ Console ready, {}", HELP);

			loop {
				tokio::select! {
					_ = self.cancel_token.cancelled() => {
						tracing::info!("🛑 Console shutting down");
						break;
					}
					line = line_rx.recv() => {
						let Some(line) = line else {
							tracing::info!("Console input closed, trigger via console disabled");
							break;
						};
						if line.trim().is_empty() {
							continue;
						}

						match line.parse::<ConsoleCommand>() {
							Ok(ConsoleCommand::Quit) => {
								tracing::info!("🛑 Quit requested");
								self.cancel_token.cancel();
								break;
							}
							Ok(command) => {
								if let Err(e) = self.handle_console_command(command) {
									tracing::error!("❌ Command failed: {}", e);
								}
							}
							Err(e) => println!("{e}\n{HELP}"),
						}
					}
				}
			}

			tracing::info!("✅ Console stopped");
		})
	}

	/// Apply one console command
	pub fn handle_console_command(&self, command: ConsoleCommand) -> Result<()> {
		match command {
			ConsoleCommand::Start(None) => self.cycler.trigger()?,
			ConsoleCommand::Start(Some(scene)) => self.cycler.start_scene(scene)?,
			ConsoleCommand::Scene(scene) => {
				if !self.graph.list_scenes().contains(&scene) {
					return Err(Error::Config(format!("unknown scene '{scene}'")));
				}
				self.graph.set_current_scene(Some(&scene));
				self.cycler.scene_changed()?;
			}
			ConsoleCommand::OnlyActive(enabled) => self.cycler.set_only_active_scene(enabled)?,
			ConsoleCommand::Reload => {
				let settings = load_settings(&self.config)?;
				self.cycler.reload(settings)?;
			}
			ConsoleCommand::Status => {
				println!("{}", serde_json::to_string_pretty(&self.cycler.current_state())?);
			}
			ConsoleCommand::Sources(scene) => {
				for source in self.graph.list_sources(&scene) {
					println!("{source}");
				}
			}
			ConsoleCommand::Help => println!("{HELP}"),
			ConsoleCommand::Quit => self.cancel_token.cancel(),
		}
		Ok(())
	}
}
