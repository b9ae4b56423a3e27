use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
	#[arg(long, env = "CYCLER_CONFIG", default_value = "cycler.json", help = "Cycler settings file (created on write-back if missing)")]
	pub config: PathBuf,

	#[arg(long, env = "CYCLER_ROSTER", default_value = "roster.json", help = "Scene roster file listing scenes and their sources")]
	pub roster: PathBuf,

	#[arg(long, env = "CYCLER_ACTIVE_SCENE", help = "Program scene to start with, overriding the roster")]
	pub active_scene: Option<String>,

	#[arg(long, env = "CYCLER_ONLY_ACTIVE_SCENE", help = "Force active-scene scoping on regardless of the settings file")]
	pub only_active_scene: bool,

	#[arg(long, env = "CYCLER_WRITE_BACK", help = "Rewrite the settings file in canonical form after every load")]
	pub write_back: bool,
}
