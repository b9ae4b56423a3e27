use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Cycler error: {0}")]
	Cycler(#[from] scene_cycler::CyclerError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON parsing error: {0}")]
	JsonParse(#[from] serde_json::Error),

	#[error("Unknown command: {0}")]
	UnknownCommand(String),

	#[error("Missing argument for '{0}'")]
	MissingArgument(String),

	#[error("Configuration error: {0}")]
	Config(String),
}
