use thiserror::Error;

pub type Result<T> = std::result::Result<T, CyclerError>;

#[derive(Debug, Error)]
pub enum CyclerError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Cycler engine is not running")]
	EngineStopped,
}
