pub mod config;
pub mod console;
pub mod error;
pub mod service;

pub use config::Config;
pub use console::ConsoleCommand;
pub use error::{Error, Result};
pub use service::CyclerService;
