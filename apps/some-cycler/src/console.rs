use crate::Error;
use std::str::FromStr;

/// One line typed on the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
	/// `start` triggers every eligible scene, `start <scene>` one scene
	Start(Option<String>),
	/// `scene <name>` switches the program scene
	Scene(String),
	/// `only-active on|off`
	OnlyActive(bool),
	/// `reload` rereads the settings file
	Reload,
	/// `status` prints the current state as JSON
	Status,
	/// `sources <scene>` lists a scene's sources
	Sources(String),
	/// `help`
	Help,
	/// `quit` / `exit`
	Quit,
}

pub const HELP: &str = "commands: start [scene] | scene <name> | only-active on|off | reload | status | sources <scene> | help | quit";

impl FromStr for ConsoleCommand {
	type Err = Error;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let line = line.trim();
		let (verb, rest) = line.split_once(char::is_whitespace).map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
		let argument = || (!rest.is_empty()).then(|| rest.to_string()).ok_or_else(|| Error::MissingArgument(verb.to_string()));

		match verb.to_lowercase().as_str() {
			"start" | "go" => Ok(Self::Start((!rest.is_empty()).then(|| rest.to_string()))),
			"scene" => Ok(Self::Scene(argument()?)),
			"only-active" => match rest.to_lowercase().as_str() {
				"on" | "true" | "1" => Ok(Self::OnlyActive(true)),
				"off" | "false" | "0" => Ok(Self::OnlyActive(false)),
				"" => Err(Error::MissingArgument(verb.to_string())),
				other => Err(Error::UnknownCommand(format!("only-active {other}"))),
			},
			"reload" => Ok(Self::Reload),
			"status" => Ok(Self::Status),
			"sources" => Ok(Self::Sources(argument()?)),
			"help" | "?" => Ok(Self::Help),
			"quit" | "exit" => Ok(Self::Quit),
			_ => Err(Error::UnknownCommand(line.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(line: &str) -> Result<ConsoleCommand, Error> {
		line.parse()
	}

	#[test]
	fn test_start() {
		assert_eq!(parse("start").unwrap(), ConsoleCommand::Start(None));
		assert_eq!(parse("  START  Main Scene ").unwrap(), ConsoleCommand::Start(Some("Main Scene".to_string())));
	}

	#[test]
	fn test_scene_and_sources_need_argument() {
		assert_eq!(parse("scene Break").unwrap(), ConsoleCommand::Scene("Break".to_string()));
		assert!(matches!(parse("scene"), Err(Error::MissingArgument(_))));
		assert_eq!(parse("sources Main").unwrap(), ConsoleCommand::Sources("Main".to_string()));
		assert!(matches!(parse("sources   "), Err(Error::MissingArgument(_))));
	}

	#[test]
	fn test_only_active() {
		assert_eq!(parse("only-active on").unwrap(), ConsoleCommand::OnlyActive(true));
		assert_eq!(parse("only-active OFF").unwrap(), ConsoleCommand::OnlyActive(false));
		assert!(matches!(parse("only-active"), Err(Error::MissingArgument(_))));
		assert!(matches!(parse("only-active maybe"), Err(Error::UnknownCommand(_))));
	}

	#[test]
	fn test_simple_verbs() {
		assert_eq!(parse("reload").unwrap(), ConsoleCommand::Reload);
		assert_eq!(parse("status").unwrap(), ConsoleCommand::Status);
		assert_eq!(parse("help").unwrap(), ConsoleCommand::Help);
		assert_eq!(parse("exit").unwrap(), ConsoleCommand::Quit);
		assert!(matches!(parse("dance"), Err(Error::UnknownCommand(_))));
	}
}
