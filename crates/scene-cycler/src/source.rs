use crate::duration::{format_ms, parse_duration};
use crate::types::TimeMs;
use serde::{Deserialize, Serialize};

/// One step of a scene's pass: a source and how long it stays visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
	pub name: String,
	pub duration: TimeMs,
}

impl SourceEntry {
	pub fn new(name: impl Into<String>, duration: TimeMs) -> Self {
		Self { name: name.into(), duration }
	}

	/// Parse a `name|duration` line. Lines without a `|` yield `None`.
	pub fn parse_line(line: &str) -> Option<Self> {
		let (name, duration) = line.split_once('|')?;
		Some(Self::new(name.trim(), parse_duration(duration)))
	}

	/// Canonical `name|HH:MM:SS.mmm` line
	pub fn to_line(&self) -> String {
		format!("{}|{}", self.name, format_ms(self.duration))
	}
}

/// Parse newline-separated source lines in order, silently dropping malformed ones.
pub fn parse_source_list(text: &str) -> Vec<SourceEntry> {
	text.lines().filter(|line| !line.trim().is_empty()).filter_map(SourceEntry::parse_line).collect()
}

pub fn format_source_list(entries: &[SourceEntry]) -> String {
	entries.iter().map(SourceEntry::to_line).collect::<Vec<_>>().join("\n")
}

/// Rewrite a source list with canonical durations.
pub fn normalize_source_list(text: &str) -> String {
	format_source_list(&parse_source_list(text))
}
