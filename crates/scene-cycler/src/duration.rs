//! Forgiving duration text parsing.
//!
//! Operators type durations by hand ("90s", "1h2m", "00:00:06.000"), so parsing never
//! fails: anything unreadable is simply zero. Formatting always produces the canonical
//! `HH:MM:SS.mmm` form, which parses back to the same value.

use crate::types::{TimeMs, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use once_cell::sync::Lazy;
use regex::Regex;

/// `<number><unit>` tokens. Longer aliases come first since alternation is leftmost-first.
static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		r"(-?\d*\.?\d+)\s*(milliseconds|millisecond|msecs|msec|ms|hours|hour|hrs|hr|h|minutes|minute|mins|min|mn|m|seconds|second|secs|sec|s)",
	)
	.expect("unit token pattern is valid")
});

/// Shadowed by `UNIT_TOKEN` for every input it matches; kept so the fallback order reads in full.
static BARE_SECONDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?\d*\.?\d+)s$").expect("bare seconds pattern is valid"));

/// Parse free-form duration text into milliseconds.
///
/// Precedence: colon form, then unit tokens, then a bare number suffixed with `s`,
/// then a bare integer taken as raw milliseconds. Everything else is `0`.
pub fn parse_duration(text: &str) -> TimeMs {
	let text = text.trim().to_lowercase().replace(',', ".");
	if text.is_empty() {
		return 0;
	}

	if text.contains(':') {
		return parse_colon_form(&text);
	}

	let mut matched = false;
	let mut total: TimeMs = 0;
	for caps in UNIT_TOKEN.captures_iter(&text) {
		matched = true;
		let value = parse_non_negative(&caps[1]);
		total = total.saturating_add(scale(value, unit_ms(&caps[2])));
	}
	if matched {
		return total;
	}

	if let Some(caps) = BARE_SECONDS.captures(&text) {
		return scale(parse_non_negative(&caps[1]), MS_PER_SECOND);
	}

	text.parse::<TimeMs>().unwrap_or(0)
}

/// Canonical `HH:MM:SS.mmm` text for a duration. Negative input is clamped to zero.
pub fn format_duration(ms: i64) -> String {
	format_ms(TimeMs::try_from(ms).unwrap_or(0))
}

/// Rewrite duration text in canonical form.
pub fn normalize_duration(text: &str) -> String {
	format_ms(parse_duration(text))
}

pub(crate) fn format_ms(ms: TimeMs) -> String {
	let hours = ms / MS_PER_HOUR;
	let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
	let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
	let millis = ms % MS_PER_SECOND;
	format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn parse_colon_form(text: &str) -> TimeMs {
	let tokens: Vec<&str> = text.splitn(3, ':').collect();
	let (hours, minutes, seconds) = match tokens.as_slice() {
		[s] => ("", "", *s),
		[m, s] => ("", *m, *s),
		[h, m, s] => (*h, *m, *s),
		_ => return 0,
	};

	let seconds = parse_non_negative(seconds);
	let whole_seconds = seconds.floor();

	scale(parse_non_negative(hours), MS_PER_HOUR)
		.saturating_add(scale(parse_non_negative(minutes), MS_PER_MINUTE))
		.saturating_add(scale(whole_seconds, MS_PER_SECOND))
		.saturating_add(scale(seconds - whole_seconds, MS_PER_SECOND))
}

fn unit_ms(unit: &str) -> TimeMs {
	match unit {
		"h" | "hr" | "hrs" | "hour" | "hours" => MS_PER_HOUR,
		"m" | "mn" | "min" | "mins" | "minute" | "minutes" => MS_PER_MINUTE,
		"s" | "sec" | "secs" | "second" | "seconds" => MS_PER_SECOND,
		_ => 1,
	}
}

/// Round-half-up conversion of a non-negative value into milliseconds.
fn scale(value: f64, unit: TimeMs) -> TimeMs {
	(value * unit as f64).round() as TimeMs
}

fn parse_non_negative(token: &str) -> f64 {
	match token.trim().parse::<f64>() {
		Ok(value) if value.is_finite() && value > 0.0 => value,
		_ => 0.0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip() {
		for d in [0, 1, 999, 1000, 59_999, 3_661_000, 7_199_999] {
			let text = format_duration(d as i64);
			assert_eq!(parse_duration(&text), d, "round trip of {text}");
		}
	}

	#[test]
	fn test_unit_tokens() {
		assert_eq!(parse_duration("90s"), 90_000);
		assert_eq!(parse_duration("1h2m3s"), 3_723_000);
		assert_eq!(parse_duration("750ms"), 750);
		assert_eq!(parse_duration("1h 30min"), 5_400_000);
		assert_eq!(parse_duration("2 mins 5 secs"), 125_000);
		assert_eq!(parse_duration("1.5s"), 1_500);
		assert_eq!(parse_duration("1,5s"), 1_500);
		assert_eq!(parse_duration("5 m"), 300_000);
		assert_eq!(parse_duration("3HRS"), 10_800_000);
		assert_eq!(parse_duration(".5s"), 500);
		assert_eq!(parse_duration("1h .25h"), 4_500_000);
	}

	#[test]
	fn test_empty_and_garbage() {
		assert_eq!(parse_duration(""), 0);
		assert_eq!(parse_duration("   "), 0);
		assert_eq!(parse_duration("garbage"), 0);
		assert_eq!(parse_duration("-5"), 0);
		assert_eq!(parse_duration("-5s"), 0);
		assert_eq!(parse_duration("-1m 30s"), 30_000);
	}

	#[test]
	fn test_colon_form() {
		assert_eq!(parse_duration("00:00:06.000"), 6_000);
		assert_eq!(parse_duration("1:30"), 90_000);
		assert_eq!(parse_duration("01:02:03.456"), 3_723_456);
		assert_eq!(parse_duration("x:10"), 10_000);
		assert_eq!(parse_duration("00:00:00,5"), 500);
		assert_eq!(parse_duration(" 100:00:00.000 "), 360_000_000);
		assert_eq!(parse_duration("1.5:00"), 90_000);
		assert_eq!(parse_duration("0.5:00:00"), 1_800_000);
		assert_eq!(parse_duration("-1:30"), 30_000);
	}

	#[test]
	fn test_bare_number_is_raw_milliseconds() {
		assert_eq!(parse_duration("5"), 5);
		assert_eq!(parse_duration("5s"), 5_000);
		assert_eq!(parse_duration("2500"), 2_500);
		assert_eq!(parse_duration("2.5"), 0);
	}

	#[test]
	fn test_format() {
		assert_eq!(format_duration(0), "00:00:00.000");
		assert_eq!(format_duration(6_000), "00:00:06.000");
		assert_eq!(format_duration(3_723_456), "01:02:03.456");
		assert_eq!(format_duration(360_000_000), "100:00:00.000");
		assert_eq!(format_duration(-42), "00:00:00.000");
	}

	#[test]
	fn test_normalize() {
		assert_eq!(normalize_duration("90s"), "00:01:30.000");
		assert_eq!(normalize_duration("nonsense"), "00:00:00.000");
	}
}
