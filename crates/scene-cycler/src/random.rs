use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform percentile draws in `[1, 100]` for chance-gated triggering
pub trait PercentRoll {
	fn roll(&mut self) -> u32;
}

/// Entropy-seeded generator used in production
#[derive(Debug, Clone)]
pub struct ThreadRoll {
	rng: StdRng,
}

impl ThreadRoll {
	pub fn new() -> Self {
		Self { rng: StdRng::from_entropy() }
	}

	pub fn seeded(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl Default for ThreadRoll {
	fn default() -> Self {
		Self::new()
	}
}

impl PercentRoll for ThreadRoll {
	fn roll(&mut self) -> u32 {
		self.rng.gen_range(1..=100)
	}
}

/// Replays a fixed sequence of draws. Once exhausted every roll is 100, which only
/// passes a 100% trigger chance.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
	draws: VecDeque<u32>,
	taken: usize,
}

impl ScriptedRolls {
	pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
		Self {
			draws: draws.into_iter().map(|d| d.clamp(1, 100)).collect(),
			taken: 0,
		}
	}

	/// Number of draws consumed so far
	pub fn taken(&self) -> usize {
		self.taken
	}
}

impl PercentRoll for ScriptedRolls {
	fn roll(&mut self) -> u32 {
		self.taken += 1;
		self.draws.pop_front().unwrap_or(100)
	}
}
