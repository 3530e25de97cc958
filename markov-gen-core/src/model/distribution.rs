use std::fmt;
use std::slice;

use crate::error::{MarkovError, Result};

/// Sentinel successor recorded when a window ends exactly at the end of
/// its line, meaning no character follows it.
pub const LINE_END: char = '\0';

/// A single observed successor character within one window's distribution.
///
/// `count` is how many times the character was seen right after the
/// window. `p` and `cp` are derived fields and are only meaningful after
/// the owning distribution has computed probabilities more recently than
/// its last mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
	/// The observed successor character (possibly [`LINE_END`]).
	pub chr: char,
	/// Number of times this successor was observed. Always >= 1.
	pub count: usize,
	/// Probability of this successor within its distribution.
	pub p: f64,
	/// Running sum of probabilities up to and including this observation.
	pub cp: f64,
}

impl Observation {
	fn new(chr: char) -> Self {
		Self { chr, count: 1, p: 0.0, cp: 0.0 }
	}
}

impl fmt::Display for Observation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.chr == LINE_END {
			write!(f, "(\\0 {})", self.count)
		} else {
			write!(f, "({} {})", self.chr, self.count)
		}
	}
}

/// Ordered distribution of successor characters for one context window.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities
/// - Accumulate successor occurrences during training
/// - Derive probabilities and cumulative probabilities on demand
/// - Select a successor by inverse-CDF sampling over a fixed order
///
/// ## Invariants
/// - Characters are unique within the distribution
/// - Iteration order is most-recently-discovered-first: a character
///   never seen before becomes the new head
/// - Each occurrence count is strictly positive
#[derive(Clone, Debug, Default)]
pub struct ContextDistribution {
	/// Observations in iteration order, newest discovery first.
	observations: Vec<Observation>,
	/// Set whenever observations change; cleared by `compute_probabilities`.
	stale: bool,
}

impl ContextDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of `chr` as a successor.
	///
	/// - If `chr` was already observed, its occurrence count is increased.
	/// - Otherwise a new observation with a count of 1 is prepended,
	///   becoming the head of iteration order.
	pub fn observe(&mut self, chr: char) {
		match self.observations.iter_mut().find(|o| o.chr == chr) {
			Some(existing) => existing.count += 1,
			None => self.observations.insert(0, Observation::new(chr)),
		}
		self.stale = true;
	}

	/// Computes `p` and `cp` for every observation.
	///
	/// In iteration order, `p` is `count / total` and `cp` is the running
	/// sum of the `p` values seen so far. Recomputes only when counts
	/// changed since the last call; calling it again is a no-op.
	pub fn compute_probabilities(&mut self) {
		if !self.stale {
			return;
		}

		let total: usize = self.observations.iter().map(|o| o.count).sum();
		let mut cumulative = 0.0;
		for observation in &mut self.observations {
			observation.p = observation.count as f64 / total as f64;
			cumulative += observation.p;
			observation.cp = cumulative;
		}
		self.stale = false;
	}

	/// Selects a successor for a uniform draw in `[0, 1)`.
	///
	/// Scans observations in iteration order and returns the first one
	/// whose cumulative probability strictly exceeds `random_value`.
	/// Falls back to the last observation when floating-point rounding
	/// leaves none qualifying. Probabilities must have been computed
	/// since the last mutation.
	///
	/// Returns `None` only for an empty distribution, which training
	/// never produces.
	pub fn sample(&self, random_value: f64) -> Option<char> {
		for observation in &self.observations {
			if random_value < observation.cp {
				return Some(observation.chr);
			}
		}
		self.observations.last().map(|o| o.chr)
	}

	/// Returns the observation at `index` in iteration order.
	///
	/// # Errors
	/// Returns [`MarkovError::OutOfRange`] if `index` is past the end.
	pub fn get(&self, index: usize) -> Result<&Observation> {
		self.observations.get(index).ok_or(MarkovError::OutOfRange {
			index,
			len: self.observations.len(),
		})
	}

	/// Removes the observation for `chr` if present.
	///
	/// Returns whether a removal occurred. The removed count is not
	/// redistributed.
	pub fn remove(&mut self, chr: char) -> bool {
		match self.position_of(chr) {
			Some(index) => {
				self.observations.remove(index);
				self.stale = true;
				true
			}
			None => false,
		}
	}

	/// Returns the position of `chr` in iteration order, if observed.
	pub fn position_of(&self, chr: char) -> Option<usize> {
		self.observations.iter().position(|o| o.chr == chr)
	}

	/// Returns the head of iteration order (most recently discovered).
	pub fn first(&self) -> Option<&Observation> {
		self.observations.first()
	}

	/// Number of distinct successor characters observed.
	pub fn len(&self) -> usize {
		self.observations.len()
	}

	/// Whether no successor has been observed yet.
	pub fn is_empty(&self) -> bool {
		self.observations.is_empty()
	}

	/// Restartable, read-only iteration over observations in order.
	pub fn iter(&self) -> slice::Iter<'_, Observation> {
		self.observations.iter()
	}
}

impl<'a> IntoIterator for &'a ContextDistribution {
	type Item = &'a Observation;
	type IntoIter = slice::Iter<'a, Observation>;

	fn into_iter(self) -> Self::IntoIter {
		self.observations.iter()
	}
}

impl fmt::Display for ContextDistribution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut separate = false;
		for observation in &self.observations {
			if separate {
				write!(f, " ")?;
			}
			write!(f, "{observation}")?;
			separate = true;
		}
		Ok(())
	}
}
