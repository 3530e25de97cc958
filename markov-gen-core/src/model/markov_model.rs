use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::distribution::{ContextDistribution, LINE_END};
use crate::error::{MarkovError, Result};
use crate::io;

/// Character-level Markov model over fixed-length context windows.
///
/// The model maps every window of `window_length` lowercase characters
/// seen during training to the distribution of characters observed right
/// after it, and generates new text by repeatedly sampling from the
/// distribution of the current trailing window.
///
/// # Responsibilities
/// - Build the window map from corpus lines
/// - Accumulate successor counts for each window
/// - Generate text by inverse-CDF sampling over fresh probabilities
///
/// # Invariants
/// - `window_length` is always >= 1
/// - Every key in `contexts` is exactly `window_length` characters long
/// - Every stored distribution is non-empty
/// - The map only grows during training; counts never decrease
#[derive(Debug)]
pub struct MarkovModel {
	/// Number of context characters used to predict the next one.
	window_length: usize,

	/// Mapping from a window to the distribution of its successors.
	contexts: HashMap<String, ContextDistribution>,

	/// Owned generator. Draws are ordered and stateful, so reproducible
	/// output requires a fixed seed on a single instance.
	rng: StdRng,
}

impl MarkovModel {
	/// Creates a model with an OS-seeded generator.
	///
	/// Generating from this model multiple times produces different
	/// texts. Good for production.
	///
	/// # Errors
	/// Returns [`MarkovError::WindowLength`] if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self> {
		Self::with_rng(window_length, StdRng::from_os_rng())
	}

	/// Creates a model with the given seed value.
	///
	/// Generating texts from this model multiple times with the same
	/// seed, training and calls will produce the same random texts.
	/// Good for debugging.
	///
	/// # Errors
	/// Returns [`MarkovError::WindowLength`] if `window_length` is 0.
	pub fn with_seed(window_length: usize, seed: u64) -> Result<Self> {
		Self::with_rng(window_length, StdRng::seed_from_u64(seed))
	}

	fn with_rng(window_length: usize, rng: StdRng) -> Result<Self> {
		if window_length == 0 {
			return Err(MarkovError::WindowLength { got: window_length });
		}
		Ok(Self { window_length, contexts: HashMap::new(), rng })
	}

	/// Adds every line of the given corpus to the model.
	///
	/// Each line is lowercased, then a window of `window_length`
	/// characters is slid across it. The character right after a window
	/// is recorded as its successor, or [`LINE_END`] when the window
	/// reaches the end of the line. Windows never span separate lines,
	/// and lines shorter than the window contribute nothing.
	///
	/// Training is cumulative: repeated calls keep increasing counts.
	pub fn train<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for line in lines {
			self.train_line(line.as_ref());
		}
		debug!("model now holds {} windows", self.contexts.len());
	}

	fn train_line(&mut self, line: &str) {
		let chars: Vec<char> = line.to_lowercase().chars().collect();
		if chars.len() < self.window_length {
			// Line too short, no windows to record
			return;
		}

		// For each window in the line
		for i in 0..=chars.len() - self.window_length {
			let window: String = chars[i..i + self.window_length].iter().collect();
			let successor = chars.get(i + self.window_length).copied().unwrap_or(LINE_END);
			self.contexts.entry(window).or_default().observe(successor);
		}
	}

	/// Trains the model from a corpus file, one line at a time.
	///
	/// # Errors
	/// Returns [`MarkovError::CorpusUnavailable`] if the file cannot be
	/// read. An unreadable corpus is never treated as an empty one.
	pub fn train_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		let path = path.as_ref();
		let lines = io::read_lines(path).map_err(|source| MarkovError::CorpusUnavailable {
			path: path.to_path_buf(),
			source,
		})?;
		debug!("training on {} lines from {}", lines.len(), path.display());
		self.train(&lines);
		Ok(())
	}

	/// Generates text starting from `initial_text`, extending it until it
	/// holds `target_length` characters.
	///
	/// The initial text is lowercased. If it holds fewer characters than
	/// the window length there is no context to look up and it is
	/// returned as-is. Generation stops early, silently, when the
	/// trailing window was never seen during training; that is a defined
	/// outcome, not a failure.
	///
	/// Probabilities of the current window are recomputed before every
	/// draw, so counts added between calls are always reflected.
	pub fn generate(&mut self, initial_text: &str, target_length: usize) -> String {
		let mut text: Vec<char> = initial_text.to_lowercase().chars().collect();
		if text.len() < self.window_length {
			trace!("initial text shorter than the window, nothing to look up");
			return text.into_iter().collect();
		}

		while text.len() < target_length {
			let window: String = text[text.len() - self.window_length..].iter().collect();
			let Some(distribution) = self.contexts.get_mut(&window) else {
				trace!("window {window:?} never observed, stopping");
				break;
			};
			distribution.compute_probabilities();

			let draw: f64 = self.rng.random();
			match distribution.sample(draw) {
				Some(next) => text.push(next),
				None => break,
			}
		}

		text.into_iter().collect()
	}

	/// Window length this model was built with.
	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// Number of distinct windows seen so far.
	pub fn context_count(&self) -> usize {
		self.contexts.len()
	}

	/// Distribution recorded for the given window, if any.
	pub fn context(&self, window: &str) -> Option<&ContextDistribution> {
		self.contexts.get(window)
	}

	/// Iterator over every window seen so far, in no particular order.
	pub fn windows(&self) -> impl Iterator<Item = &str> {
		self.contexts.keys().map(String::as_str)
	}
}

impl fmt::Display for MarkovModel {
	/// Diagnostic dump of the whole mapping, one window per line.
	///
	/// Windows are sorted so the dump is stable; observations keep their
	/// discovery order.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut windows: Vec<&String> = self.contexts.keys().collect();
		windows.sort();
		for window in windows {
			writeln!(f, "{} : {}", window, self.contexts[window])?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	#[test]
	fn zero_window_length_is_rejected() {
		assert!(matches!(
			MarkovModel::new(0),
			Err(MarkovError::WindowLength { got: 0 })
		));
		assert!(matches!(
			MarkovModel::with_seed(0, 20),
			Err(MarkovError::WindowLength { got: 0 })
		));
	}

	#[test]
	fn training_records_every_window_of_a_line() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		// Windows: ab (twice), bc, ca, bd
		assert_eq!(model.context_count(), 4);
		for window in ["ab", "bc", "ca", "bd"] {
			assert!(model.context(window).is_some());
		}
	}

	#[test]
	fn later_discoveries_come_first_in_a_distribution() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		// 'c' is seen after "ab" before 'd' is, so 'd' is the head
		let mut distribution = model.context("ab").unwrap().clone();
		assert_eq!(distribution.len(), 2);
		assert_eq!(distribution.get(0).unwrap().chr, 'd');
		assert_eq!(distribution.get(1).unwrap().chr, 'c');

		distribution.compute_probabilities();
		assert_relative_eq!(distribution.get(0).unwrap().p, 0.5, epsilon = 1e-9);
		assert_relative_eq!(distribution.get(0).unwrap().cp, 0.5, epsilon = 1e-9);
		assert_relative_eq!(distribution.get(1).unwrap().p, 0.5, epsilon = 1e-9);
		assert_relative_eq!(distribution.get(1).unwrap().cp, 1.0, epsilon = 1e-9);
	}

	#[test]
	fn a_window_ending_its_line_observes_the_sentinel() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		let distribution = model.context("bd").unwrap();
		assert_eq!(distribution.len(), 1);
		assert_eq!(distribution.first().unwrap().chr, LINE_END);
	}

	#[test]
	fn windows_never_span_lines() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["ab", "cd"]);

		assert!(model.context("ab").is_some());
		assert!(model.context("cd").is_some());
		assert!(model.context("bc").is_none());
	}

	#[test]
	fn training_lowercases_its_input() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["AbCaBd"]);

		assert!(model.context("ab").is_some());
		assert!(model.context("Ab").is_none());
	}

	#[test]
	fn training_accumulates_across_calls() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);
		model.train(["abcabd"]);

		let distribution = model.context("ab").unwrap();
		assert_eq!(distribution.len(), 2);
		assert_eq!(distribution.get(0).unwrap().count, 2);
		assert_eq!(distribution.get(1).unwrap().count, 2);
	}

	#[test]
	fn short_initial_text_is_returned_lowercased_and_unextended() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		assert_eq!(model.generate("A", 10), "a");
	}

	#[test]
	fn empty_model_returns_the_initial_text() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();

		assert_eq!(model.context_count(), 0);
		assert_eq!(model.generate("ab", 10), "ab");
	}

	#[test]
	fn single_successor_chains_are_followed_deterministically() {
		let mut model = MarkovModel::with_seed(1, 20).unwrap();
		model.train(["ab"]);

		// 'a' always yields 'b', 'b' always yields the sentinel
		assert_eq!(model.generate("a", 3), "ab\0");
	}

	#[test]
	fn generation_stops_on_an_unseen_window() {
		let mut model = MarkovModel::with_seed(1, 20).unwrap();
		model.train(["ab"]);

		// After the sentinel is appended its window is unknown
		let text = model.generate("a", 10);
		assert_eq!(text, "ab\0");
		assert!(text.chars().count() < 10);
	}

	#[test]
	fn generated_text_never_exceeds_the_target_length() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		let text = model.generate("ab", 20);
		assert!(text.starts_with("ab"));
		assert!(text.chars().count() <= 20);
		if text.chars().count() < 20 {
			let tail: String = text.chars().rev().take(2).collect::<Vec<_>>().into_iter().rev().collect();
			assert!(model.context(&tail).is_none());
		}
	}

	#[test]
	fn identical_seeds_produce_identical_texts() {
		let corpus = ["she sells sea shells", "by the sea shore"];

		let mut first = MarkovModel::with_seed(2, 7).unwrap();
		let mut second = MarkovModel::with_seed(2, 7).unwrap();
		first.train(corpus);
		second.train(corpus);

		assert_eq!(first.generate("se", 60), second.generate("se", 60));
	}

	#[test]
	fn dump_lists_windows_with_their_observations() {
		let mut model = MarkovModel::with_seed(2, 20).unwrap();
		model.train(["abcabd"]);

		let dump = model.to_string();
		assert!(dump.contains("ab : (d 1) (c 1)"));
		assert!(dump.contains("bd : (\\0 1)"));
	}
}
