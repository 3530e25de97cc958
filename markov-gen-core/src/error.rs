//! Error types for the Markov generation core.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for model operations
#[derive(Error, Debug)]
pub enum MarkovError {
	/// Model constructed with an unusable window length
	#[error("window length must be at least 1, got {got}")]
	WindowLength { got: usize },

	/// Indexed access beyond a distribution's bounds
	#[error("index {index} out of range for distribution of size {len}")]
	OutOfRange { index: usize, len: usize },

	/// Corpus could not be read; training input is unavailable
	#[error("training input unavailable: {}", .path.display())]
	CorpusUnavailable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, MarkovError>;
