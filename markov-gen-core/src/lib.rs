//! Character-level Markov text generation library.
//!
//! This crate learns, from a corpus of text lines, how often each
//! character follows every fixed-length window of preceding characters,
//! and synthesizes new text by sampling from those observed frequencies.
//! It provides:
//! - Ordered per-window distributions of successor characters
//! - A trainable model with seeded (reproducible) or OS-seeded sampling
//! - A generation loop extending an initial text one character at a time
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core model types and generation logic.
///
/// This module exposes the distribution and model interfaces used for
/// training and text generation.
pub mod model;

/// Typed errors for construction, indexed access and corpus reading.
pub mod error;

/// I/O utilities (corpus line reading).
///
/// Not exposed
pub(crate) mod io;
