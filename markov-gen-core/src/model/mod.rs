//! Top-level module for the Markov generation system.
//!
//! This module provides a character-level Markov text generator, including:
//! - Per-window successor distributions (`ContextDistribution`)
//! - The trainable generation model (`MarkovModel`)

/// Ordered distribution of observed successor characters for one window.
///
/// Tracks occurrence counts in discovery order and supports on-demand
/// probability computation and inverse-CDF sampling.
pub mod distribution;

/// Character-level Markov model.
///
/// Handles corpus ingestion, successor counting, probabilistic
/// next-character sampling, and the text generation loop.
pub mod markov_model;
