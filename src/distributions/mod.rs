//! # Distributions
//!
//! Closed-form Beta, Binomial and Beta-Binomial evaluation, the engine that
//! assembles the six handedness distributions, and numerical summaries of
//! its output.

pub mod density;
pub mod engine;
pub mod series;
pub mod summary;
