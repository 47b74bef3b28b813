#![warn(missing_docs)]
//! Candle-based policy/value agent for the Colori training core.
//!
//! The core stores samples as `ndarray` batches; this crate bridges
//! them to [`candle_core::Tensor`]s, runs the policy/value network,
//! builds the renormalized policy targets and computes the combined
//! policy/value loss of an AlphaZero-style update.
pub mod loss;
pub mod model;
pub mod opt;
pub mod tensor;

mod alpha_zero;
pub use alpha_zero::{AlphaZero, AlphaZeroConfig};
