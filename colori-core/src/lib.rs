#![warn(missing_docs)]
//! Backend-free core of the Colori self-play training pipeline.
//!
//! Self-play games produce positions with a variable number of legal
//! actions, so every training sample carries its own action width. This
//! crate owns the machinery that turns those ragged batches into
//! rectangular training data:
//!
//! - [`replay_buffer::SampleBatch`]: parallel arrays for one batch of
//!   training positions.
//! - [`replay_buffer::ReplayBuffer`]: bounded, recency-biased store
//!   with uniform without-replacement sampling.
//! - [`Trainer`]: sequences self-play ingestion and optimization steps.
//!
//! Everything that touches a tensor backend lives in a separate agent
//! crate; this crate only depends on `ndarray`.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{Agent, SampleProducer};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
