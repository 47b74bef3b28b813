//! Replay buffer for self-play training samples.
//!
//! Self-play batches arrive with differing action widths. The buffer
//! accepts them as-is, keeps them in a pending chunk list, and merges
//! the chunks into one rectangular store (padding narrower chunks with
//! inert columns) before truncating to capacity or drawing a batch.
//!
//! # Key components
//!
//! - [`SampleBatch`]: five parallel arrays holding one batch of samples
//! - [`pad_to_max_actions`]: merges ragged chunks to a common width
//! - [`ReplayBuffer`]: bounded FIFO store with uniform sampling
//! - [`ReplayBufferConfig`]: capacity and sampling seed
mod base;
mod batch;
mod config;
mod pad;
pub use base::ReplayBuffer;
pub use batch::SampleBatch;
pub use config::ReplayBufferConfig;
pub use pad::pad_to_max_actions;
