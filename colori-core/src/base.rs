//! Trait seams between the training core and its collaborators.
use crate::{record::Record, replay_buffer::ReplayBuffer, replay_buffer::SampleBatch};
use anyhow::Result;
use std::path::Path;

/// A trainable policy/value agent.
///
/// The agent owns the network and its optimizer; the training loop
/// hands it the replay buffer and it performs one optimization step on
/// a batch it samples itself.
pub trait Agent {
    /// Performs one optimization step.
    ///
    /// Returns `Ok(None)` when the agent skips the step, typically
    /// because the buffer has not reached its warmup size yet;
    /// otherwise a [`Record`] with the loss components of the step.
    fn opt(&mut self, buffer: &mut ReplayBuffer) -> Result<Option<Record>>;

    /// Saves the model parameters under the given directory.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Loads the model parameters from the given directory.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}

/// The external self-play engine, seen from the training loop.
///
/// One invocation plays a round of games with the current model and
/// returns every recorded position as a [`SampleBatch`]. The core does
/// not validate game-rule correctness of the produced samples, only
/// their shape consistency.
pub trait SampleProducer {
    /// Plays self-play games and returns the recorded samples.
    fn run_games(&mut self) -> Result<SampleBatch>;
}
