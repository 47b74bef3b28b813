//! Bounded sample store with uniform without-replacement sampling.
use super::{pad_to_max_actions, ReplayBufferConfig, SampleBatch};
use crate::error::ColoriError;
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

/// A bounded, append-only store of self-play training samples.
///
/// Incoming batches keep their own action width until the buffer
/// compacts, which merges all pending chunks into one rectangular store
/// through [`pad_to_max_actions`] and then drops the oldest samples
/// past capacity. Compaction runs when an append overflows the
/// capacity and before every batch draw, so eviction order is always
/// well defined across chunks of differing widths.
///
/// The buffer exclusively owns its storage; drawn batches are owned
/// copies, so callers can hand them to an optimization step without
/// any locking discipline. All operations run to completion on the
/// single training thread.
pub struct ReplayBuffer {
    /// Maximum number of samples retained.
    capacity: usize,

    /// Pending chunks, oldest first. At most one chunk after compaction.
    chunks: Vec<SampleBatch>,

    /// Live sample count, including appended-but-uncompacted samples.
    size: usize,

    /// Random source for batch draws.
    rng: StdRng,
}

impl ReplayBuffer {
    /// Creates an empty buffer from the given configuration.
    pub fn build(config: &ReplayBufferConfig) -> Self {
        Self {
            capacity: config.capacity,
            chunks: Vec::new(),
            size: 0,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Current number of live samples.
    ///
    /// Updated immediately on push, before any compaction resolves.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maximum number of samples retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a batch of self-play samples.
    ///
    /// The batch may have any action width; widths are unified lazily.
    /// When the live count exceeds capacity the buffer compacts and
    /// drops the oldest samples.
    ///
    /// # Errors
    ///
    /// A batch whose feature dimension or state width disagrees with
    /// the samples already stored is rejected ([`ColoriError`]).
    pub fn push(&mut self, batch: SampleBatch) -> Result<()> {
        if let Some(first) = self.chunks.first() {
            if batch.feature_dim() != first.feature_dim() {
                return Err(ColoriError::FeatureDimMismatch {
                    expected: first.feature_dim(),
                    got: batch.feature_dim(),
                }
                .into());
            }
            if batch.state_dim() != first.state_dim() {
                return Err(ColoriError::StateDimMismatch {
                    expected: first.state_dim(),
                    got: batch.state_dim(),
                }
                .into());
            }
        }

        trace!(
            "push {} samples with action width {}",
            batch.len(),
            batch.num_actions()
        );
        self.size += batch.len();
        self.chunks.push(batch);

        if self.size > self.capacity {
            self.compact()?;
        }
        Ok(())
    }

    /// Merges pending chunks into one rectangular store and truncates
    /// to the most recent `capacity` samples.
    ///
    /// Idempotent apart from the truncation check.
    fn compact(&mut self) -> Result<(), ColoriError> {
        if self.chunks.is_empty() {
            return Ok(());
        }

        let merged = if self.chunks.len() == 1 {
            self.chunks.remove(0)
        } else {
            pad_to_max_actions(&self.chunks)?
        };

        let merged = if merged.len() > self.capacity {
            debug!(
                "evicting {} oldest samples (capacity {})",
                merged.len() - self.capacity,
                self.capacity
            );
            merged.tail(self.capacity)
        } else {
            merged
        };

        self.size = merged.len();
        self.chunks = vec![merged];
        Ok(())
    }

    /// Draws a batch of `size` distinct samples uniformly at random.
    ///
    /// Samples are drawn without replacement within one draw; when the
    /// buffer holds fewer than `size` samples, all of them are
    /// returned. The returned batch is an owned copy in draw order.
    ///
    /// # Errors
    ///
    /// Drawing from an empty buffer is a caller error; the training
    /// loop is expected to gate on [`len`](Self::len) first.
    pub fn batch(&mut self, size: usize) -> Result<SampleBatch> {
        self.compact()?;
        if self.size == 0 {
            return Err(ColoriError::EmptyBuffer.into());
        }

        let amount = size.min(self.size);
        let ixs = rand::seq::index::sample(&mut self.rng, self.size, amount).into_vec();
        Ok(self.chunks[0].select(&ixs))
    }
}
