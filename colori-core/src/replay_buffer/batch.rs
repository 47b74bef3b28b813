//! Batch of training samples exchanged at every pipeline boundary.
use crate::error::ColoriError;
use ndarray::{Array1, Array2, Array3, Axis};

/// A batch of training samples as five parallel arrays.
///
/// One sample is a game position: a fixed-width state encoding, a
/// per-action feature matrix, a validity mask over actions, the search
/// visit distribution as the policy target, and the game outcome from
/// the acting player's perspective. All samples within one batch share
/// the same action width; widths may differ between batches.
///
/// Index `j >= M_i` of a sample that was padded up from a narrower
/// batch has `action_masks = false`, zero features and zero policy, so
/// padding never becomes a valid action or carries probability mass.
#[derive(Clone, Debug)]
pub struct SampleBatch {
    /// State encodings, shape `[N, S]`.
    pub states: Array2<f32>,

    /// Per-action feature vectors, shape `[N, M, A]`.
    pub action_features: Array3<f32>,

    /// Action validity masks, shape `[N, M]`.
    pub action_masks: Array2<bool>,

    /// Target visit distributions, shape `[N, M]`.
    pub policies: Array2<f32>,

    /// Target outcomes for the acting player, shape `[N]`.
    pub values: Array1<f32>,
}

impl SampleBatch {
    /// Creates a batch, checking the parallel-shape invariant.
    ///
    /// All five arrays must agree on the sample count and the three
    /// action-indexed arrays must agree on the action width. A
    /// violation is a producer bug and is reported as an error rather
    /// than coerced.
    pub fn new(
        states: Array2<f32>,
        action_features: Array3<f32>,
        action_masks: Array2<bool>,
        policies: Array2<f32>,
        values: Array1<f32>,
    ) -> Result<Self, ColoriError> {
        let n = states.nrows();
        if action_features.shape()[0] != n
            || action_masks.nrows() != n
            || policies.nrows() != n
            || values.len() != n
        {
            return Err(ColoriError::SampleCountMismatch {
                states: n,
                action_features: action_features.shape()[0],
                action_masks: action_masks.nrows(),
                policies: policies.nrows(),
                values: values.len(),
            });
        }

        let m = action_features.shape()[1];
        if action_masks.ncols() != m || policies.ncols() != m {
            return Err(ColoriError::ActionWidthMismatch {
                action_features: m,
                action_masks: action_masks.ncols(),
                policies: policies.ncols(),
            });
        }

        Ok(Self {
            states,
            action_features,
            action_masks,
            policies,
            values,
        })
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the batch holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Action width `M` shared by all samples in this batch.
    pub fn num_actions(&self) -> usize {
        self.action_features.shape()[1]
    }

    /// Width `A` of a single action feature vector.
    pub fn feature_dim(&self) -> usize {
        self.action_features.shape()[2]
    }

    /// Width `S` of the state encoding.
    pub fn state_dim(&self) -> usize {
        self.states.ncols()
    }

    /// Returns an owned batch holding the given rows, in the given order.
    pub fn select(&self, ixs: &[usize]) -> Self {
        Self {
            states: self.states.select(Axis(0), ixs),
            action_features: self.action_features.select(Axis(0), ixs),
            action_masks: self.action_masks.select(Axis(0), ixs),
            policies: self.policies.select(Axis(0), ixs),
            values: self.values.select(Axis(0), ixs),
        }
    }

    /// Returns an owned batch holding the `n` most recent samples.
    pub(crate) fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        let ixs: Vec<usize> = (start..self.len()).collect();
        self.select(&ixs)
    }
}
