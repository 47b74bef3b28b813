//! Errors of the training core.
//!
//! Shape mismatches always signal a producer bug, so they surface
//! immediately instead of being coerced to a guessed shape.
use thiserror::Error;

/// Errors raised by the training core.
#[derive(Debug, Error)]
pub enum ColoriError {
    /// The five parallel arrays of a batch disagree on the sample count.
    #[error(
        "sample count mismatch: states {states}, action_features {action_features}, \
         action_masks {action_masks}, policies {policies}, values {values}"
    )]
    SampleCountMismatch {
        /// Number of rows in the state array.
        states: usize,
        /// Number of rows in the action feature array.
        action_features: usize,
        /// Number of rows in the action mask array.
        action_masks: usize,
        /// Number of rows in the policy array.
        policies: usize,
        /// Number of entries in the value array.
        values: usize,
    },

    /// Action-indexed arrays of a batch disagree on the action width.
    #[error(
        "action width mismatch: action_features {action_features}, \
         action_masks {action_masks}, policies {policies}"
    )]
    ActionWidthMismatch {
        /// Action width of the feature array.
        action_features: usize,
        /// Action width of the mask array.
        action_masks: usize,
        /// Action width of the policy array.
        policies: usize,
    },

    /// Batches being merged disagree on the action feature dimension.
    #[error("action feature dimension mismatch: expected {expected}, got {got}")]
    FeatureDimMismatch {
        /// Feature dimension of the first batch.
        expected: usize,
        /// Feature dimension of the offending batch.
        got: usize,
    },

    /// Batches being merged disagree on the state encoding width.
    #[error("state encoding width mismatch: expected {expected}, got {got}")]
    StateDimMismatch {
        /// State width of the first batch.
        expected: usize,
        /// State width of the offending batch.
        got: usize,
    },

    /// A batch was requested from a buffer holding no samples.
    #[error("cannot draw a batch from an empty replay buffer")]
    EmptyBuffer,

    /// A record value was read with the wrong type.
    #[error("record value type mismatch for key {0}")]
    RecordValueType(String),
}
