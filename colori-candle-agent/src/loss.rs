//! Target construction and loss computation for the AlphaZero update.
//!
//! The policy target stored in the replay buffer may carry padding
//! columns and floating-point drift, so it is re-masked and
//! renormalized before it enters the cross-entropy. On the predicted
//! side, invalid logits are pushed to [`MASKED_LOGIT`] before the
//! log-softmax so masked actions carry no probability mass while every
//! intermediate stays finite.
use anyhow::Result;
use candle_core::{DType, Tensor, D};
use candle_nn::ops;

/// Logit assigned to invalid actions.
///
/// Finite stand-in for negative infinity: `exp(-1e9)` underflows to
/// zero mass, while the log-probabilities of padded or fully-masked
/// rows stay finite so a zero target annihilates them instead of
/// producing `0 * -inf = NaN`.
pub const MASKED_LOGIT: f32 = -1e9;

/// Floor applied to per-row target sums before renormalization.
pub const TARGET_SUM_FLOOR: f32 = 1e-8;

/// Replaces logits of invalid actions with [`MASKED_LOGIT`].
///
/// `masks` is a `U8` tensor of the same shape, 1 marking valid actions.
pub fn mask_logits(logits: &Tensor, masks: &Tensor) -> Result<Tensor> {
    let fill = Tensor::full(MASKED_LOGIT, logits.dims(), logits.device())?;
    Ok(masks.where_cond(logits, &fill)?)
}

/// Numerically stable log-softmax over the action axis with invalid
/// actions masked out.
///
/// A fully-masked row degenerates to a uniform distribution over the
/// masked slots; it stays finite and is annihilated by an all-zero
/// target.
pub fn masked_log_softmax(logits: &Tensor, masks: &Tensor) -> Result<Tensor> {
    let logits = mask_logits(logits, masks)?;
    Ok(ops::log_softmax(&logits, D::Minus1)?)
}

/// Re-masks and renormalizes the stored policy targets.
///
/// Each row is multiplied by its mask (removing any probability mass
/// that drifted onto invalid or padded slots) and divided by its sum,
/// floored at [`TARGET_SUM_FLOOR`]. Rows with at least one valid
/// action come out summing to 1; fully-masked rows come out all-zero
/// rather than `NaN`.
pub fn renormalize_targets(policies: &Tensor, masks: &Tensor) -> Result<Tensor> {
    let masks = masks.to_dtype(DType::F32)?;
    let masked = (policies * &masks)?;
    let sums = masked
        .sum_keepdim(D::Minus1)?
        .clamp(TARGET_SUM_FLOOR, f32::INFINITY)?;
    Ok(masked.broadcast_div(&sums)?)
}

/// Cross-entropy of the soft targets against the predicted
/// log-probabilities, averaged over the batch.
pub fn policy_loss(log_probs: &Tensor, targets: &Tensor) -> Result<Tensor> {
    let per_row = (targets * log_probs)?.sum(D::Minus1)?;
    Ok(per_row.neg()?.mean_all()?)
}

/// Mean-squared error between the predicted win probability of the
/// perspective player and the game outcome.
pub fn value_loss(pred: &Tensor, targets: &Tensor) -> Result<Tensor> {
    Ok(candle_nn::loss::mse(pred, targets)?)
}
