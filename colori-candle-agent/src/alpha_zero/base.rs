//! AlphaZero agent implementation.
use super::AlphaZeroConfig;
use crate::{
    loss::{masked_log_softmax, policy_loss, renormalize_targets, value_loss},
    model::ColoriNet,
    opt::Optimizer,
    tensor::TensorBatch,
};
use anyhow::Result;
use candle_core::{DType, Device, IndexOp};
use candle_nn::{VarBuilder, VarMap};
use colori_core::{
    record::{Record, RecordValue::Scalar},
    replay_buffer::ReplayBuffer,
    Agent,
};
use log::trace;
use std::{fs, path::Path};

/// Agent updating a [`ColoriNet`] from replayed self-play samples.
///
/// One optimization step draws a batch from the replay buffer,
/// renormalizes the stored visit distributions over the currently
/// valid actions, and minimizes the unweighted sum of the policy
/// cross-entropy and the value regression error. The loss components
/// are reported separately; only the total drives the gradient step.
pub struct AlphaZero {
    model: ColoriNet,
    varmap: VarMap,
    opt: Optimizer,
    batch_size: usize,
    min_samples_warmup: usize,
    device: Device,
    n_opts: usize,
}

impl AlphaZero {
    /// Builds the agent on the given device.
    pub fn build(config: AlphaZeroConfig, device: Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = ColoriNet::build(vs, config.model_config)?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            model,
            varmap,
            opt,
            batch_size: config.batch_size,
            min_samples_warmup: config.min_samples_warmup,
            device,
            n_opts: 0,
        })
    }

    /// Number of optimization steps taken so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    fn opt_(&mut self, buffer: &mut ReplayBuffer) -> Result<Record> {
        let batch = buffer.batch(self.batch_size)?;
        trace!(
            "optimization step on {} samples, action width {}",
            batch.len(),
            batch.num_actions()
        );
        let batch = TensorBatch::from_sample_batch(&batch, &self.device)?;

        let (policy_logits, value_pred) =
            self.model.forward(&batch.states, &batch.action_features)?;

        let targets = renormalize_targets(&batch.policies, &batch.action_masks)?;
        let log_probs = masked_log_softmax(&policy_logits, &batch.action_masks)?;
        let loss_policy = policy_loss(&log_probs, &targets)?;

        // The first value output is the acting player's win probability.
        let win_prob = value_pred.i((.., 0))?;
        let loss_value = value_loss(&win_prob, &batch.values)?;

        let loss = (&loss_policy + &loss_value)?;
        self.opt.backward_step(&loss)?;
        self.n_opts += 1;

        Ok(Record::from_slice(&[
            ("loss_total", Scalar(loss.to_scalar::<f32>()?)),
            ("loss_policy", Scalar(loss_policy.to_scalar::<f32>()?)),
            ("loss_value", Scalar(loss_value.to_scalar::<f32>()?)),
        ]))
    }
}

impl Agent for AlphaZero {
    fn opt(&mut self, buffer: &mut ReplayBuffer) -> Result<Option<Record>> {
        if buffer.len() >= self.min_samples_warmup {
            Ok(Some(self.opt_(buffer)?))
        } else {
            Ok(None)
        }
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        fs::create_dir_all(&path)?;
        self.varmap
            .save(path.as_ref().join("model.safetensors").as_path())?;
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap
            .load(path.as_ref().join("model.safetensors").as_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColoriNetConfig;
    use colori_core::replay_buffer::{ReplayBufferConfig, SampleBatch};
    use ndarray::{Array1, Array2, Array3};
    use tempdir::TempDir;

    fn small_config() -> AlphaZeroConfig {
        AlphaZeroConfig::default()
            .model_config(
                ColoriNetConfig::default()
                    .state_dim(6)
                    .action_dim(4)
                    .num_players(3),
            )
            .batch_size(8)
            .min_samples_warmup(16)
    }

    fn sample_batch(n: usize, m: usize) -> SampleBatch {
        let states = Array2::from_shape_fn((n, 6), |(i, j)| ((i * 7 + j) % 5) as f32 * 0.1);
        let features =
            Array3::from_shape_fn((n, m, 4), |(i, j, k)| ((i + j * 3 + k) % 4) as f32 * 0.25);
        let masks = Array2::from_elem((n, m), true);
        let policies = Array2::from_elem((n, m), 1.0 / m as f32);
        let values = Array1::from_shape_fn(n, |i| (i % 2) as f32);
        SampleBatch::new(states, features, masks, policies, values).unwrap()
    }

    fn buffer_with(n: usize, m: usize) -> ReplayBuffer {
        let mut buffer = ReplayBuffer::build(&ReplayBufferConfig::default().capacity(256).seed(1));
        buffer.push(sample_batch(n, m)).unwrap();
        buffer
    }

    #[test]
    fn skips_optimization_during_warmup() {
        let mut agent = AlphaZero::build(small_config(), Device::Cpu).unwrap();
        let mut buffer = buffer_with(8, 3);
        assert!(agent.opt(&mut buffer).unwrap().is_none());
        assert_eq!(agent.n_opts(), 0);
    }

    #[test]
    fn reports_finite_loss_components() {
        let mut agent = AlphaZero::build(small_config(), Device::Cpu).unwrap();
        let mut buffer = buffer_with(32, 3);

        let record = agent.opt(&mut buffer).unwrap().unwrap();
        for key in ["loss_total", "loss_policy", "loss_value"] {
            let v = record.get_scalar(key).unwrap();
            assert!(v.is_finite(), "{} should be finite", key);
            assert!(v >= 0.0, "{} should be non-negative", key);
        }
        assert_eq!(agent.n_opts(), 1);
    }

    #[test]
    fn trains_through_ragged_widths() {
        // Chunks of differing action widths are merged before the draw;
        // the padded rows must not break the update.
        let mut agent = AlphaZero::build(small_config(), Device::Cpu).unwrap();
        let mut buffer = ReplayBuffer::build(&ReplayBufferConfig::default().capacity(256).seed(1));
        buffer.push(sample_batch(16, 3)).unwrap();
        buffer.push(sample_batch(16, 5)).unwrap();

        for _ in 0..3 {
            let record = agent.opt(&mut buffer).unwrap().unwrap();
            assert!(record.get_scalar("loss_total").unwrap().is_finite());
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new("alpha_zero").unwrap();
        let agent = AlphaZero::build(small_config(), Device::Cpu).unwrap();
        agent.save(dir.path()).unwrap();

        let mut other = AlphaZero::build(small_config(), Device::Cpu).unwrap();
        other.load(dir.path()).unwrap();
    }
}
