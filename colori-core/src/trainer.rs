//! Training loop orchestration.
mod config;
use crate::{
    record::{Record, Recorder, RecordValue::Scalar},
    replay_buffer::{ReplayBuffer, ReplayBufferConfig},
    Agent, SampleProducer,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use std::time::SystemTime;

/// Sequences self-play ingestion and optimization.
///
/// One iteration runs the external self-play engine once, pushes the
/// produced samples into the replay buffer and, once the buffer has
/// reached its minimum size, performs a fixed number of optimization
/// epochs on the agent. Self-play and training phases never overlap,
/// so the buffer needs no locking discipline.
pub struct Trainer {
    config: TrainerConfig,

    /// Configuration of the replay buffer owned by the training loop.
    replay_buffer_config: ReplayBufferConfig,
}

impl Trainer {
    /// Creates a trainer from the given configurations.
    pub fn build(config: TrainerConfig, replay_buffer_config: ReplayBufferConfig) -> Self {
        Self {
            config,
            replay_buffer_config,
        }
    }

    /// Runs the training loop to completion.
    ///
    /// Every optimization step that actually ran is written to the
    /// recorder with its iteration and epoch attached.
    pub fn train<A, P, R>(&mut self, agent: &mut A, producer: &mut P, recorder: &mut R) -> Result<()>
    where
        A: Agent,
        P: SampleProducer,
        R: Recorder,
    {
        let mut buffer = ReplayBuffer::build(&self.replay_buffer_config);
        let mut opt_steps = 0;

        for iteration in 0..self.config.num_iterations {
            let start = SystemTime::now();
            let samples = producer.run_games()?;
            info!(
                "iteration {}: {} self-play samples (action width {})",
                iteration,
                samples.len(),
                samples.num_actions()
            );
            buffer.push(samples)?;

            if buffer.len() < self.config.min_buffer_size {
                info!(
                    "iteration {}: buffer at {}/{} samples, skipping training",
                    iteration,
                    buffer.len(),
                    self.config.min_buffer_size
                );
                continue;
            }

            for epoch in 0..self.config.epochs_per_iteration {
                if let Some(mut record) = agent.opt(&mut buffer)? {
                    opt_steps += 1;
                    record.insert("iteration", Scalar(iteration as f32));
                    record.insert("epoch", Scalar(epoch as f32));
                    recorder.write(opt_steps, record);
                }
            }

            self.save_model(agent, iteration)?;
            info!(
                "iteration {} done in {:.1}s (buffer size {})",
                iteration,
                start.elapsed()?.as_secs_f32(),
                buffer.len()
            );
        }

        Ok(())
    }

    fn save_model<A: Agent>(&self, agent: &A, iteration: usize) -> Result<()> {
        if let Some(model_dir) = &self.config.model_dir {
            if (iteration + 1) % self.config.save_interval == 0 {
                let path = format!("{}/iter{:04}", model_dir, iteration + 1);
                agent.save(&path)?;
                info!("saved model parameters to {}", path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NullRecorder;
    use crate::replay_buffer::SampleBatch;
    use ndarray::{Array1, Array2, Array3};
    use std::path::Path;

    struct FixedProducer {
        num_actions: usize,
    }

    impl SampleProducer for FixedProducer {
        fn run_games(&mut self) -> Result<SampleBatch> {
            let n = 8;
            let m = self.num_actions;
            self.num_actions += 1; // widths vary between iterations
            Ok(SampleBatch::new(
                Array2::zeros((n, 4)),
                Array3::zeros((n, m, 2)),
                Array2::from_elem((n, m), true),
                Array2::from_elem((n, m), 1.0 / m as f32),
                Array1::zeros(n),
            )?)
        }
    }

    struct CountingAgent {
        min_samples: usize,
        batch_size: usize,
        opt_calls: usize,
        samples_seen: usize,
    }

    impl Agent for CountingAgent {
        fn opt(&mut self, buffer: &mut ReplayBuffer) -> Result<Option<Record>> {
            if buffer.len() < self.min_samples {
                return Ok(None);
            }
            let batch = buffer.batch(self.batch_size)?;
            self.opt_calls += 1;
            self.samples_seen += batch.len();
            Ok(Some(Record::from_scalar("loss_total", 0.0)))
        }

        fn save<T: AsRef<Path>>(&self, _path: T) -> Result<()> {
            Ok(())
        }

        fn load<T: AsRef<Path>>(&mut self, _path: T) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn skips_training_until_buffer_warm() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = TrainerConfig::default()
            .num_iterations(4)
            .epochs_per_iteration(2)
            .min_buffer_size(20);
        let mut trainer = Trainer::build(
            config,
            ReplayBufferConfig::default().capacity(1000).seed(0),
        );

        let mut agent = CountingAgent {
            min_samples: 1,
            batch_size: 4,
            opt_calls: 0,
            samples_seen: 0,
        };
        let mut producer = FixedProducer { num_actions: 3 };
        trainer
            .train(&mut agent, &mut producer, &mut NullRecorder)
            .unwrap();

        // 8 samples per iteration: iterations 0 and 1 stay below the
        // minimum of 20, iterations 2 and 3 train for 2 epochs each.
        assert_eq!(agent.opt_calls, 4);
        assert_eq!(agent.samples_seen, 16);
    }
}
