//! Configuration of the training loop.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Number of self-play/training iterations.
    pub num_iterations: usize,

    /// Optimization epochs per iteration.
    pub epochs_per_iteration: usize,

    /// Minimum number of buffered samples before training starts.
    pub min_buffer_size: usize,

    /// Where to save model parameters, `None` to skip saving.
    pub model_dir: Option<String>,

    /// Interval of saving the model, in iterations.
    pub save_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_iterations: 100,
            epochs_per_iteration: 10,
            min_buffer_size: 1_000,
            model_dir: None,
            save_interval: 1,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of iterations.
    pub fn num_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }

    /// Sets the number of optimization epochs per iteration.
    pub fn epochs_per_iteration(mut self, epochs_per_iteration: usize) -> Self {
        self.epochs_per_iteration = epochs_per_iteration;
        self
    }

    /// Sets the minimum buffer size before training starts.
    pub fn min_buffer_size(mut self, min_buffer_size: usize) -> Self {
        self.min_buffer_size = min_buffer_size;
        self
    }

    /// Sets the model directory.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Sets the saving interval in iterations.
    pub fn save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let rdr = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    /// Saves the configuration as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn yaml_roundtrip() {
        let dir = TempDir::new("trainer_config").unwrap();
        let path = dir.path().join("trainer.yaml");
        let config = TrainerConfig::default()
            .num_iterations(3)
            .epochs_per_iteration(2)
            .min_buffer_size(16)
            .model_dir("models");
        config.save(&path).unwrap();
        assert_eq!(TrainerConfig::load(&path).unwrap(), config);
    }
}
