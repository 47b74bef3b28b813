//! Configuration of the AlphaZero agent.
use crate::{model::ColoriNetConfig, opt::OptimizerConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`AlphaZero`](super::AlphaZero).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AlphaZeroConfig {
    /// Configuration of the policy/value network.
    pub model_config: ColoriNetConfig,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,

    /// Number of samples drawn per optimization step.
    pub batch_size: usize,

    /// Minimum number of buffered samples before the agent starts
    /// taking optimization steps.
    pub min_samples_warmup: usize,
}

impl Default for AlphaZeroConfig {
    fn default() -> Self {
        Self {
            model_config: ColoriNetConfig::default(),
            opt_config: OptimizerConfig::default(),
            batch_size: 256,
            min_samples_warmup: 1_000,
        }
    }
}

impl AlphaZeroConfig {
    /// Sets the network configuration.
    pub fn model_config(mut self, model_config: ColoriNetConfig) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, opt_config: OptimizerConfig) -> Self {
        self.opt_config = opt_config;
        self
    }

    /// Sets the training batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the warmup size of the replay buffer.
    pub fn min_samples_warmup(mut self, min_samples_warmup: usize) -> Self {
        self.min_samples_warmup = min_samples_warmup;
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
        let dir = TempDir::new("alpha_zero_config").unwrap();
        let path = dir.path().join("agent.yaml");
        let config = AlphaZeroConfig::default()
            .batch_size(64)
            .min_samples_warmup(128)
            .opt_config(OptimizerConfig::default().learning_rate(3e-4));
        config.save(&path).unwrap();
        assert_eq!(AlphaZeroConfig::load(&path).unwrap(), config);
    }
}
