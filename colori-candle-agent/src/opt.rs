//! Optimizers for the agent's network.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer driving the network update.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// AdamW (decoupled weight decay).
    AdamW {
        /// Learning rate.
        lr: f64,
        /// Weight decay coefficient.
        weight_decay: f64,
    },

    /// Plain Adam.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::AdamW {
            lr: 1e-3,
            weight_decay: 1e-4,
        }
    }
}

impl OptimizerConfig {
    /// Builds an optimizer over the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match self {
            Self::AdamW { lr, weight_decay } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    weight_decay: *weight_decay,
                    ..ParamsAdamW::default()
                };
                Ok(Optimizer::AdamW(AdamW::new(vars, params)?))
            }
            Self::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                Ok(Optimizer::Adam(Adam::new(vars, params)?))
            }
        }
    }

    /// Overrides the learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::AdamW { weight_decay, .. } => Self::AdamW { lr, weight_decay },
            Self::Adam { .. } => Self::Adam { lr },
        }
    }
}

/// Thin wrapper unifying the supported optimizers.
pub enum Optimizer {
    /// AdamW optimizer.
    AdamW(AdamW),

    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Runs backpropagation on `loss` and applies one update step.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::AdamW(opt) => opt.backward_step(loss)?,
            Self::Adam(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }
}
