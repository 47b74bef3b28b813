//! Policy/value network for Colori.
use crate::loss::mask_logits;
use anyhow::Result;
use candle_core::{DType, Tensor, D};
use candle_nn::{linear, ops, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

/// Configuration of [`ColoriNet`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ColoriNetConfig {
    /// Width `S` of the state encoding.
    pub state_dim: usize,

    /// Width `A` of a single action feature vector.
    pub action_dim: usize,

    /// Number of players `P` (one win probability per player).
    pub num_players: usize,

    /// Hidden width of the state encoder.
    pub state_hidden_dim: usize,

    /// Width of the shared state/action embedding.
    pub state_embed_dim: usize,

    /// Hidden width of the action encoder.
    pub action_hidden_dim: usize,

    /// Hidden width of the value head.
    pub value_hidden_dim: usize,
}

impl Default for ColoriNetConfig {
    fn default() -> Self {
        Self {
            state_dim: 768,
            action_dim: 86,
            num_players: 3,
            state_hidden_dim: 256,
            state_embed_dim: 128,
            action_hidden_dim: 64,
            value_hidden_dim: 64,
        }
    }
}

impl ColoriNetConfig {
    /// Sets the state encoding width.
    pub fn state_dim(mut self, state_dim: usize) -> Self {
        self.state_dim = state_dim;
        self
    }

    /// Sets the action feature width.
    pub fn action_dim(mut self, action_dim: usize) -> Self {
        self.action_dim = action_dim;
        self
    }

    /// Sets the number of players.
    pub fn num_players(mut self, num_players: usize) -> Self {
        self.num_players = num_players;
        self
    }
}

/// AlphaZero-style network scoring a state and its legal actions.
///
/// The state encoder produces a fixed-size embedding; the value head
/// turns it into per-player win probabilities; the action encoder
/// embeds each action feature vector into the same space and the
/// policy logit of an action is the dot product of the two embeddings,
/// so the network handles any action width.
pub struct ColoriNet {
    state_encoder: Vec<Linear>,
    value_head: Vec<Linear>,
    action_encoder: Vec<Linear>,
    config: ColoriNetConfig,
}

impl ColoriNet {
    /// Builds the network under the given variable builder.
    pub fn build(vs: VarBuilder, config: ColoriNetConfig) -> Result<Self> {
        let e = config.state_embed_dim;
        let h = config.state_hidden_dim;

        let vs_s = vs.pp("state_encoder");
        let state_encoder = vec![
            linear(config.state_dim, h, vs_s.pp("ln0"))?,
            linear(h, h, vs_s.pp("ln1"))?,
            linear(h, e, vs_s.pp("ln2"))?,
        ];

        let vs_v = vs.pp("value_head");
        let value_head = vec![
            linear(e, config.value_hidden_dim, vs_v.pp("ln0"))?,
            linear(config.value_hidden_dim, config.num_players, vs_v.pp("ln1"))?,
        ];

        let vs_a = vs.pp("action_encoder");
        let action_encoder = vec![
            linear(config.action_dim, config.action_hidden_dim, vs_a.pp("ln0"))?,
            linear(config.action_hidden_dim, e, vs_a.pp("ln1"))?,
        ];

        Ok(Self {
            state_encoder,
            value_head,
            action_encoder,
            config,
        })
    }

    /// Forward pass.
    ///
    /// Takes `states [B, S]` and `action_features [B, M, A]`, returns
    /// raw (unmasked) `policy_logits [B, M]` and per-player win
    /// probabilities `value [B, P]`. Masking of invalid logits is the
    /// caller's business so that the loss path controls its own fill
    /// value.
    pub fn forward(&self, states: &Tensor, action_features: &Tensor) -> Result<(Tensor, Tensor)> {
        let mut xs = states.clone();
        for layer in &self.state_encoder {
            xs = layer.forward(&xs)?.relu()?;
        }

        let value = {
            let hidden = self.value_head[0].forward(&xs)?.relu()?;
            let value_logits = self.value_head[1].forward(&hidden)?;
            ops::softmax(&value_logits, D::Minus1)?
        };

        let (b, m, a) = action_features.dims3()?;
        let flat = action_features.reshape((b * m, a))?;
        let hidden = self.action_encoder[0].forward(&flat)?.relu()?;
        let action_embed = self.action_encoder[1]
            .forward(&hidden)?
            .reshape((b, m, self.config.state_embed_dim))?;

        let policy_logits = xs
            .unsqueeze(1)?
            .broadcast_mul(&action_embed)?
            .sum(D::Minus1)?;

        Ok((policy_logits, value))
    }

    /// Inference-style forward returning a masked policy distribution.
    ///
    /// Invalid actions get exactly zero probability; a row with no
    /// valid action comes out all-zero instead of `NaN`.
    pub fn predict(
        &self,
        states: &Tensor,
        action_features: &Tensor,
        action_masks: &Tensor,
    ) -> Result<(Tensor, Tensor)> {
        let (logits, value) = self.forward(states, action_features)?;
        let probs = ops::softmax(&mask_logits(&logits, action_masks)?, D::Minus1)?;
        let probs = (probs * &action_masks.to_dtype(DType::F32)?)?;
        Ok((probs, value))
    }
}
