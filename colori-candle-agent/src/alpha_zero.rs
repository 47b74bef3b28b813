//! AlphaZero-style agent: samples from the replay buffer and updates
//! the policy/value network.
mod base;
mod config;
pub use base::AlphaZero;
pub use config::AlphaZeroConfig;
