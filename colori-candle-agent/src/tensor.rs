//! Conversions from the core's `ndarray` batches to candle tensors.
use anyhow::Result;
use candle_core::{Device, Tensor};
use colori_core::replay_buffer::SampleBatch;
use ndarray::{Array1, Array2, Array3};

/// Converts a rank-1 array to a tensor on the given device.
pub fn array1_to_tensor(a: &Array1<f32>, device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = a.iter().copied().collect();
    Ok(Tensor::from_vec(data, a.len(), device)?)
}

/// Converts a rank-2 array to a tensor on the given device.
pub fn array2_to_tensor(a: &Array2<f32>, device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = a.iter().copied().collect();
    Ok(Tensor::from_vec(data, a.dim(), device)?)
}

/// Converts a rank-3 array to a tensor on the given device.
pub fn array3_to_tensor(a: &Array3<f32>, device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = a.iter().copied().collect();
    Ok(Tensor::from_vec(data, a.dim(), device)?)
}

/// Converts a boolean mask to a `U8` tensor (1 = valid action).
///
/// `U8` is what `where_cond` expects as a condition, and a cheap cast
/// away from the `F32` form needed for arithmetic.
pub fn mask_to_tensor(a: &Array2<bool>, device: &Device) -> Result<Tensor> {
    let data: Vec<u8> = a.iter().map(|&b| b as u8).collect();
    Ok(Tensor::from_vec(data, a.dim(), device)?)
}

/// A [`SampleBatch`] converted to candle tensors.
#[derive(Debug)]
pub struct TensorBatch {
    /// State encodings, `F32 [B, S]`.
    pub states: Tensor,

    /// Action features, `F32 [B, M, A]`.
    pub action_features: Tensor,

    /// Action masks, `U8 [B, M]`.
    pub action_masks: Tensor,

    /// Target visit distributions, `F32 [B, M]`.
    pub policies: Tensor,

    /// Target outcomes, `F32 [B]`.
    pub values: Tensor,
}

impl TensorBatch {
    /// Converts a sampled batch to tensors on the given device.
    pub fn from_sample_batch(batch: &SampleBatch, device: &Device) -> Result<Self> {
        Ok(Self {
            states: array2_to_tensor(&batch.states, device)?,
            action_features: array3_to_tensor(&batch.action_features, device)?,
            action_masks: mask_to_tensor(&batch.action_masks, device)?,
            policies: array2_to_tensor(&batch.policies, device)?,
            values: array1_to_tensor(&batch.values, device)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn preserves_row_major_order() {
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];
        let t = array2_to_tensor(&a, &Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[2, 2]);
        assert_eq!(
            t.flatten_all().unwrap().to_vec1::<f32>().unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn mask_becomes_u8() {
        let m = array![[true, false], [false, true]];
        let t = mask_to_tensor(&m, &Device::Cpu).unwrap();
        assert_eq!(t.to_vec2::<u8>().unwrap(), vec![vec![1, 0], vec![0, 1]]);
    }
}
