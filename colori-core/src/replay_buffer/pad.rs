//! Unification of ragged sample chunks to a common action width.
use super::SampleBatch;
use crate::error::ColoriError;
use ndarray::{s, Array1, Array2, Array3};

/// Merges chunks of differing action widths into one rectangular batch.
///
/// The output width is the maximum width over all chunks. A chunk
/// narrower than that gets trailing columns appended: all-zero feature
/// vectors, `false` mask entries and zero policy mass, so a padded slot
/// can never be mistaken for a legal action. Chunks are concatenated
/// along the sample axis in input order; the inputs are not mutated.
///
/// # Errors
///
/// Chunks disagreeing on the feature dimension or the state width are
/// a caller bug and produce [`ColoriError::FeatureDimMismatch`] /
/// [`ColoriError::StateDimMismatch`]. An empty chunk list produces
/// [`ColoriError::EmptyBuffer`].
pub fn pad_to_max_actions(chunks: &[SampleBatch]) -> Result<SampleBatch, ColoriError> {
    let (first, rest) = match chunks.split_first() {
        Some(x) => x,
        None => return Err(ColoriError::EmptyBuffer),
    };

    let state_w = first.state_dim();
    let feat_w = first.feature_dim();
    for c in rest {
        if c.feature_dim() != feat_w {
            return Err(ColoriError::FeatureDimMismatch {
                expected: feat_w,
                got: c.feature_dim(),
            });
        }
        if c.state_dim() != state_w {
            return Err(ColoriError::StateDimMismatch {
                expected: state_w,
                got: c.state_dim(),
            });
        }
    }

    let m_max = chunks.iter().map(|c| c.num_actions()).max().unwrap_or(0);
    let n_total: usize = chunks.iter().map(|c| c.len()).sum();

    let mut states = Array2::<f32>::zeros((n_total, state_w));
    let mut action_features = Array3::<f32>::zeros((n_total, m_max, feat_w));
    let mut action_masks = Array2::<bool>::from_elem((n_total, m_max), false);
    let mut policies = Array2::<f32>::zeros((n_total, m_max));
    let mut values = Array1::<f32>::zeros(n_total);

    let mut row = 0;
    for c in chunks {
        let n = c.len();
        let m = c.num_actions();
        states.slice_mut(s![row..row + n, ..]).assign(&c.states);
        action_features
            .slice_mut(s![row..row + n, ..m, ..])
            .assign(&c.action_features);
        action_masks
            .slice_mut(s![row..row + n, ..m])
            .assign(&c.action_masks);
        policies.slice_mut(s![row..row + n, ..m]).assign(&c.policies);
        values.slice_mut(s![row..row + n]).assign(&c.values);
        row += n;
    }

    SampleBatch::new(states, action_features, action_masks, policies, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3};

    fn batch(n: usize, m: usize, feat_w: usize, value: f32) -> SampleBatch {
        SampleBatch::new(
            Array2::from_elem((n, 4), value),
            Array3::from_elem((n, m, feat_w), value),
            Array2::from_elem((n, m), true),
            Array2::from_elem((n, m), 1.0 / m as f32),
            Array1::from_elem(n, value),
        )
        .unwrap()
    }

    #[test]
    fn pads_to_widest_chunk() {
        let merged = pad_to_max_actions(&[batch(4, 3, 2, 1.0), batch(2, 5, 2, 2.0)]).unwrap();

        assert_eq!(merged.len(), 6);
        assert_eq!(merged.num_actions(), 5);

        // Entries within the original width are unchanged.
        for i in 0..4 {
            for j in 0..3 {
                assert!(merged.action_masks[[i, j]]);
                assert!((merged.policies[[i, j]] - 1.0 / 3.0).abs() < 1e-6);
                assert_eq!(merged.action_features[[i, j, 0]], 1.0);
            }
            // Padded slots are inert.
            for j in 3..5 {
                assert!(!merged.action_masks[[i, j]]);
                assert_eq!(merged.policies[[i, j]], 0.0);
                assert_eq!(merged.action_features[[i, j, 0]], 0.0);
                assert_eq!(merged.action_features[[i, j, 1]], 0.0);
            }
        }
    }

    #[test]
    fn concatenates_in_input_order() {
        let merged = pad_to_max_actions(&[batch(2, 3, 2, 1.0), batch(3, 3, 2, 2.0)]).unwrap();
        assert_eq!(merged.values.to_vec(), vec![1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn does_not_mutate_inputs() {
        let narrow = batch(2, 3, 2, 1.0);
        let chunks = vec![narrow.clone(), batch(1, 6, 2, 2.0)];
        let _ = pad_to_max_actions(&chunks).unwrap();
        assert_eq!(chunks[0].num_actions(), narrow.num_actions());
        assert_eq!(chunks[0].policies, narrow.policies);
    }

    #[test]
    fn rejects_feature_dim_mismatch() {
        let r = pad_to_max_actions(&[batch(2, 3, 2, 1.0), batch(2, 3, 7, 1.0)]);
        assert!(matches!(r, Err(ColoriError::FeatureDimMismatch { .. })));
    }

    #[test]
    fn rejects_empty_chunk_list() {
        assert!(matches!(
            pad_to_max_actions(&[]),
            Err(ColoriError::EmptyBuffer)
        ));
    }

    #[test]
    fn single_chunk_roundtrips() {
        let b = batch(3, 4, 2, 1.5);
        let merged = pad_to_max_actions(&[b.clone()]).unwrap();
        assert_eq!(merged.num_actions(), 4);
        assert_eq!(merged.policies, b.policies);
        assert_eq!(merged.action_masks, b.action_masks);
    }
}
