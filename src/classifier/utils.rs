use ndarray::Array1;

/// Converts a vector of logits into a probability distribution summing to 1.
///
/// Computed with the shifted formulation `exp(x - max) / sum(exp(x - max))`
/// so that large logits cannot overflow `f32`.
pub fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    if logits.is_empty() {
        return Array1::zeros(0);
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Array1<f32> = logits.mapv(|x| (x - max).exp());
    let sum: f32 = exp.sum();
    exp / sum
}

/// Returns the index of the maximum value, resolving ties to the lowest index.
///
/// Returns `None` for an empty vector.
pub fn argmax(values: &Array1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            // Strict comparison keeps the first occurrence on ties
            Some((_, max)) if v > max => best = Some((i, v)),
            None => best = Some((i, v)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&array![1.0, 2.0, 3.0, 4.0]);
        let sum: f32 = probs.sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // Larger logit, larger probability
        assert!(probs[3] > probs[0]);
    }

    #[test]
    fn test_softmax_is_stable_under_large_logits() {
        let probs = softmax(&array![1000.0, 999.0, 998.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f32 = probs.sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_softmax_uniform_input() {
        let probs = softmax(&array![5.0, 5.0, 5.0, 5.0]);
        for &p in probs.iter() {
            assert!((p - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_empty() {
        let probs = softmax(&Array1::zeros(0));
        assert!(probs.is_empty());
    }

    #[test]
    fn test_argmax_first_occurrence_on_tie() {
        assert_eq!(argmax(&array![0.1, 0.7, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&array![3.0, 3.0]), Some(0));
    }

    #[test]
    fn test_argmax_basic() {
        assert_eq!(argmax(&array![0.1, 0.2, 0.9, 0.3]), Some(2));
        assert_eq!(argmax(&array![-5.0, -1.0, -3.0]), Some(1));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&Array1::zeros(0)), None);
    }
}
