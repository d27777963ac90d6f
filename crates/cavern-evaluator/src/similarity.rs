use std::iter;

/// Reason a cosine similarity is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SimilarityError {
    #[display("cannot compare empty vectors")]
    Empty,
    #[display("vector lengths differ ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("vector has zero magnitude")]
    ZeroMagnitude,
}

/// Cosine of the angle between `a` and `b`.
///
/// # Errors
///
/// Returns an error when either vector is empty, when their lengths differ, or
/// when either has zero magnitude.
///
/// ```
/// use cavern_evaluator::similarity::{SimilarityError, cosine_similarity};
///
/// assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), Ok(0.0));
/// assert_eq!(
///     cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]),
///     Err(SimilarityError::ZeroMagnitude)
/// );
/// ```
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    if a.is_empty() || b.is_empty() {
        return Err(SimilarityError::Empty);
    }
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let dot: f64 = iter::zip(a, b).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Err(SimilarityError::ZeroMagnitude);
    }
    Ok(dot / (magnitude_a * magnitude_b))
}

/// Divides each value by the largest one.
///
/// The largest value becomes `1.0` and ratios between values are preserved.
/// Returns all zeros when the maximum is zero.
///
/// ```
/// use cavern_evaluator::similarity::normalize_maxed;
///
/// assert_eq!(normalize_maxed(1.0, 4.0, 2.0), [0.25, 1.0, 0.5]);
/// assert_eq!(normalize_maxed(0.0, 0.0, 0.0), [0.0; 3]);
/// ```
#[must_use]
pub fn normalize_maxed(v1: f64, v2: f64, v3: f64) -> [f64; 3] {
    let max = v1.max(v2).max(v3);
    if max == 0.0 {
        return [0.0; 3];
    }
    [v1 / max, v2 / max, v3 / max]
}
