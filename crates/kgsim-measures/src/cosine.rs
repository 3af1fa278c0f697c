//! Cosine helpers over L2-normalized vectors.
//!
//! Vectors are normalized once into `f64` unit vectors and then compared by
//! plain dot products, so a batch never re-normalizes per pair.

/// L2-normalize `v` in `f64`. `None` for empty or zero-magnitude vectors.
pub fn unit_vector(v: &[f32]) -> Option<Vec<f64>> {
    let norm = v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if v.is_empty() || norm < f64::EPSILON || !norm.is_finite() {
        return None;
    }
    Some(v.iter().map(|x| *x as f64 / norm).collect())
}

/// Dot product of two unit vectors. Mismatched dimensions score 0.0.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Similarity of two unit vectors: cosine with anti-correlation mapped to 0.
pub fn unit_similarity(a: &[f64], b: &[f64]) -> f64 {
    let sim = dot(a, b);
    if sim.is_nan() {
        0.0
    } else {
        sim.clamp(0.0, 1.0)
    }
}

/// Clamped cosine similarity of two raw vectors.
/// Returns 0.0 for empty, zero-magnitude, or mismatched vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    match (unit_vector(a), unit_vector(b)) {
        (Some(a), Some(b)) => unit_similarity(&a, &b),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
    }

    #[test]
    fn anti_correlated_vectors_clamp_to_zero() {
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[-1.0, -0.5]), 0.0);
    }

    #[test]
    fn degenerate_inputs_return_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let u = unit_vector(&[3.0, 4.0]).unwrap();
        assert!((u[0] - 0.6).abs() < 1e-12);
        assert!((u[1] - 0.8).abs() < 1e-12);
        assert!(unit_vector(&[0.0]).is_none());
    }
}
