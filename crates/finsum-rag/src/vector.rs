//! Fixed-length text vectors and cosine similarity.

/// An embedding: a finite `f32` vector whose length is fixed per embedder.
#[derive(Debug, Clone, PartialEq)]
pub struct TextVector(Vec<f32>);

impl TextVector {
    /// Wrap raw components. Returns `None` if any component is NaN or infinite.
    #[must_use]
    pub fn new(values: Vec<f32>) -> Option<Self> {
        if values.iter().all(|v| v.is_finite()) {
            Some(Self(values))
        } else {
            None
        }
    }

    /// Wrap components already known to be finite (sums of small integers).
    pub(crate) fn from_finite(values: Vec<f32>) -> Self {
        debug_assert!(values.iter().all(|v| v.is_finite()));
        Self(values)
    }

    /// The all-zero vector of the given dimension.
    #[must_use]
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Euclidean (L2) norm.
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.0.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit length. The zero vector stays zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        Self(self.0.iter().map(|v| v / norm).collect())
    }

    /// Dot product over the shared prefix of both vectors.
    pub(crate) fn dot(&self, other: &Self) -> f32 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }
}

/// Cosine similarity in `[-1, 1]`; `0.0` when either vector is zero.
///
/// Both operands are expected to share a dimension.
#[must_use]
pub fn cosine_similarity(a: &TextVector, b: &TextVector) -> f32 {
    debug_assert_eq!(a.dimension(), b.dimension());
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        0.0
    } else {
        (a.dot(b) / denom).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(values: &[f32]) -> TextVector {
        TextVector::new(values.to_vec()).expect("finite test vector")
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(TextVector::new(vec![1.0, f32::NAN]).is_none());
        assert!(TextVector::new(vec![f32::INFINITY]).is_none());
    }

    #[test]
    fn zeros_has_requested_dimension() {
        let z = TextVector::zeros(5);
        assert_eq!(z.dimension(), 5);
        assert!(z.is_zero());
    }

    #[test]
    fn cosine_is_scale_invariant() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[10.0, 20.0, 30.0]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let a = v(&[1.0, 0.0]);
        let b = v(&[-3.0, 0.0]);
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = v(&[1.0, 0.0]);
        let b = v(&[0.0, 2.0]);
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = v(&[1.0, 2.0]);
        assert_eq!(cosine_similarity(&a, &TextVector::zeros(2)), 0.0);
    }

    #[test]
    fn normalized_has_unit_length() {
        let n = v(&[3.0, 4.0]).normalized();
        assert!((n.norm() - 1.0).abs() < 1e-6);
        assert!((n.as_slice()[0] - 0.6).abs() < 1e-6);
    }
}
