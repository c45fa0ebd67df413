//! Offline feature-hashing embedder.

use sha2::{Digest, Sha256};

use finsum_core::tokenize;

use super::Embedder;
use crate::error::EmbeddingError;
use crate::vector::TextVector;

/// Signed bag-of-words hashing into a fixed number of buckets.
///
/// Each token is hashed with SHA-256: the first 8 bytes (big-endian) modulo
/// the dimension pick the bucket, and the low bit of byte 8 picks the sign.
/// No state, no I/O, same text always gives the same vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "hashing embedder needs at least one bucket");
        Self { dimension }
    }

    /// Vectorize `text` synchronously.
    #[must_use]
    pub fn vectorize(&self, text: &str) -> TextVector {
        let mut buckets = vec![0.0_f32; self.dimension];
        for token in tokenize(text) {
            let (bucket, sign) = self.slot(&token);
            buckets[bucket] += sign;
        }
        TextVector::from_finite(buckets)
    }

    fn slot(&self, token: &str) -> (usize, f32) {
        let hash = Sha256::digest(token.as_bytes());
        let mut head = [0_u8; 8];
        head.copy_from_slice(&hash[..8]);
        let raw = u64::from_be_bytes(head);
        // dimension fits in u64 on every supported target
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (raw % self.dimension as u64) as usize;
        let sign = if hash[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<TextVector, EmbeddingError> {
        Ok(self.vectorize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine_similarity;

    #[test]
    fn same_text_gives_identical_vectors() {
        let e = HashingEmbedder::new(384);
        let text = "Oil prices surged due to supply constraints.";
        assert_eq!(e.vectorize(text), e.vectorize(text));
    }

    #[test]
    fn vectors_have_configured_dimension() {
        let e = HashingEmbedder::new(64);
        assert_eq!(e.vectorize("anything at all").dimension(), 64);
    }

    #[test]
    fn empty_and_whitespace_text_embed_to_zero() {
        let e = HashingEmbedder::new(32);
        assert!(e.vectorize("").is_zero());
        assert!(e.vectorize("  \n\t ").is_zero());
        assert_eq!(e.vectorize("").dimension(), 32);
    }

    #[test]
    fn embedding_ignores_case_and_punctuation() {
        let e = HashingEmbedder::new(128);
        assert_eq!(e.vectorize("Interest RATES!"), e.vectorize("interest rates"));
    }

    #[test]
    fn shared_words_raise_similarity() {
        let e = HashingEmbedder::new(384);
        let query = e.vectorize("The Federal Reserve raised interest rates today.");
        let fed = e.vectorize(
            "The Federal Reserve announced an interest rate hike amid inflation concerns.",
        );
        let oil = e.vectorize("Oil prices surged due to supply constraints and geopolitical tensions.");
        assert!(cosine_similarity(&query, &fed) > cosine_similarity(&query, &oil));
    }

    #[tokio::test]
    async fn trait_embed_matches_vectorize() {
        let e = HashingEmbedder::new(16);
        let via_trait = e.embed("bank earnings").await.unwrap();
        assert_eq!(via_trait, e.vectorize("bank earnings"));
    }
}
