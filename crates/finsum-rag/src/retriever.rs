//! Query-text to top-k passages.

use crate::embeddings::Embedder;
use crate::error::RetrievalError;
use crate::index::{ScoredPassage, VectorIndex};

/// Embeds a query and looks it up in a prebuilt [`VectorIndex`].
///
/// Borrows both handles; build them once at startup and share them across
/// requests.
pub struct Retriever<'a, E> {
    embedder: &'a E,
    index: &'a VectorIndex,
}

impl<'a, E: Embedder> Retriever<'a, E> {
    #[must_use]
    pub fn new(embedder: &'a E, index: &'a VectorIndex) -> Self {
        Self { embedder, index }
    }

    /// Texts of the `k` passages most similar to `query`.
    ///
    /// # Errors
    ///
    /// See [`Retriever::retrieve_scored`].
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        let scored = self.retrieve_scored(query, k).await?;
        Ok(scored.into_iter().map(|p| p.text).collect())
    }

    /// The `k` passages most similar to `query`, with their similarities.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Embedding`] if the query cannot be embedded,
    /// or [`RetrievalError::DimensionMismatch`] if the embedder and the index
    /// disagree on vector length (e.g. the embedder was swapped after the
    /// index was built).
    pub async fn retrieve_scored(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, RetrievalError> {
        let vector = self.embedder.embed(query).await?;

        if vector.dimension() != self.index.dimension() {
            return Err(RetrievalError::DimensionMismatch {
                index: self.index.dimension(),
                query: vector.dimension(),
            });
        }

        let passages = self.index.query_scored(&vector, k);
        tracing::debug!(
            requested = k,
            returned = passages.len(),
            top_similarity = passages.first().map(|p| p.similarity),
            "retrieved passages"
        );
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;

    fn corpus() -> Vec<String> {
        finsum_core::KnowledgeBase::default().passages
    }

    #[tokio::test]
    async fn scenario_query_ranks_fed_passage_first() {
        let embedder = HashingEmbedder::new(384);
        let index = VectorIndex::build(&embedder, &corpus()).await.unwrap();
        let retriever = Retriever::new(&embedder, &index);

        let top = retriever
            .retrieve("The Federal Reserve raised interest rates today.", 3)
            .await
            .unwrap();

        assert_eq!(top.len(), 3);
        assert_eq!(
            top[0],
            "The Federal Reserve announced an interest rate hike amid inflation concerns."
        );
    }

    #[tokio::test]
    async fn swapped_embedder_is_reported_as_dimension_mismatch() {
        let original = HashingEmbedder::new(384);
        let index = VectorIndex::build(&original, &corpus()).await.unwrap();

        let swapped = HashingEmbedder::new(128);
        let retriever = Retriever::new(&swapped, &index);
        let err = retriever.retrieve("oil prices", 3).await.unwrap_err();

        assert!(
            matches!(
                err,
                RetrievalError::DimensionMismatch {
                    index: 384,
                    query: 128
                }
            ),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn empty_query_returns_passages_in_corpus_order() {
        let embedder = HashingEmbedder::new(64);
        let index = VectorIndex::build(&embedder, &corpus()).await.unwrap();
        let retriever = Retriever::new(&embedder, &index);

        let scored = retriever.retrieve_scored("   ", 2).await.unwrap();
        let ids: Vec<usize> = scored.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
