//! In-memory vector index over the knowledge base.

use std::cmp::Ordering;

use serde::Serialize;

use crate::embeddings::Embedder;
use crate::error::RetrievalError;
use crate::vector::TextVector;

/// One knowledge-base document. Immutable once indexed.
#[derive(Debug, Clone)]
pub struct Passage {
    id: usize,
    text: String,
    /// Stored at unit length so a query is a single dot product.
    unit: TextVector,
}

impl Passage {
    /// Position of the passage in the original corpus.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A passage paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPassage {
    pub id: usize,
    pub text: String,
    pub similarity: f32,
}

/// Exhaustive cosine-similarity index, built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    passages: Vec<Passage>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every passage of `corpus`, in order, and index the results.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Embedding`] if any passage fails to embed and
    /// [`RetrievalError::InconsistentCorpus`] if the embedder returns a vector
    /// whose length differs from its declared dimension.
    pub async fn build<E: Embedder>(
        embedder: &E,
        corpus: &[String],
    ) -> Result<Self, RetrievalError> {
        let mut entries = Vec::with_capacity(corpus.len());
        for text in corpus {
            let vector = embedder.embed(text).await?;
            entries.push((text.clone(), vector));
        }

        let index = Self::from_vectors(embedder.dimension(), entries)?;
        tracing::info!(
            passages = index.len(),
            dimension = index.dimension(),
            "knowledge base indexed"
        );
        Ok(index)
    }

    /// Index pre-computed `(text, vector)` pairs. Ids follow input order.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InconsistentCorpus`] if a vector's length is
    /// not `dimension`.
    pub fn from_vectors(
        dimension: usize,
        entries: Vec<(String, TextVector)>,
    ) -> Result<Self, RetrievalError> {
        let passages = entries
            .into_iter()
            .enumerate()
            .map(|(id, (text, vector))| {
                if vector.dimension() == dimension {
                    Ok(Passage {
                        id,
                        text,
                        unit: vector.normalized(),
                    })
                } else {
                    Err(RetrievalError::InconsistentCorpus {
                        id,
                        expected: dimension,
                        actual: vector.dimension(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            passages,
            dimension,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    #[must_use]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Top-`k` passages by descending cosine similarity, with scores.
    ///
    /// `k` is clamped to the corpus size. Equal similarities keep corpus
    /// order. The query must have the index's dimension; [`crate::Retriever`]
    /// checks this before calling.
    #[must_use]
    pub fn query_scored(&self, vector: &TextVector, k: usize) -> Vec<ScoredPassage> {
        let query = vector.normalized();
        let mut scored: Vec<(usize, f32)> = self
            .passages
            .iter()
            .enumerate()
            .map(|(pos, p)| (pos, query.dot(&p.unit).clamp(-1.0, 1.0)))
            .collect();

        // sort_by is stable, so ties stay in insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(pos, similarity)| {
                let p = &self.passages[pos];
                ScoredPassage {
                    id: p.id,
                    text: p.text.clone(),
                    similarity,
                }
            })
            .collect()
    }

    /// Top-`k` passage texts by descending cosine similarity.
    #[must_use]
    pub fn query(&self, vector: &TextVector, k: usize) -> Vec<String> {
        self.query_scored(vector, k)
            .into_iter()
            .map(|p| p.text)
            .collect()
    }
}
