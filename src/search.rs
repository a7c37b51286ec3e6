//! Similarity search over the embedded corpus.
//!
//! The query is embedded with intent [`EmbedIntent::Query`], ranked against
//! every article by cosine similarity, cut to the top-k, and then filtered by
//! the relevance floor. The floor is applied after selection, so a query can
//! legitimately return fewer than k hits — or none at all — even when the
//! corpus is large. An empty final result is a valid answer ("nothing
//! relevant"), not an error.

use crate::embedding::{cosine_similarity, EmbedIntent, EmbeddingProvider};
use crate::error::WartaError;
use crate::models::{IndexedCorpus, RetrievalHit};

/// Embed the query and return the relevant articles, best first.
///
/// # Errors
///
/// [`WartaError::QueryEmbedding`] when the provider cannot embed the query.
/// This is distinct from an empty result: the caller should tell the user
/// retrieval failed rather than claim nothing matched.
pub async fn search(
    query: &str,
    corpus: &IndexedCorpus,
    provider: &dyn EmbeddingProvider,
    top_k: usize,
    min_similarity: f32,
) -> Result<Vec<RetrievalHit>, WartaError> {
    if corpus.is_empty() {
        return Ok(Vec::new());
    }

    let query_vec = provider
        .embed(query, EmbedIntent::Query)
        .await
        .map_err(WartaError::QueryEmbedding)?;

    Ok(rank(&query_vec, corpus, top_k, min_similarity))
}

/// Rank the corpus against an already-embedded query.
///
/// Sorting is stable and descending, so ties keep corpus order (first seen
/// wins). Selection happens before the relevance floor: the top-k are chosen
/// first, then anything at or below `min_similarity` is dropped.
pub fn rank(
    query_vec: &[f32],
    corpus: &IndexedCorpus,
    top_k: usize,
    min_similarity: f32,
) -> Vec<RetrievalHit> {
    let mut hits: Vec<RetrievalHit> = corpus
        .documents
        .iter()
        .map(|entry| RetrievalHit {
            document: entry.document.clone(),
            similarity: cosine_similarity(query_vec, &entry.embedding),
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(top_k);
    hits.retain(|hit| hit.similarity > min_similarity);

    hits
}
