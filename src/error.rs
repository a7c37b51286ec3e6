//! Error taxonomy for the retrieval pipeline.
//!
//! Failures below the query boundary (source loading, per-document embedding)
//! are absorbed where they occur and only logged; the variants here are the
//! ones a caller can actually observe. Generation failures never surface as
//! errors at all — the generation client converts them into a fixed fallback
//! answer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WartaError {
    /// No articles loaded across all configured sources. Fatal: there is
    /// nothing to index or answer from.
    #[error("no articles loaded from any configured source")]
    EmptyCorpus,

    /// The query itself could not be embedded. Fatal to the current query
    /// only; distinct from a search that found no relevant documents.
    #[error("failed to embed query: {0}")]
    QueryEmbedding(#[source] anyhow::Error),
}
