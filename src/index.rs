//! Embedding indexer.
//!
//! Turns the normalized corpus into an [`IndexedCorpus`] by embedding every
//! article with intent [`EmbedIntent::Document`]. Articles with empty content
//! are skipped outright; per-article provider failures are logged and the
//! article excluded — both are non-fatal, partial outcomes.
//!
//! Re-embedding the same corpus within a session is avoided through an
//! explicit [`EmbedCache`] owned by the caller, keyed by a SHA-256
//! fingerprint of the corpus contents. The cache is pure memoization, not a
//! correctness requirement.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::warn;

use crate::embedding::{EmbedIntent, EmbeddingProvider};
use crate::models::{Document, EmbeddedDocument, IndexedCorpus};
use crate::progress::{IndexProgressEvent, IndexProgressReporter};

/// Outcome of one indexing pass.
#[derive(Debug)]
pub struct IndexOutcome {
    pub corpus: IndexedCorpus,
    /// Articles skipped because their content was empty.
    pub skipped_empty: usize,
    /// Articles excluded because the provider failed for them.
    pub failed: usize,
}

/// Session-owned cache of built indexes, keyed by corpus fingerprint.
#[derive(Default)]
pub struct EmbedCache {
    entries: HashMap<String, IndexedCorpus>,
}

impl EmbedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &str) -> Option<&IndexedCorpus> {
        self.entries.get(fingerprint)
    }

    pub fn put(&mut self, fingerprint: String, corpus: IndexedCorpus) {
        self.entries.insert(fingerprint, corpus);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 fingerprint of a normalized corpus: ids and contents in order.
///
/// Two corpora with the same articles in the same order share a fingerprint,
/// so a cached index can be reused instead of re-embedding.
pub fn corpus_fingerprint(documents: &[Document]) -> String {
    let mut hasher = Sha256::new();
    for doc in documents {
        hasher.update(doc.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(doc.content.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Embed the full corpus, reporting progress after every article.
///
/// Idempotent for a fixed input sequence and provider behavior: the output
/// contains the same article ids in the same order on every run.
pub async fn build_index(
    documents: &[Document],
    provider: &dyn EmbeddingProvider,
    reporter: &dyn IndexProgressReporter,
) -> IndexOutcome {
    let total = documents.len();
    let mut corpus = IndexedCorpus::default();
    let mut skipped_empty = 0;
    let mut failed = 0;

    for (i, doc) in documents.iter().enumerate() {
        if doc.content.is_empty() {
            skipped_empty += 1;
        } else {
            match provider.embed(&doc.content, EmbedIntent::Document).await {
                Ok(embedding) => corpus.documents.push(EmbeddedDocument {
                    document: doc.clone(),
                    embedding,
                }),
                Err(e) => {
                    warn!(url = %doc.id, source = %doc.source, error = %e, "embedding failed, article excluded");
                    failed += 1;
                }
            }
        }

        reporter.report(IndexProgressEvent { n: i + 1, total });
    }

    IndexOutcome {
        corpus,
        skipped_empty,
        failed,
    }
}

/// Build the index, consulting the cache first.
///
/// On a cache hit the provider is never called. On a miss the built index is
/// stored under the corpus fingerprint before being returned.
pub async fn build_index_cached(
    cache: &mut EmbedCache,
    documents: &[Document],
    provider: &dyn EmbeddingProvider,
    reporter: &dyn IndexProgressReporter,
) -> IndexedCorpus {
    let fingerprint = corpus_fingerprint(documents);
    if let Some(corpus) = cache.get(&fingerprint) {
        return corpus.clone();
    }

    let outcome = build_index(documents, provider, reporter).await;
    cache.put(fingerprint, outcome.corpus.clone());
    outcome.corpus
}
