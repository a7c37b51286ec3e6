//! Chat session: per-query orchestration over a built index.
//!
//! A [`ChatSession`] owns the read-only [`IndexedCorpus`] and the session's
//! append-only [`ConversationLog`]. Each `ask` runs the synchronous sequence
//! embed query → search → compose → generate, and always appends exactly one
//! user turn and one assistant turn — query-boundary failures become the
//! assistant's response for that turn, never a crash or a hole in the log.
//!
//! Sessions share nothing mutable: concurrent sessions each own their corpus
//! and log.

use std::sync::Arc;
use tracing::warn;

use crate::config::RetrievalConfig;
use crate::embedding::EmbeddingProvider;
use crate::generate::{self, GenerationProvider};
use crate::models::{ConversationLog, IndexedCorpus, RetrievalHit, Role};
use crate::prompt;
use crate::search;

/// Answer shown when the query itself could not be embedded. Distinct from
/// the "nothing relevant found" path: retrieval did not run at all.
pub const RETRIEVAL_FAILED_ANSWER: &str =
    "Maaf, pencarian arsip sedang bermasalah sehingga pertanyaan belum bisa diproses. \
Silakan coba lagi.";

/// Result of one `ask` cycle.
#[derive(Debug)]
pub struct AskOutcome {
    pub answer: String,
    /// Articles the answer was grounded in, best first. Empty when nothing
    /// was relevant or retrieval failed.
    pub hits: Vec<RetrievalHit>,
}

pub struct ChatSession {
    corpus: IndexedCorpus,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    retrieval: RetrievalConfig,
    log: ConversationLog,
}

impl ChatSession {
    pub fn new(
        corpus: IndexedCorpus,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            corpus,
            embedder,
            generator,
            retrieval,
            log: ConversationLog::new(),
        }
    }

    /// Answer one question against the corpus.
    ///
    /// Appends the user turn, retrieves, composes the grounded (or fallback)
    /// prompt, generates, appends the assistant turn, and returns the answer
    /// with the hits it was grounded in.
    pub async fn ask(&mut self, question: &str) -> AskOutcome {
        self.log.append(Role::User, question);

        let hits = match search::search(
            question,
            &self.corpus,
            self.embedder.as_ref(),
            self.retrieval.top_k,
            self.retrieval.min_similarity,
        )
        .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "retrieval failed for this query");
                self.log.append(Role::Assistant, RETRIEVAL_FAILED_ANSWER);
                return AskOutcome {
                    answer: RETRIEVAL_FAILED_ANSWER.to_string(),
                    hits: Vec::new(),
                };
            }
        };

        let composed = prompt::compose(question, &hits, self.retrieval.excerpt_chars);
        let answer = generate::answer(self.generator.as_ref(), &composed).await;

        self.log.append(Role::Assistant, answer.clone());
        AskOutcome { answer, hits }
    }

    /// Number of articles in the session's index.
    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }

    pub fn history(&self) -> &[crate::models::ConversationTurn] {
        self.log.history()
    }
}
