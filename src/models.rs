//! Core data models for the retrieval pipeline.
//!
//! These types represent the articles, embedded corpus, retrieval hits, and
//! conversation turns that flow through the question-answering pipeline.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw article record as it appears in a scraped JSON file, keyed by URL.
///
/// Scraper output is loosely shaped: any field other than the URL key may be
/// missing, so everything here is optional and defaulted at normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Unix seconds when the scraper fetched the page. Scrapers emit this
    /// as a float (`time.time()`), so it is not an integer on the wire.
    #[serde(default)]
    pub scraped_at: Option<f64>,
}

/// Normalized article. `id` is the source URL, unique within the corpus.
///
/// `title` and `content` are always present (empty string when the scrape
/// had none); an article with empty `content` is never embedded.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    /// Name of the originating source (e.g. `"Kemenkeu"`).
    pub source: String,
    pub title: String,
    pub content: String,
    /// Publication date string as scraped, unparsed.
    pub published_at: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
}

impl Document {
    /// First 120 characters of content, with an ellipsis when truncated.
    pub fn content_preview(&self) -> String {
        let mut preview: String = self.content.chars().take(120).collect();
        if self.content.chars().count() > 120 {
            preview.push_str("...");
        }
        preview
    }
}

/// A document paired with its embedding vector.
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// The embedded corpus, built once per session and read-only afterwards.
///
/// Every member carries a non-empty embedding; documents that failed or
/// skipped embedding are excluded entirely, never retained as null entries.
#[derive(Debug, Clone, Default)]
pub struct IndexedCorpus {
    pub documents: Vec<EmbeddedDocument>,
}

impl IndexedCorpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// A single retrieval hit: a corpus document and its cosine similarity to
/// the query, in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct RetrievalHit {
    pub document: Document,
    pub similarity: f32,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the session's conversation.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

/// Append-only conversation log, scoped to one session.
///
/// `append` is the only mutator; turns are never edited or reordered.
#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role,
            text: text.into(),
        });
    }

    /// The full ordered log.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
