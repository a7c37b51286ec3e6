//! End-to-end pipeline tests over deterministic mock providers.
//!
//! These cover the full flow — scraped JSON files on disk → normalization →
//! indexing → retrieval → prompt → generation → conversation log — without
//! any network access.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use warta::config::{RetrievalConfig, SourceConfig};
use warta::corpus;
use warta::embedding::{EmbedIntent, EmbeddingProvider};
use warta::generate::{GenerationProvider, FALLBACK_ANSWER};
use warta::index::{self, EmbedCache};
use warta::models::Role;
use warta::progress::NoProgress;
use warta::prompt;
use warta::session::ChatSession;

/// Embeds texts into fixed 2D vectors from a lookup table. Unknown text
/// maps to the zero vector; queries use the same table.
struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    fn new(entries: &[(&str, [f32; 2])]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    fn model_name(&self) -> &str {
        "table"
    }
    fn dims(&self) -> usize {
        2
    }
    async fn embed(&self, text: &str, _intent: EmbedIntent) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0, 0.0]))
    }
}

/// Returns the prompt it received, so tests can assert on composition.
struct PromptEchoGenerator;

#[async_trait]
impl GenerationProvider for PromptEchoGenerator {
    fn model_name(&self) -> &str {
        "prompt-echo"
    }
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

struct OutageGenerator;

#[async_trait]
impl GenerationProvider for OutageGenerator {
    fn model_name(&self) -> &str {
        "outage"
    }
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("simulated outage")
    }
}

fn write_source(dir: &TempDir, name: &str, body: &str) -> SourceConfig {
    let path = dir.path().join(format!("scraped_{}.json", name.to_lowercase()));
    fs::write(&path, body).unwrap();
    SourceConfig {
        name: name.to_string(),
        path,
    }
}

/// Unit vector at a known cosine against the query direction (1, 0).
fn at_cosine(c: f32) -> [f32; 2] {
    [c, (1.0 - c * c).sqrt()]
}

#[tokio::test]
async fn indexer_drops_empty_content_article() {
    // Scenario: two articles, one with empty content → index of size 1.
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "BKN",
        r#"{
            "https://bkn.go.id/isi": {"title": "Ada isi", "content": "Pengumuman seleksi."},
            "https://bkn.go.id/kosong": {"title": "Kosong", "content": ""}
        }"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    assert_eq!(documents.len(), 2);

    let embedder = TableEmbedder::new(&[("Pengumuman seleksi.", at_cosine(0.9))]);
    let outcome = index::build_index(&documents, &embedder, &NoProgress).await;

    assert_eq!(outcome.corpus.len(), 1);
    assert_eq!(outcome.skipped_empty, 1);
    assert_eq!(outcome.corpus.documents[0].document.id, "https://bkn.go.id/isi");
}

#[tokio::test]
async fn full_ask_cycle_grounds_answer_in_retrieved_articles() {
    // Three articles at similarities 0.6 / 0.3 / 0.8 against the query:
    // expect doc3 then doc1 in the prompt, doc2 dropped by the floor.
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "Kemenkeu",
        r#"{
            "https://kemenkeu.go.id/d1": {"title": "Pagu anggaran", "content": "anggaran enam"},
            "https://kemenkeu.go.id/d2": {"title": "Bea cukai", "content": "cukai tiga"},
            "https://kemenkeu.go.id/d3": {"title": "APBN 2024", "content": "anggaran delapan"}
        }"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[
        ("anggaran enam", at_cosine(0.6)),
        ("cukai tiga", at_cosine(0.3)),
        ("anggaran delapan", at_cosine(0.8)),
        ("anggaran 2024", [1.0, 0.0]),
    ]));

    let outcome = index::build_index(&documents, embedder.as_ref(), &NoProgress).await;
    let mut session = ChatSession::new(
        outcome.corpus,
        embedder,
        Arc::new(PromptEchoGenerator),
        RetrievalConfig::default(),
    );

    let result = session.ask("anggaran 2024").await;

    let ids: Vec<&str> = result.hits.iter().map(|h| h.document.id.as_str()).collect();
    assert_eq!(ids, vec!["https://kemenkeu.go.id/d3", "https://kemenkeu.go.id/d1"]);
    assert!(result.hits.iter().all(|h| h.similarity > 0.4));

    // The generator saw both context blocks, in rank order, plus the
    // closed-book instruction.
    assert!(result.answer.contains("--- Konteks 1 ---"));
    assert!(result.answer.contains("--- Konteks 2 ---"));
    assert!(!result.answer.contains("--- Konteks 3 ---"));
    assert!(result.answer.contains("APBN 2024"));
    assert!(result.answer.contains(prompt::GROUNDING_INSTRUCTION));
    assert!(result.answer.contains(prompt::REFUSAL_SENTENCE));
    let d3_pos = result.answer.find("APBN 2024").unwrap();
    let d1_pos = result.answer.find("Pagu anggaran").unwrap();
    assert!(d3_pos < d1_pos);
}

#[tokio::test]
async fn irrelevant_query_gets_insufficiency_prompt_without_context() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "Kemhan",
        r#"{"https://kemhan.go.id/a": {"title": "Alutsista", "content": "pertahanan"}}"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[
        ("pertahanan", at_cosine(0.1)),
        ("resep rendang", [1.0, 0.0]),
    ]));

    let outcome = index::build_index(&documents, embedder.as_ref(), &NoProgress).await;
    let mut session = ChatSession::new(
        outcome.corpus,
        embedder,
        Arc::new(PromptEchoGenerator),
        RetrievalConfig::default(),
    );

    let result = session.ask("resep rendang").await;
    assert!(result.hits.is_empty());
    assert!(result.answer.contains(prompt::NO_CONTEXT_INSTRUCTION));
    assert!(!result.answer.contains("--- Konteks"));
}

#[tokio::test]
async fn generation_outage_yields_fallback_and_one_assistant_turn() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "Kemnaker",
        r#"{"https://kemnaker.go.id/a": {"title": "Upah minimum", "content": "upah"}}"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    let embedder = Arc::new(TableEmbedder::new(&[
        ("upah", at_cosine(0.9)),
        ("upah minimum", [1.0, 0.0]),
    ]));

    let outcome = index::build_index(&documents, embedder.as_ref(), &NoProgress).await;
    let mut session = ChatSession::new(
        outcome.corpus,
        embedder,
        Arc::new(OutageGenerator),
        RetrievalConfig::default(),
    );

    let result = session.ask("upah minimum").await;
    assert_eq!(result.answer, FALLBACK_ANSWER);

    let assistant_turns = session
        .history()
        .iter()
        .filter(|t| t.role == Role::Assistant)
        .count();
    assert_eq!(assistant_turns, 1);
}

#[tokio::test]
async fn cached_index_is_not_reembedded() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "Komdigi",
        r#"{"https://komdigi.go.id/a": {"title": "Literasi digital", "content": "digital"}}"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    let embedder = TableEmbedder::new(&[("digital", at_cosine(0.9))]);
    let mut cache = EmbedCache::new();

    index::build_index_cached(&mut cache, &documents, &embedder, &NoProgress).await;
    let calls = embedder.calls.load(Ordering::SeqCst);
    let again = index::build_index_cached(&mut cache, &documents, &embedder, &NoProgress).await;

    assert_eq!(embedder.calls.load(Ordering::SeqCst), calls);
    assert_eq!(again.len(), 1);
}

#[tokio::test]
async fn reindexing_same_corpus_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "BKN",
        r#"{
            "https://bkn.go.id/a": {"title": "A", "content": "satu"},
            "https://bkn.go.id/b": {"title": "B", "content": "dua"}
        }"#,
    );

    let (documents, _) = corpus::load_corpus(&[source]).unwrap();
    let embedder = TableEmbedder::new(&[("satu", at_cosine(0.5)), ("dua", at_cosine(0.7))]);

    let first = index::build_index(&documents, &embedder, &NoProgress).await;
    let second = index::build_index(&documents, &embedder, &NoProgress).await;

    let ids = |outcome: &index::IndexOutcome| {
        outcome
            .corpus
            .documents
            .iter()
            .map(|d| d.document.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}
