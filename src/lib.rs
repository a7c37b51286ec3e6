//! # Warta
//!
//! Closed-corpus retrieval-augmented QA over scraped Indonesian government
//! news (BKN, Kemenkeu, Kemnaker, …).
//!
//! The pipeline embeds every scraped article once per session, then answers
//! each question by cosine-similarity retrieval over those embeddings and a
//! Gemini generation call grounded strictly in the retrieved articles.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐
//! │ scraped JSON │──▶│  normalize +  │──▶│  IndexedCorpus   │
//! │ (per source) │   │  embed once   │   │  (in memory)    │
//! └──────────────┘   └───────────────┘   └───────┬─────────┘
//!                                                │ per query
//!                              ┌─────────────────┼──────────────┐
//!                              ▼                 ▼              ▼
//!                        ┌──────────┐     ┌───────────┐   ┌──────────┐
//!                        │  search   │──▶ │  prompt    │──▶│ generate │
//!                        │ (cosine)  │    │ (grounded) │   │ (Gemini) │
//!                        └──────────┘     └───────────┘   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`corpus`] | Source loading, normalization, deduplication |
//! | [`embedding`] | Embedding provider trait + Gemini + cosine similarity |
//! | [`index`] | Corpus embedding pass with cache and progress |
//! | [`search`] | Top-k cosine retrieval with relevance floor |
//! | [`prompt`] | Grounded prompt composition |
//! | [`generate`] | Generation provider trait + Gemini + fallback |
//! | [`session`] | Chat session and conversation log orchestration |
//! | [`export`] | CSV projection of the corpus |

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod export;
pub mod generate;
pub mod index;
pub mod models;
pub mod progress;
pub mod prompt;
pub mod search;
pub mod session;
