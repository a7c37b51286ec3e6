//! Corpus loading and normalization.
//!
//! Each configured source is a scraper output file: a JSON object mapping
//! article URL to `{title, date, content, scraped_at}`. Sources are merged in
//! configuration order into one canonical sequence of [`Document`]s.
//!
//! A missing or unreadable source file degrades to zero articles for that
//! source (logged, non-fatal). Loading fails only when nothing loads at all.

use chrono::DateTime;
use std::collections::HashSet;
use tracing::warn;

use crate::config::SourceConfig;
use crate::error::WartaError;
use crate::models::{Document, RawArticle};

/// Per-source load outcome, for `warta sources` and index reporting.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub name: String,
    /// Articles contributed after deduplication.
    pub loaded: usize,
    /// Whether the file was read and parsed at all.
    pub ok: bool,
}

/// Load and merge all sources into one normalized, deduplicated sequence.
///
/// Duplicate URLs keep the first occurrence in source order. `title` and
/// `content` are never absent in the output; missing fields become empty
/// strings.
pub fn load_corpus(sources: &[SourceConfig]) -> Result<(Vec<Document>, Vec<SourceReport>), WartaError> {
    let mut documents = Vec::new();
    let mut reports = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for source in sources {
        let before = documents.len();
        match load_source(source) {
            Ok(articles) => {
                for (url, raw) in articles {
                    if !seen_urls.insert(url.clone()) {
                        continue;
                    }
                    documents.push(normalize(url, &source.name, raw));
                }
                reports.push(SourceReport {
                    name: source.name.clone(),
                    loaded: documents.len() - before,
                    ok: true,
                });
            }
            Err(e) => {
                warn!(source = %source.name, path = %source.path.display(), error = %e, "skipping unreadable source");
                reports.push(SourceReport {
                    name: source.name.clone(),
                    loaded: 0,
                    ok: false,
                });
            }
        }
    }

    if documents.is_empty() {
        return Err(WartaError::EmptyCorpus);
    }

    Ok((documents, reports))
}

fn load_source(source: &SourceConfig) -> anyhow::Result<Vec<(String, RawArticle)>> {
    let content = std::fs::read_to_string(&source.path)?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)?;

    let mut articles = Vec::with_capacity(map.len());
    for (url, value) in map {
        // One malformed record should not sink the whole file.
        match serde_json::from_value::<RawArticle>(value) {
            Ok(raw) => articles.push((url, raw)),
            Err(e) => warn!(source = %source.name, url = %url, error = %e, "skipping malformed article"),
        }
    }

    Ok(articles)
}

fn normalize(url: String, source: &str, raw: RawArticle) -> Document {
    Document {
        id: url,
        source: source.to_string(),
        title: raw.title.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        published_at: raw.date,
        scraped_at: raw
            .scraped_at
            .and_then(|ts| DateTime::from_timestamp(ts as i64, 0)),
    }
}
