//! CSV export of the normalized corpus.
//!
//! A pure projection of the article set — `source, title, date, scraped_at,
//! url` — with no retrieval logic. Writes to a file path when given one,
//! otherwise to stdout for piping.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::models::Document;

const HEADER: &str = "source,title,date,scraped_at,url";

/// Export the document set as CSV.
pub fn run_export(documents: &[Document], output: Option<&Path>) -> Result<()> {
    let csv = to_csv(documents);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &csv)?;
            eprintln!("Exported {} articles to {}", documents.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(csv.as_bytes())?;
        }
    }

    Ok(())
}

/// Render the document set as CSV text, header first.
pub fn to_csv(documents: &[Document]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for doc in documents {
        let scraped = doc
            .scraped_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{}\n",
            field(&doc.source),
            field(&doc.title),
            field(doc.published_at.as_deref().unwrap_or("")),
            field(&scraped),
            field(&doc.id),
        ));
    }

    out
}

/// Quote a CSV field when it contains a comma, quote, or newline.
fn field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
