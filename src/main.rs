//! # Warta CLI
//!
//! The `warta` binary answers questions about a closed corpus of scraped
//! Indonesian government news. All commands accept a `--config` flag pointing
//! to a TOML configuration file listing the scraped JSON sources.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `warta sources` | List configured sources and whether their files load |
//! | `warta index` | Normalize and embed the corpus, report counts |
//! | `warta ask "<question>"` | One-shot question against the corpus |
//! | `warta chat` | Interactive session (one conversation log) |
//! | `warta export` | CSV projection of the corpus |
//!
//! ## Examples
//!
//! ```bash
//! warta sources --config ./warta.toml
//! warta index --dry-run
//! warta ask "anggaran pendidikan 2024"
//! warta export --output berita.csv
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use warta::config::{self, Config};
use warta::corpus;
use warta::embedding::GeminiEmbedder;
use warta::export;
use warta::generate::GeminiGenerator;
use warta::index;
use warta::progress::ProgressMode;
use warta::session::{AskOutcome, ChatSession};

/// Warta — closed-corpus QA over scraped government news.
#[derive(Parser)]
#[command(
    name = "warta",
    about = "Answer questions about scraped Indonesian government news, grounded in the scraped articles only",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./warta.toml")]
    config: PathBuf,

    /// Progress output: auto (TTY), off, human, or json.
    #[arg(long, global = true, default_value = "auto")]
    progress: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources and how many articles each contributes.
    Sources,

    /// Load, normalize, and embed the corpus; report counts.
    Index {
        /// Show article counts without calling the embedding provider.
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask one question and print the grounded answer with its sources.
    Ask {
        /// The question, in natural language.
        question: String,
    },

    /// Interactive chat over one session.
    Chat,

    /// Export the corpus as CSV (source, title, date, scraped_at, url).
    Export {
        /// Output file path; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn progress_mode(arg: &str) -> Result<ProgressMode> {
    match arg {
        "auto" => Ok(ProgressMode::default_for_tty()),
        "off" => Ok(ProgressMode::Off),
        "human" => Ok(ProgressMode::Human),
        "json" => Ok(ProgressMode::Json),
        other => anyhow::bail!("Unknown progress mode: {}. Use auto, off, human, or json.", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let progress = progress_mode(&cli.progress)?;

    match cli.command {
        Commands::Sources => run_sources(&cfg)?,
        Commands::Index { dry_run } => run_index(&cfg, progress, dry_run).await?,
        Commands::Ask { question } => run_ask(&cfg, progress, &question).await?,
        Commands::Chat => run_chat(&cfg, progress).await?,
        Commands::Export { output } => {
            let (documents, _) = corpus::load_corpus(&cfg.sources)?;
            export::run_export(&documents, output.as_deref())?;
        }
    }

    Ok(())
}

fn run_sources(cfg: &Config) -> Result<()> {
    let (documents, reports) = corpus::load_corpus(&cfg.sources)?;

    println!("{:<20} {:<12} ARTIKEL", "SUMBER", "STATUS");
    for report in &reports {
        let status = if report.ok { "OK" } else { "UNREADABLE" };
        println!("{:<20} {:<12} {}", report.name, status, report.loaded);
    }
    println!("total: {} artikel", documents.len());

    Ok(())
}

async fn run_index(cfg: &Config, progress: ProgressMode, dry_run: bool) -> Result<()> {
    let (documents, reports) = corpus::load_corpus(&cfg.sources)?;
    let empty_content = documents.iter().filter(|d| d.content.is_empty()).count();

    if dry_run {
        println!("index (dry-run)");
        println!("  sources loaded: {}", reports.iter().filter(|r| r.ok).count());
        println!("  articles: {}", documents.len());
        println!("  empty content (will be skipped): {}", empty_content);
        return Ok(());
    }

    let embedder = GeminiEmbedder::new(&cfg.embedding)?;
    let reporter = progress.reporter();
    let outcome = index::build_index(&documents, &embedder, reporter.as_ref()).await;

    println!("index");
    println!("  articles: {}", documents.len());
    println!("  embedded: {}", outcome.corpus.len());
    println!("  skipped (empty content): {}", outcome.skipped_empty);
    println!("  failed: {}", outcome.failed);
    println!("ok");

    Ok(())
}

/// Load, embed, and wrap everything into a ready session.
async fn build_session(cfg: &Config, progress: ProgressMode) -> Result<ChatSession> {
    let (documents, _) = corpus::load_corpus(&cfg.sources)?;

    let embedder = Arc::new(GeminiEmbedder::new(&cfg.embedding)?);
    let generator = Arc::new(GeminiGenerator::new(&cfg.generation)?);

    let reporter = progress.reporter();
    let mut cache = index::EmbedCache::new();
    let corpus =
        index::build_index_cached(&mut cache, &documents, embedder.as_ref(), reporter.as_ref())
            .await;

    Ok(ChatSession::new(
        corpus,
        embedder,
        generator,
        cfg.retrieval.clone(),
    ))
}

fn print_outcome(outcome: &AskOutcome) {
    println!("{}", outcome.answer);

    if !outcome.hits.is_empty() {
        println!();
        println!("Sumber:");
        for (i, hit) in outcome.hits.iter().enumerate() {
            println!(
                "{}. [{:.2}] {} / {}",
                i + 1,
                hit.similarity,
                hit.document.source,
                hit.document.title
            );
            println!("    {}", hit.document.content_preview());
            println!("    url: {}", hit.document.id);
        }
    }
}

async fn run_ask(cfg: &Config, progress: ProgressMode, question: &str) -> Result<()> {
    let mut session = build_session(cfg, progress).await?;
    let outcome = session.ask(question).await;
    print_outcome(&outcome);
    Ok(())
}

async fn run_chat(cfg: &Config, progress: ProgressMode) -> Result<()> {
    let mut session = build_session(cfg, progress).await?;
    println!(
        "Arsip siap: {} artikel terindeks. Ketik pertanyaan, atau 'keluar' untuk berhenti.",
        session.corpus_size()
    );

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("keluar") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        let outcome = session.ask(question).await;
        print_outcome(&outcome);
        println!();
    }

    Ok(())
}
