use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ragctx_core::config::{Config, Settings, VectorBackend};
use ragctx_core::Corpus;
use ragctx_embed::{get_default_embedder, EmbeddingCache};
use ragctx_hybrid::Retriever;
use ragctx_text::keyword_search;
use ragctx_vector::{open_store, search_handle, seed_corpus, VectorStore};

#[derive(Parser)]
#[command(name = "ragctx", version, about = "Retrieve prompt context from a fixed chunk corpus")]
struct Cli {
    /// Directory holding config.toml / config.<env>.toml
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the context retrieved for a query
    Query { text: String },
    /// Run the keyword scorer only
    Keyword {
        text: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Embed the corpus and insert it into the vector collection
    Seed {
        #[arg(long)]
        reset: bool,
    },
    /// Show collection and cache statistics
    Stats,
}

struct App {
    settings: Settings,
    corpus: Arc<Corpus>,
    cache: Arc<EmbeddingCache>,
    store: Arc<dyn VectorStore>,
}

impl App {
    fn build(config_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load_from(config_dir).context("loading config")?;
        let settings = config.settings().context("reading settings")?;
        let corpus_path = config.corpus_path(&settings);
        let corpus = Corpus::load(&corpus_path).with_context(|| format!("loading corpus from {}", corpus_path.display()))?;
        info!(chunks = corpus.len(), path = %corpus_path.display(), "corpus loaded");
        let embedder = get_default_embedder(&settings.embedding)?;
        let cache = Arc::new(EmbeddingCache::new(embedder, settings.cache.max_size));
        let store = open_store(&settings.vector, settings.embedding.dimension)?;
        Ok(Self { settings, corpus: Arc::new(corpus), cache, store })
    }

    fn is_memory(&self) -> bool { self.settings.vector.backend == VectorBackend::Memory }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::build(&cli.config_dir)?;

    match cli.command {
        Command::Query { text } => {
            if app.is_memory() {
                seed_corpus(app.store.as_ref(), &app.cache, &app.corpus, false).await?;
            }
            let search = search_handle(app.store.clone());
            let retriever = Retriever::new(app.corpus.clone(), app.cache.clone(), search, &app.settings.retrieval);
            let out = retriever.retrieve(&text).await;
            info!(path = out.path.as_str(), top_k = out.top_k, "retrieval finished");
            println!("{}", out.text);
        }
        Command::Keyword { text, top_k } => {
            let k = top_k.unwrap_or(app.settings.retrieval.default_top_k);
            let results = keyword_search(&app.corpus, &text, k);
            if results.is_empty() { println!("No keyword matches for '{}'", text); }
            for s in results { println!("{:>4}  {:<24}  {}", s.score, s.chunk.id, s.chunk.title); }
        }
        Command::Seed { reset } => {
            if app.is_memory() { println!("Note: memory backend does not persist; seeding is a dry run"); }
            let rows = seed_corpus(app.store.as_ref(), &app.cache, &app.corpus, reset).await?;
            println!("Seeding complete! Total rows: {}", rows);
        }
        Command::Stats => {
            match app.store.row_count().await {
                Ok(rows) => println!("collection={} rows={}", app.settings.vector.collection, rows),
                Err(e) => println!("collection={} unavailable: {}", app.settings.vector.collection, e),
            }
            let cache = app.cache.stats();
            println!("corpus chunks={}", app.corpus.len());
            println!("embedding cache size={} max_size={}", cache.size, cache.max_size);
        }
    }
    Ok(())
}
