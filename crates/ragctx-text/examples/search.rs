use std::path::Path;

use ragctx_core::config::Config;
use ragctx_core::Corpus;
use ragctx_text::keyword_search;

fn main() -> anyhow::Result<()> {
    let query = std::env::args().nth(1).unwrap_or_else(|| "websocket heartbeat".to_string());
    let ws_root = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap_or(Path::new("."));
    let config = Config::load_from(ws_root)?;
    let settings = config.settings()?;
    let corpus = Corpus::load(&config.corpus_path(&settings))?;
    for s in keyword_search(&corpus, &query, settings.retrieval.default_top_k) { println!("{:>4}  {}", s.score, s.chunk.title); }
    Ok(())
}
