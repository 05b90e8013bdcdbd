use std::path::Path;

use ragctx_core::config::Config;
use ragctx_vector::open_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ws_root = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap_or(Path::new("."));
    let config = Config::load_from(ws_root)?;
    let settings = config.settings()?;
    let store = open_store(&settings.vector, settings.embedding.dimension)?;
    match store.row_count().await {
        Ok(rows) => println!("collection={} rows={}", settings.vector.collection, rows),
        Err(e) => println!("collection={} unavailable: {}", settings.vector.collection, e),
    }
    Ok(())
}
