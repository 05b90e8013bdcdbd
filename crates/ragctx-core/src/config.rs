//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_CACHE__MAX_SIZE=50`). Every
//! section has defaults, so a missing file still yields a usable [`Settings`].
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current directory, selecting the env file via `RUST_ENV`.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(base_dir, &env_name)
    }

    pub fn load_for_env(base_dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment, base_dir: base_dir.to_path_buf() })
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extract and validate all typed sections.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Corpus path with `~`/`${VAR}` expanded and relative paths resolved
    /// against the directory the config was loaded from.
    pub fn corpus_path(&self, settings: &Settings) -> PathBuf {
        resolve_with_base(&self.base_dir, &settings.corpus.path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub cache: CacheSettings,
    pub embedding: EmbeddingSettings,
    pub vector: VectorSettings,
    pub corpus: CorpusSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.cache.max_size >= 1, "cache.max_size must be >= 1"),
            (self.embedding.dimension >= 1, "embedding.dimension must be >= 1"),
            (self.retrieval.default_top_k >= 1, "retrieval.default_top_k must be >= 1"),
            (self.retrieval.broad_top_k >= 1, "retrieval.broad_top_k must be >= 1"),
            (self.retrieval.search_timeout_ms >= 1, "retrieval.search_timeout_ms must be >= 1"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, msg)) => Err(Error::InvalidConfig((*msg).to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Deadline for the vector search call.
    pub search_timeout_ms: u64,
    pub default_top_k: usize,
    /// Top-k used when the query contains a broad marker.
    pub broad_top_k: usize,
    pub broad_markers: Vec<String>,
    /// Chunks returned when every other stage comes back empty.
    pub default_chunk_ids: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            search_timeout_ms: 3000,
            default_top_k: 3,
            broad_top_k: 5,
            broad_markers: ["모든", "전체", "모두", "all", "경력", "프로젝트", "스킬", "기술 스택"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_chunk_ids: ["intro", "skills-frontend", "skills-backend"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_size: usize,
}

impl Default for CacheSettings {
    fn default() -> Self { Self { max_size: 100 } }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    OpenAi,
    Fake,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub dimension: usize,
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::OpenAi,
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    Zilliz,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    pub backend: VectorBackend,
    /// Falls back to `ZILLIZ_ENDPOINT` when unset.
    pub endpoint: Option<String>,
    /// Falls back to `ZILLIZ_API_KEY` when unset.
    pub token: Option<String>,
    pub collection: String,
    pub request_timeout_ms: u64,
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Zilliz,
            endpoint: None,
            token: None,
            collection: "resume_chunks".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self { Self { path: "data/corpus.json".to_string() } }
}

/// `$VAR` and leading `~` expanded; the path is not canonicalised.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_env = shellexpand::env(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));
    PathBuf::from(shellexpand::tilde(&with_env).as_ref())
}

/// Relative corpus paths are taken from the config directory.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
