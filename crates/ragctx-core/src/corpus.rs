//! Fixed, read-only chunk corpus.
//!
//! A corpus is loaded once at startup from a JSON file (an array of chunks)
//! or from a directory of such files, validated, and never mutated again.
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::CONTEXT_SEPARATOR;
use crate::types::Chunk;

#[derive(Debug, Clone)]
pub struct Corpus {
    chunks: Vec<Chunk>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Validate and freeze a list of chunks. Order is preserved and is the
    /// tie-break order for keyword scoring.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self> {
        if chunks.is_empty() { return Err(Error::InvalidCorpus("corpus has no chunks".into())); }
        let mut by_id = HashMap::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            validate_chunk(chunk)?;
            if by_id.insert(chunk.id.clone(), idx).is_some() {
                return Err(Error::InvalidCorpus(format!("duplicate chunk id '{}'", chunk.id)));
            }
        }
        Ok(Self { chunks, by_id })
    }

    /// Load from a `.json` file or a directory of `.json` files. Directory
    /// entries are read in sorted path order.
    pub fn load(path: &Path) -> Result<Self> {
        let files = if path.is_dir() { list_json_files(path) } else { vec![path.to_path_buf()] };
        if files.is_empty() {
            return Err(Error::InvalidCorpus(format!("no .json files found under {}", path.display())));
        }
        let mut chunks = Vec::new();
        for file in &files {
            let raw = fs::read_to_string(file)?;
            let parsed: Vec<Chunk> = serde_json::from_str(&raw)
                .map_err(|e| Error::InvalidCorpus(format!("{}: {}", file.display(), e)))?;
            chunks.extend(parsed);
        }
        Self::from_chunks(chunks)
    }

    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    pub fn get(&self, id: &str) -> Option<&Chunk> { self.by_id.get(id).map(|&i| &self.chunks[i]) }

    /// Resolve a chunk's `related_chunks` ids; unknown ids are skipped.
    pub fn related(&self, id: &str) -> Vec<&Chunk> {
        self.get(id)
            .map(|c| c.related_chunks.iter().filter_map(|r| self.get(r)).collect())
            .unwrap_or_default()
    }

    /// Corpus-ordered subset whose ids appear in `ids`. Falls back to the
    /// whole corpus when none of the ids resolve, so the result is never empty.
    pub fn default_chunks(&self, ids: &[String]) -> Vec<&Chunk> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let subset: Vec<&Chunk> = self.chunks.iter().filter(|c| wanted.contains(c.id.as_str())).collect();
        if subset.is_empty() { self.chunks.iter().collect() } else { subset }
    }

    /// Every chunk's content joined by the context separator.
    pub fn full_context(&self) -> String {
        self.chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
    }
}

fn validate_chunk(chunk: &Chunk) -> Result<()> {
    if chunk.id.trim().is_empty() { return Err(Error::InvalidCorpus("chunk with blank id".into())); }
    // A blank title or keyword is a substring of every query.
    if chunk.title.trim().is_empty() {
        return Err(Error::InvalidCorpus(format!("chunk '{}' has a blank title", chunk.id)));
    }
    if chunk.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(Error::InvalidCorpus(format!("chunk '{}' has a blank keyword", chunk.id)));
    }
    Ok(())
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut json_files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("json") { json_files.push(path.to_path_buf()); }
    }
    json_files.sort(); json_files
}
