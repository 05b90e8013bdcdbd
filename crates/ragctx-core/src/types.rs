//! Domain types shared by the keyword scorer, the vector backends and the
//! retrieval orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type ChunkId = String;

/// Coarse category of a chunk. Carried through to vector hits but not used
/// for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Project,
    Skills,
    Core,
    Motivation,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Intro => "intro",
            Section::Project => "project",
            Section::Skills => "skills",
            Section::Core => "core",
            Section::Motivation => "motivation",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// An immutable unit of corpus content.
///
/// - `id`: unique across the corpus
/// - `title`: short label, rendered as the context heading
/// - `content`: body text injected into the prompt
/// - `section`: coarse category
/// - `keywords`: ordered terms used only by the keyword scorer
/// - `related_chunks`: ids of related chunks (informational)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: ChunkId,
    pub title: String,
    pub content: String,
    pub section: Section,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_chunks: Vec<ChunkId>,
}

/// A ranked hit returned by a vector search backend. Mirrors `Chunk`
/// without the scoring metadata; `score` is similarity, higher is better.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: ChunkId,
    pub title: String,
    pub content: String,
    pub section: String,
    pub score: f32,
}
