use ragctx_core::{Chunk, Corpus};

const TITLE_WEIGHT: u32 = 10;
const KEYWORD_IN_QUERY_WEIGHT: u32 = 5;
const KEYWORD_TOKEN_WEIGHT: u32 = 2;
const CONTENT_TOKEN_WEIGHT: u32 = 1;
// Measured in UTF-16 code units.
const MIN_CONTENT_TOKEN_UNITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: u32,
}

/// Additive lexical score of `chunk` against `query`:
/// - +10 when the query contains the title
/// - per keyword: +5 when the query contains it, +2 per query token where
///   either the keyword contains the token or the token contains the keyword
/// - +1 per query token of at least two characters found in the content
///
/// All comparisons are case-insensitive. A blank query scores 0.
pub fn score_chunk(chunk: &Chunk, query: &str) -> u32 {
    let query_lower = query.to_lowercase();
    if query_lower.trim().is_empty() { return 0; }
    let tokens: Vec<&str> = query_lower.split_whitespace().collect();
    score_lowered(chunk, &query_lower, &tokens)
}

fn score_lowered(chunk: &Chunk, query_lower: &str, tokens: &[&str]) -> u32 {
    let mut score = 0;
    if query_lower.contains(&chunk.title.to_lowercase()) { score += TITLE_WEIGHT; }

    for keyword in &chunk.keywords {
        let keyword_lower = keyword.to_lowercase();
        if query_lower.contains(&keyword_lower) { score += KEYWORD_IN_QUERY_WEIGHT; }
        // No length floor here: a one-character token matches any keyword containing it.
        for token in tokens {
            if keyword_lower.contains(token) || token.contains(&keyword_lower) { score += KEYWORD_TOKEN_WEIGHT; }
        }
    }

    let content_lower = chunk.content.to_lowercase();
    for token in tokens {
        if token.encode_utf16().count() >= MIN_CONTENT_TOKEN_UNITS && content_lower.contains(token) { score += CONTENT_TOKEN_WEIGHT; }
    }
    score
}

/// Top `top_k` chunks by descending score. Zero-score chunks are dropped and
/// ties keep corpus order.
pub fn keyword_search<'a>(corpus: &'a Corpus, query: &str, top_k: usize) -> Vec<ScoredChunk<'a>> {
    let query_lower = query.to_lowercase();
    if query_lower.trim().is_empty() { return Vec::new(); }
    let tokens: Vec<&str> = query_lower.split_whitespace().collect();

    let mut scored: Vec<ScoredChunk<'a>> = corpus
        .chunks()
        .iter()
        .map(|chunk| ScoredChunk { chunk, score: score_lowered(chunk, &query_lower, &tokens) })
        .filter(|s| s.score > 0)
        .collect();
    // `sort_by` is stable, which gives the corpus-order tie-break.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    scored
}
