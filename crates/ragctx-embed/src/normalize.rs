//! Query canonicalisation and cache-key derivation.

const STRIPPED_PUNCTUATION: [char; 5] = ['?', '!', '。', '？', '！'];

/// Canonical form of a query for cache addressing: lower-cased, trimmed,
/// sentence-terminal punctuation removed, whitespace runs collapsed to a
/// single space. Trimmed once more at the end so that punctuation sitting
/// next to the edges cannot leave a dangling space behind.
pub fn normalize_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let stripped: String = lowered.trim().chars().filter(|c| !STRIPPED_PUNCTUATION.contains(c)).collect();
    let mut out = String::with_capacity(stripped.len());
    let mut in_space = false;
    for c in stripped.chars() {
        if c.is_whitespace() {
            if !in_space { out.push(' '); }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.trim().to_string()
}

/// 31-multiplier rolling hash over UTF-16 code units with 32-bit signed
/// wrap-around, rendered in base 36 (a leading `-` for negative values).
pub fn hash_key(canonical: &str) -> String {
    let hash = canonical
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    to_base36(hash)
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 { return "0".to_string(); }
    let mut n = i64::from(value).unsigned_abs();
    let mut buf = Vec::new();
    while n > 0 { buf.push(DIGITS[(n % 36) as usize]); n /= 36; }
    if value < 0 { buf.push(b'-'); }
    buf.iter().rev().map(|&b| b as char).collect()
}
