use ragctx_core::config::RetrievalSettings;

/// Chooses how many results to request for a query.
#[derive(Debug, Clone)]
pub struct TopKPolicy {
    default_top_k: usize,
    broad_top_k: usize,
    broad_markers: Vec<String>,
}

impl TopKPolicy {
    pub fn new(default_top_k: usize, broad_top_k: usize, broad_markers: Vec<String>) -> Self {
        Self { default_top_k, broad_top_k, broad_markers }
    }

    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self::new(settings.default_top_k, settings.broad_top_k, settings.broad_markers.clone())
    }

    /// `broad_top_k` when the raw query contains any broad marker
    /// (case-sensitive substring), `default_top_k` otherwise.
    pub fn determine(&self, query: &str) -> usize {
        if self.broad_markers.iter().any(|m| !m.is_empty() && query.contains(m.as_str())) {
            self.broad_top_k
        } else {
            self.default_top_k
        }
    }
}

impl Default for TopKPolicy {
    fn default() -> Self { Self::from_settings(&RetrievalSettings::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broad_markers_raise_top_k() {
        let policy = TopKPolicy::default();
        assert_eq!(policy.determine("모든 프로젝트 알려줘"), 5);
        assert_eq!(policy.determine("tell me all of it"), 5);
        assert_eq!(policy.determine("기술 스택이 뭐예요"), 5);
        assert_eq!(policy.determine("websocket 경험"), 3);
        assert_eq!(policy.determine(""), 3);
    }

    #[test]
    fn markers_are_plain_substrings() {
        let policy = TopKPolicy::new(2, 7, vec!["all".into(), "".into()]);
        assert_eq!(policy.determine("a small question"), 7, "substring inside a word still matches");
        assert_eq!(policy.determine("ALL"), 2, "matching is case-sensitive");
        assert_eq!(policy.determine("nothing"), 2, "empty markers never match");
    }
}
