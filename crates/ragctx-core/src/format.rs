use crate::types::{Chunk, SearchHit};

/// Separator placed between rendered items.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Anything that can be rendered as a `## title` section of prompt context.
pub trait ContextItem {
    fn title(&self) -> &str;
    fn content(&self) -> &str;
}

impl ContextItem for Chunk {
    fn title(&self) -> &str { &self.title }
    fn content(&self) -> &str { &self.content }
}

impl ContextItem for SearchHit {
    fn title(&self) -> &str { &self.title }
    fn content(&self) -> &str { &self.content }
}

impl<T: ContextItem + ?Sized> ContextItem for &T {
    fn title(&self) -> &str { (**self).title() }
    fn content(&self) -> &str { (**self).content() }
}

/// Render items as `## {title}\n\n{content}` joined by [`CONTEXT_SEPARATOR`],
/// preserving input order.
pub fn format_context<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: ContextItem,
{
    items
        .into_iter()
        .map(|item| format!("## {}\n\n{}", item.title(), item.content()))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
