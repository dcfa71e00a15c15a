//! News snippets handed to the sentiment engine.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsItem {
    pub content: String,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl NewsItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            url: None,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}
