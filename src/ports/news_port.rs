//! News search port trait.

use crate::domain::error::ProviderError;
use crate::domain::news::NewsItem;

pub trait NewsPort {
    /// At most `limit` recent snippets about `symbol`.
    fn search(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, ProviderError>;

    fn name(&self) -> &str;
}
