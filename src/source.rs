use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Category, Movie, Page};

/// Remote paginated movie listing.
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Public web page for a movie, for opening in a browser.
    fn web_url(&self, movie: &Movie) -> String;

    /// Base URL that poster paths are appended to.
    fn image_base_url(&self) -> &str;

    async fn fetch_page(&self, category: Category, page: u32) -> Result<Page<Movie>>;
}
