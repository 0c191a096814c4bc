use folio_db::DbError;
use folio_scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("store error: {0}")]
    Store(#[from] DbError),

    #[error("fetch error: {0}")]
    Fetch(#[from] ScraperError),
}

impl RefreshError {
    /// The underlying message, without the error-category prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            RefreshError::Store(e) => e.to_string(),
            RefreshError::Fetch(e) => e.to_string(),
        }
    }
}
