//! Port abstraction for article persistence.

use async_trait::async_trait;

use crate::domain::{Article, Slug};

use super::define_port_error;

/// Constraint reported when a slug is already taken.
pub const ARTICLE_SLUG_CONSTRAINT: &str = "article_models.slug";

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        UniqueViolation { constraint: String } => "UNIQUE constraint failed: {constraint}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article, rejecting a duplicate slug.
    async fn create(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Fetch an article by slug.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Overwrite the mutable fields of the article stored under its slug.
    ///
    /// Returns `false` when the slug no longer exists.
    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError>;

    /// Remove the article stored under `slug`.
    ///
    /// Returns `false` when nothing was removed.
    async fn delete(&self, slug: &Slug) -> Result<bool, ArticlePersistenceError>;
}
