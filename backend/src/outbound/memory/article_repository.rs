//! In-process article store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ARTICLE_SLUG_CONSTRAINT, ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, Slug};

/// `ArticleRepository` kept in memory for development and tests.
#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: Mutex<HashMap<Slug, Article>>,
}

impl InMemoryArticleRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Slug, Article>>, ArticlePersistenceError> {
        self.articles
            .lock()
            .map_err(|_| ArticlePersistenceError::query("article store lock poisoned"))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn create(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        match self.lock()?.entry(article.slug().clone()) {
            Entry::Occupied(_) => Err(ArticlePersistenceError::unique_violation(
                ARTICLE_SLUG_CONSTRAINT,
            )),
            Entry::Vacant(slot) => {
                slot.insert(article.clone());
                Ok(())
            }
        }
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(self.lock()?.get(slug).cloned())
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut articles = self.lock()?;
        match articles.get_mut(article.slug()) {
            Some(stored) => {
                *stored = article.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, slug: &Slug) -> Result<bool, ArticlePersistenceError> {
        Ok(self.lock()?.remove(slug).is_some())
    }
}
