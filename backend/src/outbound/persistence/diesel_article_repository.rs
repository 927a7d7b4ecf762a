//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! The slug is the primary key, so a slug collision surfaces as a unique
//! violation on insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ARTICLE_SLUG_CONSTRAINT, ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, Slug, UserId};

use super::diesel_error_mapping::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{ArticleRow, ArticleUpdate, NewArticleRow};
use super::pool::DbPool;
use super::schema::article_models;

const KINDS: ErrorKinds<ArticlePersistenceError> = ErrorKinds {
    connection: |message| ArticlePersistenceError::connection(message),
    query: |message| ArticlePersistenceError::query(message),
    unique_violation: || ArticlePersistenceError::unique_violation(ARTICLE_SLUG_CONSTRAINT),
};

/// Diesel-backed article store.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let slug = Slug::new(row.slug)
        .map_err(|err| ArticlePersistenceError::query(format!("stored slug is invalid: {err}")))?;
    Ok(Article::from_parts(
        slug,
        row.title,
        row.description,
        row.body,
        row.tag_list,
        UserId::from_uuid(row.author_id),
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn create(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let row = NewArticleRow {
            slug: article.slug().as_str(),
            title: article.title(),
            description: article.description(),
            body: article.body(),
            tag_list: article.tag_list(),
            author_id: *article.author_id().as_uuid(),
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        };
        diesel::insert_into(article_models::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &KINDS))
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let row = article_models::table
            .find(slug.as_str())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        row.map(row_to_article).transpose()
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let update = ArticleUpdate {
            title: article.title(),
            description: article.description(),
            body: article.body(),
            tag_list: article.tag_list(),
            updated_at: article.updated_at(),
        };
        let affected = diesel::update(article_models::table.find(article.slug().as_str()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        Ok(affected > 0)
    }

    async fn delete(&self, slug: &Slug) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let affected = diesel::delete(article_models::table.find(slug.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        Ok(affected > 0)
    }
}
