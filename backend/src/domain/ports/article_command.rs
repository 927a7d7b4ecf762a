//! Driving ports for article use-cases.

use async_trait::async_trait;

use crate::domain::validation::{FieldSource, FieldValue};
use crate::domain::{AuthoredArticle, BearerToken, Error};

/// Payload for creating an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArticleRequest {
    /// Title; the slug is derived from it.
    pub title: Option<String>,
    /// Short summary.
    pub description: Option<String>,
    /// Markdown body.
    pub body: Option<String>,
    /// Tags; absent means none.
    pub tag_list: Option<Vec<String>>,
}

/// Payload for updating an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateArticleRequest {
    /// Replacement title. The slug is not recomputed.
    pub title: Option<String>,
    /// Replacement summary.
    pub description: Option<String>,
    /// Replacement body.
    pub body: Option<String>,
    /// Replacement tags.
    pub tag_list: Option<Vec<String>>,
}

fn article_field<'a>(
    title: Option<&'a str>,
    description: Option<&'a str>,
    body: Option<&'a str>,
    name: &str,
) -> FieldValue<'a> {
    match name {
        "title" => title.into(),
        "description" => description.into(),
        "body" => body.into(),
        _ => FieldValue::Absent,
    }
}

impl FieldSource for CreateArticleRequest {
    fn field(&self, name: &str) -> FieldValue<'_> {
        article_field(
            self.title.as_deref(),
            self.description.as_deref(),
            self.body.as_deref(),
            name,
        )
    }
}

impl FieldSource for UpdateArticleRequest {
    fn field(&self, name: &str) -> FieldValue<'_> {
        article_field(
            self.title.as_deref(),
            self.description.as_deref(),
            self.body.as_deref(),
            name,
        )
    }
}

/// Use-cases that mutate articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Create an article authored by the token's user.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when `token` is absent or invalid.
    /// - `ValidationFailed` when a field rule fails.
    /// - `Conflict` when the derived slug is taken.
    async fn create(
        &self,
        token: Option<BearerToken>,
        request: CreateArticleRequest,
    ) -> Result<AuthoredArticle, Error>;

    /// Update the article at `slug`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when `token` is absent or invalid.
    /// - `NotFound` when `slug` names no article.
    /// - `Forbidden` when the caller is not the author.
    /// - `ValidationFailed` when a supplied field is blank.
    async fn update(
        &self,
        token: Option<BearerToken>,
        slug: String,
        request: UpdateArticleRequest,
    ) -> Result<AuthoredArticle, Error>;

    /// Delete the article at `slug`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when `token` is absent or invalid.
    /// - `NotFound` when `slug` names no article.
    /// - `Forbidden` when the caller is not the author.
    async fn delete(&self, token: Option<BearerToken>, slug: String) -> Result<(), Error>;
}

/// Read access to articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Load the article at `slug`. `viewer` is optional and never required.
    ///
    /// # Errors
    ///
    /// `NotFound` when `slug` names no article.
    async fn get(&self, viewer: Option<BearerToken>, slug: String)
    -> Result<AuthoredArticle, Error>;
}
