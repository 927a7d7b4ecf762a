//! Article use-cases.
//!
//! Mutations follow the order authenticate, load, authorize, validate, write.
//! Reads skip authentication failures entirely: a garbled token on a read is
//! treated as an anonymous viewer.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::authorization::{Operation, authorize};
use crate::domain::persistence_errors::{
    map_article_persistence_error, map_user_persistence_error,
};
use crate::domain::ports::{
    ArticleCommand, ArticleQuery, ArticleRepository, CreateArticleRequest, TokenService,
    UpdateArticleRequest, UserRepository,
};
use crate::domain::validation::{self, CREATE_ARTICLE, UPDATE_ARTICLE, ValidationReport};
use crate::domain::{
    Article, ArticleChanges, ArticleDraft, AuthorProfile, AuthoredArticle, Authenticator,
    BearerToken, Error, Slug, UserAccount,
};

const ARTICLE_RESOURCE: &str = "article";

/// Article service implementing the article driving ports.
pub struct ArticleService<A, U, T> {
    articles: Arc<A>,
    users: Arc<U>,
    authenticator: Authenticator<U, T>,
    clock: Arc<dyn Clock>,
}

impl<A, U, T> Clone for ArticleService<A, U, T> {
    fn clone(&self) -> Self {
        Self {
            articles: Arc::clone(&self.articles),
            users: Arc::clone(&self.users),
            authenticator: self.authenticator.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A, U, T> ArticleService<A, U, T> {
    /// Create a new service over the given adapters.
    pub fn new(articles: Arc<A>, users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        let authenticator = Authenticator::new(Arc::clone(&users), tokens);
        Self {
            articles,
            users,
            authenticator,
            clock,
        }
    }
}

fn not_found() -> Error {
    Error::not_found(ARTICLE_RESOURCE, "not found")
}

fn parse_slug(raw: String) -> Result<Slug, Error> {
    Slug::new(raw).map_err(|_| not_found())
}

impl<A, U, T> ArticleService<A, U, T>
where
    A: ArticleRepository,
    U: UserRepository,
    T: TokenService,
{
    async fn load(&self, slug: &Slug) -> Result<Article, Error> {
        self.articles
            .find_by_slug(slug)
            .await
            .map_err(map_article_persistence_error)?
            .ok_or_else(not_found)
    }

    async fn reload(&self, slug: &Slug) -> Result<Article, Error> {
        self.articles
            .find_by_slug(slug)
            .await
            .map_err(map_article_persistence_error)?
            .ok_or_else(|| Error::internal(format!("article {slug} vanished after write")))
    }

    async fn author_of(&self, article: &Article) -> Result<UserAccount, Error> {
        let author_id = article.author_id();
        self.users
            .find_by_id(author_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::internal(format!("author {author_id} of {} is missing", article.slug())))
    }

    /// Load `slug` and check `actor` may apply `operation` to it.
    async fn load_for(
        &self,
        actor: &UserAccount,
        slug: String,
        operation: Operation,
    ) -> Result<Article, Error> {
        let slug = parse_slug(slug)?;
        let article = self.load(&slug).await?;
        debug!(?operation, %slug, "article loaded");
        authorize(Some(actor.id()), Some(article.author_id()), operation).into_result()?;
        debug!(?operation, %slug, "authorized");
        Ok(article)
    }
}

#[async_trait]
impl<A, U, T> ArticleCommand for ArticleService<A, U, T>
where
    A: ArticleRepository,
    U: UserRepository,
    T: TokenService,
{
    async fn create(
        &self,
        token: Option<BearerToken>,
        request: CreateArticleRequest,
    ) -> Result<AuthoredArticle, Error> {
        let actor = self.authenticator.require(token.as_ref()).await?;
        authorize(Some(actor.id()), None, Operation::Create).into_result()?;
        debug!(operation = CREATE_ARTICLE.operation(), user_id = %actor.id(), "authorized");

        validation::validate(&request, &CREATE_ARTICLE).into_result()?;
        let CreateArticleRequest {
            title,
            description,
            body,
            tag_list,
        } = request;
        let draft = ArticleDraft::new(
            title.unwrap_or_default(),
            description.unwrap_or_default(),
            body.unwrap_or_default(),
            tag_list,
        )
        .map_err(|_| {
            let mut report = ValidationReport::default();
            report.record("title");
            Error::from(report)
        })?;
        debug!(operation = CREATE_ARTICLE.operation(), slug = %draft.slug(), "payload validated");

        let article = Article::create(draft, *actor.id(), self.clock.utc());
        self.articles
            .create(&article)
            .await
            .map_err(map_article_persistence_error)?;
        debug!(operation = CREATE_ARTICLE.operation(), slug = %article.slug(), "article committed");

        let article = self.reload(article.slug()).await?;
        Ok(AuthoredArticle {
            article,
            author: AuthorProfile::from(&actor),
        })
    }

    async fn update(
        &self,
        token: Option<BearerToken>,
        slug: String,
        request: UpdateArticleRequest,
    ) -> Result<AuthoredArticle, Error> {
        let actor = self.authenticator.require(token.as_ref()).await?;
        let article = self.load_for(&actor, slug, Operation::Update).await?;

        validation::validate(&request, &UPDATE_ARTICLE).into_result()?;
        debug!(operation = UPDATE_ARTICLE.operation(), "payload validated");

        let changes = ArticleChanges {
            title: request.title,
            description: request.description,
            body: request.body,
            tag_list: request.tag_list,
        };
        let updated = article.apply(&changes, self.clock.utc());
        let written = self
            .articles
            .update(&updated)
            .await
            .map_err(map_article_persistence_error)?;
        if !written {
            return Err(not_found());
        }
        debug!(operation = UPDATE_ARTICLE.operation(), slug = %updated.slug(), "article committed");

        let article = self.reload(updated.slug()).await?;
        Ok(AuthoredArticle {
            article,
            author: AuthorProfile::from(&actor),
        })
    }

    async fn delete(&self, token: Option<BearerToken>, slug: String) -> Result<(), Error> {
        let actor = self.authenticator.require(token.as_ref()).await?;
        let article = self.load_for(&actor, slug, Operation::Delete).await?;

        let removed = self
            .articles
            .delete(article.slug())
            .await
            .map_err(map_article_persistence_error)?;
        if !removed {
            return Err(not_found());
        }
        debug!(operation = "delete_article", slug = %article.slug(), "article removed");
        Ok(())
    }
}

#[async_trait]
impl<A, U, T> ArticleQuery for ArticleService<A, U, T>
where
    A: ArticleRepository,
    U: UserRepository,
    T: TokenService,
{
    async fn get(
        &self,
        viewer: Option<BearerToken>,
        slug: String,
    ) -> Result<AuthoredArticle, Error> {
        let viewer = self.authenticator.optional(viewer.as_ref()).await?;
        let slug = parse_slug(slug)?;
        let article = self.load(&slug).await?;
        authorize(
            viewer.as_ref().map(UserAccount::id),
            Some(article.author_id()),
            Operation::Read,
        )
        .into_result()?;

        let author = self.author_of(&article).await?;
        Ok(AuthoredArticle {
            article,
            author: AuthorProfile::from(&author),
        })
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
