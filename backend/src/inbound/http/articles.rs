//! Articles API handlers.
//!
//! ```text
//! POST   /api/articles         {"article":{"title","description","body","tagList"?}}
//! GET    /api/articles/{slug}
//! PUT    /api/articles/{slug}  {"article":{"title"?,"description"?,"body"?,"tagList"?}}
//! DELETE /api/articles/{slug}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ErrorEnvelope;
use crate::domain::ports::{CreateArticleRequest, UpdateArticleRequest};
use crate::domain::{AuthorProfile, AuthoredArticle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Credential;
use crate::inbound::http::state::HttpState;

/// Body of a successful delete.
pub const DELETE_SUCCESS: &str = "Delete success";

/// Article fields supplied on create or update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

/// `{"article": {...}}` request envelope.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ArticleBody {
    pub article: ArticleFields,
}

impl From<ArticleFields> for CreateArticleRequest {
    fn from(value: ArticleFields) -> Self {
        Self {
            title: value.title,
            description: value.description,
            body: value.body,
            tag_list: value.tag_list,
        }
    }
}

impl From<ArticleFields> for UpdateArticleRequest {
    fn from(value: ArticleFields) -> Self {
        Self {
            title: value.title,
            description: value.description,
            body: value.body,
            tag_list: value.tag_list,
        }
    }
}

/// Author block embedded in article responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    /// Follow relationships are not tracked; always `false`.
    pub following: bool,
}

impl From<AuthorProfile> for ProfileDto {
    fn from(value: AuthorProfile) -> Self {
        Self {
            username: value.username,
            bio: value.bio,
            image: value.image,
            following: false,
        }
    }
}

/// Article representation returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    #[schema(example = "how-to-train-your-dragon")]
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    #[schema(example = "2026-05-04T09:30:00.000Z")]
    pub created_at: String,
    pub updated_at: String,
    pub favorited: bool,
    pub favorites_count: u32,
    pub author: ProfileDto,
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<AuthoredArticle> for ArticleDto {
    fn from(value: AuthoredArticle) -> Self {
        let AuthoredArticle { article, author } = value;
        Self {
            slug: article.slug().as_str().to_owned(),
            title: article.title().to_owned(),
            description: article.description().to_owned(),
            body: article.body().to_owned(),
            tag_list: article.tag_list().to_vec(),
            created_at: timestamp(article.created_at()),
            updated_at: timestamp(article.updated_at()),
            favorited: false,
            favorites_count: 0,
            author: author.into(),
        }
    }
}

/// `{"article": {...}}` response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub article: ArticleDto,
}

impl From<AuthoredArticle> for ArticleResponse {
    fn from(value: AuthoredArticle) -> Self {
        Self {
            article: value.into(),
        }
    }
}

/// `{"article": "Delete success"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Delete success")]
    pub article: String,
}

/// Publish an article as the caller.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = ArticleBody,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 422, description = "Validation failure or slug taken", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    credential: Credential,
    payload: web::Json<ArticleBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateArticleRequest::from(payload.into_inner().article);
    let article = state
        .articles
        .create(credential.into_token(), request)
        .await?;
    Ok(HttpResponse::Created().json(ArticleResponse::from(article)))
}

/// Read an article. A credential is optional and never required.
#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 404, description = "No such article", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{slug}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let article = state
        .articles_query
        .get(credential.into_token(), path.into_inner())
        .await?;
    Ok(web::Json(article.into()))
}

/// Edit an article. Only its author may do so.
#[utoipa::path(
    put,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    request_body = ArticleBody,
    responses(
        (status = 200, description = "Updated article", body = ArticleResponse),
        (status = 401, description = "Missing token or not the author", body = ErrorEnvelope),
        (status = 404, description = "No such article", body = ErrorEnvelope),
        (status = 422, description = "Validation failure", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[put("/articles/{slug}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
    payload: web::Json<ArticleBody>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let request = UpdateArticleRequest::from(payload.into_inner().article);
    let article = state
        .articles
        .update(credential.into_token(), path.into_inner(), request)
        .await?;
    Ok(web::Json(article.into()))
}

/// Remove an article. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 401, description = "Missing token or not the author", body = ErrorEnvelope),
        (status = 404, description = "No such article", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{slug}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    state
        .articles
        .delete(credential.into_token(), path.into_inner())
        .await?;
    Ok(web::Json(DeleteResponse {
        article: DELETE_SUCCESS.to_owned(),
    }))
}
