//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{article_models, user_models};

/// Row read from `user_models`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_models)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    pub password_hash: String,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_models)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub bio: &'a str,
    pub image: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Partial profile update; `None` fields are left untouched.
///
/// `image: Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_models)]
pub(crate) struct ProfileUpdate<'a> {
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub image: Option<Option<&'a str>>,
}

/// Row read from `article_models`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = article_models)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable article.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = article_models)]
pub(crate) struct NewArticleRow<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub body: &'a str,
    pub tag_list: &'a [String],
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full overwrite of an article's mutable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = article_models)]
pub(crate) struct ArticleUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub body: &'a str,
    pub tag_list: &'a [String],
    pub updated_at: DateTime<Utc>,
}
