//! Tests for the article service.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    ARTICLE_SLUG_CONSTRAINT, ArticlePersistenceError, FixtureTokenService, MockArticleRepository,
    MockUserRepository,
};
use crate::domain::{Email, PasswordHash, UserId, Username};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

type Service = ArticleService<MockArticleRepository, MockUserRepository, FixtureTokenService>;

fn make_service(articles: MockArticleRepository, users: MockUserRepository) -> Service {
    ArticleService::new(
        Arc::new(articles),
        Arc::new(users),
        Arc::new(FixtureTokenService),
        Arc::new(FixtureClock),
    )
}

fn account(id: UserId) -> UserAccount {
    UserAccount::new(
        id,
        Email::new(format!("{id}@example.com")).expect("email"),
        Username::new("caiquecoelho15").expect("username"),
        PasswordHash::new("hash").expect("hash"),
    )
}

/// User store that resolves every id to an account.
fn users_resolving_all() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(*id))));
    users
}

fn token_for(id: &UserId) -> BearerToken {
    FixtureTokenService.issue(id).expect("token")
}

fn stored_article(author: UserId) -> Article {
    let draft = ArticleDraft::new(
        "How to train your dragon",
        "Ever wonder how?",
        "You have to believe",
        Some(vec!["dragons".to_owned()]),
    )
    .expect("draft");
    Article::create(draft, author, FixtureClock.utc())
}

fn create_request() -> CreateArticleRequest {
    CreateArticleRequest {
        title: Some("How to train your dragon".to_owned()),
        description: Some("Ever wonder how?".to_owned()),
        body: Some("You have to believe".to_owned()),
        tag_list: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_commits_with_derived_slug_and_empty_tags() {
    let author = UserId::random();
    let stored: Arc<Mutex<Option<Article>>> = Arc::default();
    let mut articles = MockArticleRepository::new();
    let sink = Arc::clone(&stored);
    articles.expect_create().times(1).returning(move |article| {
        *sink.lock().expect("lock") = Some(article.clone());
        Ok(())
    });
    let source = Arc::clone(&stored);
    articles
        .expect_find_by_slug()
        .returning(move |_| Ok(source.lock().expect("lock").clone()));

    let created = make_service(articles, users_resolving_all())
        .create(Some(token_for(&author)), create_request())
        .await
        .expect("article created");

    assert_eq!(created.article.slug().as_str(), "how-to-train-your-dragon");
    assert!(created.article.tag_list().is_empty());
    assert_eq!(created.article.author_id(), &author);
    assert_eq!(created.article.created_at(), FixtureClock.utc());
    assert_eq!(created.author.username, "caiquecoelho15");
}

#[rstest]
#[tokio::test]
async fn create_requires_authentication() {
    let service = make_service(MockArticleRepository::new(), MockUserRepository::new());
    let err = service
        .create(None, create_request())
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_reports_every_missing_field() {
    let author = UserId::random();
    let err = make_service(MockArticleRepository::new(), users_resolving_all())
        .create(Some(token_for(&author)), CreateArticleRequest::default())
        .await
        .expect_err("empty payload");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let fields: Vec<&str> = err.errors().keys().map(String::as_str).collect();
    assert_eq!(fields, ["body", "description", "title"]);
}

#[rstest]
#[tokio::test]
async fn create_reports_slug_collision() {
    let author = UserId::random();
    let mut articles = MockArticleRepository::new();
    articles
        .expect_create()
        .return_once(|_| Err(ArticlePersistenceError::unique_violation(ARTICLE_SLUG_CONSTRAINT)));

    let err = make_service(articles, users_resolving_all())
        .create(Some(token_for(&author)), create_request())
        .await
        .expect_err("collision");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.message_for("database"),
        Some("UNIQUE constraint failed: article_models.slug")
    );
}

#[rstest]
#[tokio::test]
async fn author_can_delete() {
    let author = UserId::random();
    let mut articles = MockArticleRepository::new();
    articles
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(stored_article(author))));
    articles.expect_delete().times(1).return_once(|_| Ok(true));

    make_service(articles, users_resolving_all())
        .delete(Some(token_for(&author)), "how-to-train-your-dragon".to_owned())
        .await
        .expect("author deletes");
}

#[rstest]
#[tokio::test]
async fn other_user_cannot_delete() {
    let author = UserId::random();
    let intruder = UserId::random();
    let mut articles = MockArticleRepository::new();
    articles
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(stored_article(author))));
    articles.expect_delete().never();

    let err = make_service(articles, users_resolving_all())
        .delete(Some(token_for(&intruder)), "how-to-train-your-dragon".to_owned())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case::unknown("no-such-article")]
#[case::unsluggable("Not A Slug")]
#[tokio::test]
async fn delete_of_missing_article_is_not_found(#[case] slug: &str) {
    let mut articles = MockArticleRepository::new();
    articles.expect_find_by_slug().returning(|_| Ok(None));

    let err = make_service(articles, users_resolving_all())
        .delete(Some(token_for(&UserId::random())), slug.to_owned())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message_for("article"), Some("not found"));
}

#[rstest]
#[tokio::test]
async fn read_ignores_garbled_token() {
    let author = UserId::random();
    let mut articles = MockArticleRepository::new();
    articles
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(stored_article(author))));

    let garbled = BearerToken::new("Ababuble").expect("token");
    let fetched = make_service(articles, users_resolving_all())
        .get(Some(garbled), "how-to-train-your-dragon".to_owned())
        .await
        .expect("readable");
    assert_eq!(fetched.article.author_id(), &author);
}

#[rstest]
#[tokio::test]
async fn update_keeps_slug_and_bumps_timestamp() {
    let author = UserId::random();
    let stored: Arc<Mutex<Option<Article>>> =
        Arc::new(Mutex::new(Some(stored_article(author))));
    let mut articles = MockArticleRepository::new();
    let source = Arc::clone(&stored);
    articles
        .expect_find_by_slug()
        .returning(move |_| Ok(source.lock().expect("lock").clone()));
    let sink = Arc::clone(&stored);
    articles.expect_update().times(1).returning(move |article| {
        *sink.lock().expect("lock") = Some(article.clone());
        Ok(true)
    });

    let updated = make_service(articles, users_resolving_all())
        .update(
            Some(token_for(&author)),
            "how-to-train-your-dragon".to_owned(),
            UpdateArticleRequest {
                title: Some("Did you train your dragon?".to_owned()),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .expect("author updates");

    assert_eq!(updated.article.slug().as_str(), "how-to-train-your-dragon");
    assert_eq!(updated.article.title(), "Did you train your dragon?");
    assert_eq!(updated.article.body(), "You have to believe");
}

#[rstest]
#[tokio::test]
async fn update_rejects_blank_body() {
    let author = UserId::random();
    let mut articles = MockArticleRepository::new();
    articles
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(stored_article(author))));
    articles.expect_update().never();

    let err = make_service(articles, users_resolving_all())
        .update(
            Some(token_for(&author)),
            "how-to-train-your-dragon".to_owned(),
            UpdateArticleRequest {
                body: Some("  ".to_owned()),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .expect_err("blank body");
    assert_eq!(err.message_for("body"), Some("{key: body}"));
}
