//! End-to-end behaviour of the REST API over in-memory stores.
//!
//! Each test builds a fresh app, so accounts and articles never leak between
//! tests.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use argon2::Params;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use conduit::inbound::http::health::HealthState;
use conduit::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use conduit::outbound::security::{Argon2PasswordHasher, JwtTokenService, TokenSecret};
use conduit::server::{Adapters, AppDependencies, build_app, http_state_from};

fn dependencies() -> AppDependencies {
    let params = Params::new(8, 1, 1, None).expect("cheap argon2 params");
    let state = http_state_from(Adapters {
        users: Arc::new(InMemoryUserRepository::new()),
        articles: Arc::new(InMemoryArticleRepository::new()),
        tokens: Arc::new(JwtTokenService::new(&TokenSecret::from_bytes(vec![7; 32]))),
        hasher: Arc::new(Argon2PasswordHasher::with_params(params)),
        clock: Arc::new(DefaultClock),
    });
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(state),
    }
}

async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    assert!(
        response.headers().contains_key("trace-id"),
        "every response carries a trace id"
    );
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

fn with_token(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header(("Authorization", format!("Token {token}")))
}

fn register_request(email: &str, username: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/api/users").set_json(json!({
        "user": {"email": email, "username": username, "password": "caiquecoelho"}
    }))
}

async fn register<S>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(app, register_request(email, "caiquecoelho15")).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["user"]["token"]
        .as_str()
        .expect("token string")
        .to_owned()
}

async fn create_article<S>(app: &S, token: &str, title: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = with_token(test::TestRequest::post().uri("/api/articles"), token).set_json(
        json!({"article": {
            "title": title,
            "description": "Ever wonder how?",
            "body": "You have to believe",
            "tagList": ["dragons", "training"]
        }}),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["article"]["slug"]
        .as_str()
        .expect("slug string")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn registration_returns_a_fresh_profile() {
    let app = test::init_service(build_app(dependencies())).await;

    let (status, body) = send(&app, register_request("caique@hotmail.com", "caiquecoelho15")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "caiquecoelho15");
    assert_eq!(body["user"]["email"], "caique@hotmail.com");
    assert_eq!(body["user"]["bio"], "");
    assert_eq!(body["user"]["image"], Value::Null);
    assert!(!body["user"]["token"].as_str().unwrap_or_default().is_empty());
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_a_uniqueness_conflict() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;

    let (status, body) = send(&app, register_request("caique@hotmail.com", "someone")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": {"database": "UNIQUE constraint failed: user_models.email"}})
    );

    let (status, body) = send(&app, with_token(test::TestRequest::get().uri("/api/user"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "caiquecoelho15");
}

#[rstest]
#[case::blank("")]
#[case::malformed("caique")]
#[actix_web::test]
async fn registration_rejects_bad_email(#[case] email: &str) {
    let app = test::init_service(build_app(dependencies())).await;

    let (status, body) = send(&app, register_request(email, "caiquecoelho15")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": {"email": "{key: email}"}}));
}

#[rstest]
#[actix_web::test]
async fn current_user_requires_a_token_and_echoes_it() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/user")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"errors": {"token": "missing or invalid token"}}));

    let (status, body) = send(&app, with_token(test::TestRequest::get().uri("/api/user"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"user": {
            "username": "caiquecoelho15",
            "email": "caique@hotmail.com",
            "bio": "",
            "image": null,
            "token": token
        }})
    );
}

#[rstest]
#[actix_web::test]
async fn login_issues_the_registration_token() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;

    let login = |password: &str| {
        test::TestRequest::post().uri("/api/users/login").set_json(json!({
            "user": {"email": "caique@hotmail.com", "password": password}
        }))
    };

    let (status, body) = send(&app, login("caiquecoelho")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["token"], token.as_str());

    let (status, body) = send(&app, login("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"errors": {"credentials": "invalid email or password"}})
    );
}

#[rstest]
#[actix_web::test]
async fn email_update_succeeds_for_an_unused_address() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;

    let request = with_token(test::TestRequest::put().uri("/api/user"), &token)
        .set_json(json!({"user": {"email": "caiquecoelho17@hotmail.com"}}));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "caiquecoelho17@hotmail.com");
    assert_eq!(body["user"]["username"], "caiquecoelho15");
    assert_eq!(body["user"]["token"], token.as_str());
}

#[rstest]
#[case::blank("", json!({"email": "{key: email}"}))]
#[case::malformed("caique", json!({"email": "{key: email}"}))]
#[case::taken("taken@hotmail.com", json!({"database": "UNIQUE constraint failed: user_models.email"}))]
#[actix_web::test]
async fn rejected_email_updates_leave_the_account_unchanged(
    #[case] email: &str,
    #[case] errors: Value,
) {
    let app = test::init_service(build_app(dependencies())).await;
    register(&app, "taken@hotmail.com").await;
    let token = register(&app, "caique@hotmail.com").await;

    let request = with_token(test::TestRequest::put().uri("/api/user"), &token)
        .set_json(json!({"user": {"email": email}}));
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": errors}));

    let (_, body) = send(&app, with_token(test::TestRequest::get().uri("/api/user"), &token)).await;
    assert_eq!(body["user"]["email"], "caique@hotmail.com");
}

#[rstest]
#[actix_web::test]
async fn profile_image_can_be_set_and_cleared() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    let update = |user: Value| {
        with_token(test::TestRequest::put().uri("/api/user"), &token).set_json(json!({"user": user}))
    };

    let (_, body) = send(&app, update(json!({"bio": "skater", "image": "https://i.imgur.com/a.png"}))).await;
    assert_eq!(body["user"]["bio"], "skater");
    assert_eq!(body["user"]["image"], "https://i.imgur.com/a.png");

    let (_, body) = send(&app, update(json!({"image": null}))).await;
    assert_eq!(body["user"]["image"], "https://i.imgur.com/a.png");

    let (_, body) = send(&app, update(json!({"image": ""}))).await;
    assert_eq!(body["user"]["image"], Value::Null);
    assert_eq!(body["user"]["bio"], "skater");
}

#[rstest]
#[actix_web::test]
async fn author_can_delete_an_article() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    let slug = create_article(&app, &token, "How to train your dragon").await;
    assert_eq!(slug, "how-to-train-your-dragon");

    let uri = format!("/api/articles/{slug}");
    let (status, body) = send(&app, with_token(test::TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"article": "Delete success"}));

    let (status, body) = send(&app, with_token(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": {"article": "not found"}}));
    assert!(body["article"]["slug"].is_null());
}

#[rstest]
#[actix_web::test]
async fn garbled_token_cannot_delete() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    let slug = create_article(&app, &token, "How to train your dragon").await;
    let uri = format!("/api/articles/{slug}");

    let (status, body) = send(&app, with_token(test::TestRequest::delete().uri(&uri), "Ababuble")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"errors": {"token": "missing or invalid token"}}));

    let (status, body) = send(&app, with_token(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["slug"], slug.as_str());
}

#[rstest]
#[actix_web::test]
async fn other_users_cannot_modify_an_article() {
    let app = test::init_service(build_app(dependencies())).await;
    let author = register(&app, "author@hotmail.com").await;
    let stranger = register(&app, "stranger@hotmail.com").await;
    let slug = create_article(&app, &author, "How to train your dragon").await;
    let uri = format!("/api/articles/{slug}");
    let forbidden = json!({"errors": {"authorization": "only the author may modify this resource"}});

    let (status, body) = send(&app, with_token(test::TestRequest::delete().uri(&uri), &stranger)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, forbidden);

    let request = with_token(test::TestRequest::put().uri(&uri), &stranger)
        .set_json(json!({"article": {"title": "Mine now"}}));
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, forbidden);

    let (status, body) = send(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["title"], "How to train your dragon");
}

#[rstest]
#[actix_web::test]
async fn author_update_keeps_the_slug() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    let slug = create_article(&app, &token, "How to train your dragon").await;
    let uri = format!("/api/articles/{slug}");

    let request = with_token(test::TestRequest::put().uri(&uri), &token)
        .set_json(json!({"article": {"title": "Did you train your dragon?", "tagList": []}}));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["slug"], slug.as_str());
    assert_eq!(body["article"]["title"], "Did you train your dragon?");
    assert_eq!(body["article"]["tagList"], json!([]));
    assert_eq!(body["article"]["author"]["username"], "caiquecoelho15");
    assert_eq!(body["article"]["author"]["following"], false);
}

#[rstest]
#[actix_web::test]
async fn article_creation_validates_every_field() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;

    let request = with_token(test::TestRequest::post().uri("/api/articles"), &token)
        .set_json(json!({"article": {"title": "!!!"}}));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": {
            "title": "{key: title}",
            "description": "{key: description}",
            "body": "{key: body}"
        }})
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_title_is_a_slug_conflict() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    create_article(&app, &token, "How to train your dragon").await;

    let request = with_token(test::TestRequest::post().uri("/api/articles"), &token).set_json(
        json!({"article": {
            "title": "How to Train Your Dragon",
            "description": "again",
            "body": "again"
        }}),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": {"database": "UNIQUE constraint failed: article_models.slug"}})
    );
}

#[rstest]
#[actix_web::test]
async fn garbled_token_is_ignored_on_reads() {
    let app = test::init_service(build_app(dependencies())).await;
    let token = register(&app, "caique@hotmail.com").await;
    let slug = create_article(&app, &token, "How to train your dragon").await;

    let request = with_token(
        test::TestRequest::get().uri(&format!("/api/articles/{slug}")),
        "Ababuble",
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn undecodable_body_is_unprocessable() {
    let app = test::init_service(build_app(dependencies())).await;

    let request = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"user\": ");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["body"].is_string());
}
