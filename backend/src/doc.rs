//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `#[utoipa::path]` along
//! with the request and response schemas. Swagger UI serves it at `/docs` in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorEnvelope;
use crate::inbound::http::articles::{
    ArticleBody, ArticleDto, ArticleFields, ArticleResponse, DeleteResponse, ProfileDto,
};
use crate::inbound::http::users::{
    LoginUser, LoginUserBody, NewUser, NewUserBody, UpdateUser, UpdateUserBody, UserDto,
    UserResponse,
};

/// Registers the `Authorization: Token <jwt>` scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <jwt>` as returned by registration or login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Conduit backend API",
        description = "Users, bearer-token authentication, and author-owned articles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        NewUser,
        NewUserBody,
        LoginUser,
        LoginUserBody,
        UpdateUser,
        UpdateUserBody,
        UserDto,
        UserResponse,
        ArticleFields,
        ArticleBody,
        ArticleDto,
        ArticleResponse,
        ProfileDto,
        DeleteResponse,
    )),
    tags(
        (name = "users", description = "Registration, login, and the current user"),
        (name = "articles", description = "Author-owned articles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
