//! Users API handlers.
//!
//! ```text
//! POST /api/users        {"user":{"email","username","password"}}
//! POST /api/users/login  {"user":{"email","password"}}
//! GET  /api/user
//! PUT  /api/user         {"user":{"email"?,"bio"?,"image"?}}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ErrorEnvelope;
use crate::domain::ports::{AuthenticatedUser, LoginRequest, RegisterUserRequest, UpdateUserRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Credential;
use crate::inbound::http::state::HttpState;

/// Registration fields. Absent fields are reported by validation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct NewUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /api/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct NewUserBody {
    pub user: NewUser,
}

impl From<NewUser> for RegisterUserRequest {
    fn from(value: NewUser) -> Self {
        Self {
            email: value.email,
            username: value.username,
            password: value.password.map(Into::into),
        }
    }
}

/// Login fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginUser {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /api/users/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginUserBody {
    pub user: LoginUser,
}

impl From<LoginUser> for LoginRequest {
    fn from(value: LoginUser) -> Self {
        Self {
            email: value.email,
            password: value.password.map(Into::into),
        }
    }
}

/// Profile fields to change. `image: ""` clears the image; `null` keeps it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Body for `PUT /api/user`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserBody {
    pub user: UpdateUser,
}

impl From<UpdateUser> for UpdateUserRequest {
    fn from(value: UpdateUser) -> Self {
        Self {
            email: value.email,
            bio: value.bio,
            image: value.image,
        }
    }
}

/// Account representation returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    #[schema(example = "caiquecoelho15")]
    pub username: String,
    #[schema(example = "caique@hotmail.com")]
    pub email: String,
    pub bio: String,
    pub image: Option<String>,
    pub token: String,
}

/// `{"user": {...}}` response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDto,
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(value: AuthenticatedUser) -> Self {
        let AuthenticatedUser { account, token } = value;
        Self {
            user: UserDto {
                username: account.username().as_str().to_owned(),
                email: account.email().as_str().to_owned(),
                bio: account.bio().to_owned(),
                image: account.image().map(str::to_owned),
                token: token.as_str().to_owned(),
            },
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUserBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 422, description = "Validation failure or email taken", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<NewUserBody>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::from(payload.into_inner().user);
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginUserBody,
    responses(
        (status = 200, description = "Login success", body = UserResponse),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 422, description = "Validation failure", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let request = LoginRequest::from(payload.into_inner().user);
    let user = state.accounts.login(request).await?;
    Ok(web::Json(user.into()))
}

/// Current account for the presented token.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    credential: Credential,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .current_user
        .current_user(credential.into_token())
        .await?;
    Ok(web::Json(user.into()))
}

/// Update the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/user",
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 422, description = "Validation failure or email taken", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user")]
pub async fn update_user(
    state: web::Data<HttpState>,
    credential: Credential,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let request = UpdateUserRequest::from(payload.into_inner().user);
    let user = state
        .accounts
        .update_profile(credential.into_token(), request)
        .await?;
    Ok(web::Json(user.into()))
}
