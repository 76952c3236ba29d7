//! Account API handlers.
//!
//! ```text
//! POST /register {"email":"ada@example.com","password":"secret1"}
//! POST /login {"email":"ada@example.com","password":"secret1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Credentials, CredentialValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body shared by `POST /register` and `POST /login`.
///
/// Example JSON:
/// `{"email":"ada@example.com","password":"secret1"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Token issued to a registered or logged-in identity.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    let (field, code) = match &err {
        CredentialValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialValidationError::InvalidEmail => ("email", "invalid_email"),
        CredentialValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
        CredentialValidationError::PasswordTooLong { .. } => ("password", "password_too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account and return its bearer token.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["account"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    info!("user registration");
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let token = state.account.register(&credentials).await?;
    Ok(HttpResponse::Created().json(TokenResponse {
        token: token.into_inner(),
    }))
}

/// Authenticate an existing account and return a fresh bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No user matches the credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["account"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    info!("user login");
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let token = state.account.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token: token.into_inner(),
    }))
}
