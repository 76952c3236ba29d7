//! Bearer-token auth gate.
//!
//! [`BearerAuth`] runs once per request: it reads the authorization header,
//! verifies the token, resolves the subject against the credential store,
//! and establishes an [`Identity`] in the request extensions. Verification
//! failures never reject here; the request continues unauthenticated and
//! protected handlers fail their [`Identity`] extraction with the 401
//! challenge instead. Public routes simply never ask for an identity.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::UserRepository;
use crate::domain::token::TokenCodec;
use crate::domain::{Email, UserId};

/// Caller identity established by [`BearerAuth`] for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    email: Email,
}

impl Identity {
    /// Build an identity from resolved user data.
    pub fn new(user_id: UserId, email: Email) -> Self {
        Self { user_id, email }
    }

    /// Authenticated user's identifier.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Authenticated user's email, the token subject.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| AuthChallenge.into()),
        )
    }
}

/// Challenge returned when a protected route is reached unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please authenticate.")]
pub struct AuthChallenge;

impl ResponseError for AuthChallenge {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({ "error": "Please authenticate." }))
    }
}

struct AuthGate {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl AuthGate {
    async fn resolve(&self, req: &ServiceRequest) -> Option<Identity> {
        let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = TokenCodec::extract_bearer(header)?;
        match self.identity_for(token).await {
            Ok(identity) => Some(identity),
            Err(reason) => {
                debug!(reason = %reason, "bearer token rejected; continuing unauthenticated");
                None
            }
        }
    }

    async fn identity_for(&self, token: &str) -> Result<Identity, String> {
        let subject = self
            .codec
            .verify_subject(token)
            .map_err(|err| err.to_string())?;
        if self.codec.is_expired(token).map_err(|err| err.to_string())? {
            return Err("token expired".into());
        }
        let user = self
            .users
            .find_by_email(&subject)
            .await
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("no user for subject {subject}"))?;
        Ok(Identity::new(user.id(), user.email().clone()))
    }
}

/// Middleware factory establishing caller identity from bearer tokens.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use chrono::Duration;
/// use keepsake::domain::ports::InMemoryUserRepository;
/// use keepsake::domain::{TokenCodec, TokenConfig};
/// use keepsake::inbound::http::auth::BearerAuth;
///
/// let users = Arc::new(InMemoryUserRepository::default());
/// let codec = Arc::new(TokenCodec::new(TokenConfig::new(
///     b"secret".to_vec(),
///     Duration::seconds(3600),
/// )));
/// let app = App::new().wrap(BearerAuth::new(users, codec));
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    gate: Arc<AuthGate>,
}

impl BearerAuth {
    /// Create the gate from the credential store and token codec.
    pub fn new(users: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self {
            gate: Arc::new(AuthGate { users, codec }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
        }))
    }
}

/// Service wrapper produced by [`BearerAuth`].
///
/// Applications should not use this type directly.
pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    gate: Arc<AuthGate>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        Box::pin(async move {
            let established = req.extensions().get::<Identity>().is_some();
            if !established {
                if let Some(identity) = gate.resolve(&req).await {
                    req.extensions_mut().insert(identity);
                }
            }
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the auth gate's pass-through and challenge
    //! behaviour.
    use super::*;
    use crate::domain::ports::InMemoryUserRepository;
    use crate::domain::token::TokenConfig;
    use crate::domain::User;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::Duration;
    use rstest::rstest;
    use serde_json::Value;

    const SECRET: &[u8] = b"auth-gate-test-secret";

    fn codec(ttl_secs: i64) -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(TokenConfig::new(
            SECRET.to_vec(),
            Duration::seconds(ttl_secs),
        )))
    }

    async fn seeded_users(email: &str) -> Arc<InMemoryUserRepository> {
        let users = Arc::new(InMemoryUserRepository::default());
        let user = User::new(
            UserId::random(),
            Email::new(email).expect("valid email"),
            "$argon2id$stub".into(),
        );
        users.insert(&user).await.expect("seed user");
        users
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.email().to_string())
    }

    async fn call(
        users: Arc<InMemoryUserRepository>,
        authorization: Option<String>,
    ) -> (StatusCode, Vec<u8>) {
        let app = test::init_service(
            App::new()
                .wrap(BearerAuth::new(users, codec(3600)))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(value) = authorization {
            request = request.insert_header((header::AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await.to_vec();
        (status, body)
    }

    #[actix_web::test]
    async fn valid_token_establishes_identity() {
        let users = seeded_users("ada@example.com").await;
        let token = codec(3600)
            .issue(&Email::new("ada@example.com").expect("valid email"))
            .expect("token issues");

        let (status, body) = call(users, Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ada@example.com");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic Zm9vOmJhcg==".to_owned()))]
    #[case(Some("Bearer not-a-token".to_owned()))]
    #[actix_web::test]
    async fn unauthenticated_requests_get_the_challenge_body(
        #[case] authorization: Option<String>,
    ) {
        let users = seeded_users("ada@example.com").await;

        let (status, body) = call(users, authorization).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let value: Value = serde_json::from_slice(&body).expect("challenge payload");
        assert_eq!(value, json!({ "error": "Please authenticate." }));
    }

    #[actix_web::test]
    async fn expired_token_is_passed_through_and_challenged() {
        let users = seeded_users("ada@example.com").await;
        let token = codec(-60)
            .issue(&Email::new("ada@example.com").expect("valid email"))
            .expect("token issues");

        let (status, _) = call(users, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unresolvable_subject_is_challenged() {
        let users = seeded_users("ada@example.com").await;
        let token = codec(3600)
            .issue(&Email::new("ghost@example.com").expect("valid email"))
            .expect("token issues");

        let (status, _) = call(users, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
