//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    GalleryRepository, InMemoryGalleryRepository, InMemoryUserRepository, UserRepository,
};
use crate::domain::{AccountServiceImpl, GalleryServiceImpl, TokenCodec};
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::gallery::{delete_image, get_image, image_data, upload_image};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, register};
use crate::outbound::persistence::{DieselGalleryRepository, DieselUserRepository};

/// Build the store pair based on configuration.
///
/// Uses the Diesel-backed adapters when a pool is available, otherwise
/// falls back to the in-memory stores for development and tests.
fn build_stores(config: &ServerConfig) -> (Arc<dyn UserRepository>, Arc<dyn GalleryRepository>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselGalleryRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(InMemoryGalleryRepository::default()),
        ),
    }
}

/// Wire the use-case services over the given stores.
pub fn build_http_state(
    users: Arc<dyn UserRepository>,
    gallery: Arc<dyn GalleryRepository>,
    codec: Arc<TokenCodec>,
) -> HttpState {
    HttpState::new(
        Arc::new(AccountServiceImpl::new(Arc::clone(&users), codec)),
        Arc::new(GalleryServiceImpl::new(users, gallery)),
    )
}

/// Assemble the application: auth gate, routes, probes, and (in debug
/// builds) the Swagger UI.
pub fn build_app(
    state: HttpState,
    auth: BearerAuth,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The gate wraps every route; public handlers simply never ask for an
    // identity, so pass-through costs them nothing.
    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(state))
        .wrap(auth)
        .service(register)
        .service(login)
        .service(upload_image)
        .service(image_data)
        .service(get_image)
        .service(delete_image)
        .service(live)
        .service(ready);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Run the HTTP server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let codec = Arc::new(TokenCodec::new(config.token.clone()));
    let (users, gallery) = build_stores(&config);
    let auth = BearerAuth::new(Arc::clone(&users), Arc::clone(&codec));
    let state = build_http_state(users, gallery, codec);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            auth.clone(),
            server_health_state.clone(),
        )
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
