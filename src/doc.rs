//! OpenAPI document exposed by Swagger UI and tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, ImageEntry, UserImageListing};
use crate::inbound::http::gallery::MessageResponse;
use crate::inbound::http::users::{CredentialsRequest, TokenResponse};
use crate::inbound::http::{gallery, health, users};

/// Registers the `bearerAuth` security scheme referenced by protected paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Public OpenAPI surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        gallery::upload_image,
        gallery::image_data,
        gallery::get_image,
        gallery::delete_image,
        health::live,
        health::ready,
    ),
    components(schemas(
        CredentialsRequest,
        TokenResponse,
        MessageResponse,
        UserImageListing,
        ImageEntry,
        Error,
        ErrorCode,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "account", description = "Registration and login"),
        (name = "gallery", description = "Image upload, listing, download, and delete"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_advertises_bearer_scheme_and_routes() {
        let doc = ApiDoc::openapi();

        let components = doc.components.as_ref().expect("components present");
        assert!(components.security_schemes.contains_key("bearerAuth"));

        let paths = &doc.paths.paths;
        for path in [
            "/register",
            "/login",
            "/uploadImage",
            "/imageData",
            "/image/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }
}
