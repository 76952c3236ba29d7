//! Gallery API handlers.
//!
//! ```text
//! POST /uploadImage multipart field "image"
//! GET /imageData
//! GET /image/{id}
//! DELETE /image/{id}
//! ```
//!
//! All routes here are protected: each handler takes an [`Identity`] and
//! fails with the 401 challenge when the auth gate established none.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::bytes::Bytes as ImageBytes;
use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::{Error, GalleryItemId, UserImageListing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::state::HttpState;

const DEFAULT_FILENAME: &str = "image";

/// Multipart body for `POST /uploadImage`: one `image` part.
#[derive(Debug, MultipartForm)]
pub struct UploadImageForm {
    pub image: ImageBytes,
}

/// Human-readable outcome message for mutating gallery routes.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Store an uploaded image for the authenticated user.
#[utoipa::path(
    post,
    path = "/uploadImage",
    responses(
        (status = 200, description = "Image stored", body = MessageResponse),
        (status = 400, description = "Uploaded image is empty", body = Error),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Caller does not resolve to a user", body = Error),
        (status = 500, description = "Store write failed")
    ),
    tags = ["gallery"],
    operation_id = "uploadImage",
    security(("bearerAuth" = []))
)]
#[post("/uploadImage")]
pub async fn upload_image(
    identity: Identity,
    state: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> ApiResult<HttpResponse> {
    info!("upload image for authenticated user");
    if form.image.data.is_empty() {
        return Err(Error::invalid_request("No image found"));
    }

    let filename = form
        .image
        .file_name
        .clone()
        .unwrap_or_else(|| DEFAULT_FILENAME.to_owned());

    let uploaded = state
        .gallery
        .upload_image(identity.email(), &filename, form.image.data.to_vec())
        .await?;

    if uploaded {
        Ok(HttpResponse::Ok().json(MessageResponse::new("Image uploaded successfully")))
    } else {
        Ok(HttpResponse::InternalServerError().finish())
    }
}

/// List the authenticated user's images, grouped by owner, without payloads.
#[utoipa::path(
    get,
    path = "/imageData",
    responses(
        (status = 200, description = "Grouped listing", body = [UserImageListing]),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Caller does not resolve to a user", body = Error)
    ),
    tags = ["gallery"],
    operation_id = "getUserImageData",
    security(("bearerAuth" = []))
)]
#[get("/imageData")]
pub async fn image_data(
    identity: Identity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserImageListing>>> {
    info!("fetch image data for authenticated user");
    let listing = state.gallery.list_images(identity.email()).await?;
    Ok(web::Json(listing))
}

/// Download one image payload by gallery item id.
#[utoipa::path(
    get,
    path = "/image/{id}",
    params(("id" = Uuid, Path, description = "Gallery item identifier")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No item with that id", body = Error)
    ),
    tags = ["gallery"],
    operation_id = "downloadImage",
    security(("bearerAuth" = []))
)]
#[get("/image/{id}")]
pub async fn get_image(
    _identity: Identity,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    info!("download image by gallery item id");
    let id = GalleryItemId::from_uuid(path.into_inner());
    let bytes = state.gallery.get_image(id).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(bytes))
}

/// Delete one image by gallery item id.
#[utoipa::path(
    delete,
    path = "/image/{id}",
    params(("id" = Uuid, Path, description = "Gallery item identifier")),
    responses(
        (status = 202, description = "Image deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No item with that id", body = Error)
    ),
    tags = ["gallery"],
    operation_id = "deleteUserImage",
    security(("bearerAuth" = []))
)]
#[delete("/image/{id}")]
pub async fn delete_image(
    _identity: Identity,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    info!("delete image by gallery item id");
    let id = GalleryItemId::from_uuid(path.into_inner());
    state.gallery.delete_image(id).await?;
    Ok(HttpResponse::Accepted().json(MessageResponse::new("Image deleted successfully")))
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with stubbed gallery ports; the full
    //! register/login/upload flow lives in the integration tests.
    use super::*;
    use crate::domain::ports::{AccountService, GalleryService};
    use crate::domain::{Credentials, Email, SignedToken, UserId};
    use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpMessage, test as actix_test};
    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    struct UnreachableAccountService;

    #[async_trait]
    impl AccountService for UnreachableAccountService {
        async fn register(&self, _credentials: &Credentials) -> Result<SignedToken, Error> {
            unreachable!("gallery handlers never touch the account service")
        }

        async fn login(&self, _credentials: &Credentials) -> Result<SignedToken, Error> {
            unreachable!("gallery handlers never touch the account service")
        }
    }

    /// Scripted gallery port: `upload_ok` drives the upload outcome.
    struct StubGalleryService {
        upload_ok: bool,
    }

    #[async_trait]
    impl GalleryService for StubGalleryService {
        async fn upload_image(
            &self,
            _caller: &Email,
            _filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<bool, Error> {
            Ok(self.upload_ok)
        }

        async fn list_images(&self, _caller: &Email) -> Result<Vec<UserImageListing>, Error> {
            Ok(Vec::new())
        }

        async fn get_image(&self, id: GalleryItemId) -> Result<Vec<u8>, Error> {
            Err(Error::not_found(format!("No record found with id: {id}")))
        }

        async fn delete_image(&self, _id: GalleryItemId) -> Result<(), Error> {
            Ok(())
        }
    }

    fn identity() -> Identity {
        Identity::new(
            UserId::random(),
            Email::new("ada@example.com").expect("valid email"),
        )
    }

    fn app_with(
        gallery: StubGalleryService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = web::Data::new(HttpState::new(
            Arc::new(UnreachableAccountService),
            Arc::new(gallery),
        ));
        let identity = identity();
        App::new()
            .app_data(state)
            .wrap_fn(move |req, srv| {
                req.extensions_mut().insert(identity.clone());
                srv.call(req)
            })
            .service(upload_image)
            .service(image_data)
            .service(get_image)
            .service(delete_image)
    }

    fn multipart_body(filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "handler-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    async fn post_upload(gallery: StubGalleryService, bytes: &[u8]) -> StatusCode {
        let app = actix_test::init_service(app_with(gallery)).await;
        let (content_type, body) = multipart_body("cat.png", bytes);
        let request = actix_test::TestRequest::post()
            .uri("/uploadImage")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        actix_test::call_service(&app, request).await.status()
    }

    #[actix_web::test]
    async fn successful_upload_reports_the_message() {
        let app = actix_test::init_service(app_with(StubGalleryService { upload_ok: true })).await;
        let (content_type, body) = multipart_body("cat.png", &[0x01, 0x02]);
        let request = actix_test::TestRequest::post()
            .uri("/uploadImage")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "Image uploaded successfully");
    }

    #[actix_web::test]
    async fn empty_upload_is_rejected_before_the_store() {
        let status = post_upload(StubGalleryService { upload_ok: true }, &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn failed_store_write_surfaces_as_a_server_error() {
        let status = post_upload(StubGalleryService { upload_ok: false }, &[0x01]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn missing_image_fails_with_not_found_error_body() {
        let app = actix_test::init_service(app_with(StubGalleryService { upload_ok: true })).await;
        let request = actix_test::TestRequest::get()
            .uri(&format!("/image/{}", Uuid::new_v4()))
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_acknowledges_with_accepted() {
        let app = actix_test::init_service(app_with(StubGalleryService { upload_ok: true })).await;
        let request = actix_test::TestRequest::delete()
            .uri(&format!("/image/{}", Uuid::new_v4()))
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "Image deleted successfully");
    }

    #[actix_web::test]
    async fn empty_listing_serialises_as_an_empty_array() {
        let app = actix_test::init_service(app_with(StubGalleryService { upload_ok: true })).await;
        let request = actix_test::TestRequest::get()
            .uri("/imageData")
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value, serde_json::json!([]));
    }
}
