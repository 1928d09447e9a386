//! Route table for the HTTP adapter.
//!
//! ```text
//! GET    /users                   list_users
//! POST   /users                   create_user
//! PUT    /users/{id}              update_user
//! DELETE /users/{id}              delete_user
//! GET    /swagger                 redirect to /swagger/
//! GET    /swagger/...             Swagger UI
//! GET    /api-docs/openapi.json   OpenAPI document
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::ApiDoc;
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::users::{create_user, delete_user, list_users, update_user};

/// Path serving the raw OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Path serving the interactive documentation.
pub const SWAGGER_PATH: &str = "/swagger";

async fn swagger_redirect() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("{SWAGGER_PATH}/")))
        .finish()
}

async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no route matches the request"))
}

/// Register the users endpoints and the documentation on an application,
/// with a JSON `404` for anything else.
///
/// Handlers expect `web::Data<HttpState>` to be registered by the caller.
///
/// # Examples
/// ```ignore
/// App::new()
///     .app_data(web::Data::new(state))
///     .wrap(Trace)
///     .configure(routes::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .route(SWAGGER_PATH, web::get().to(swagger_redirect))
        .service(
            SwaggerUi::new(format!("{SWAGGER_PATH}/{{_:.*}}"))
                .url(OPENAPI_JSON_PATH, ApiDoc::openapi()),
        )
        .default_service(web::to(route_not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::inbound::http::state::HttpState;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    macro_rules! init_app {
        () => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(HttpState::new(Arc::new(
                        MockUserRepository::new(),
                    ))))
                    .configure(configure),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn swagger_root_redirects_to_the_ui() {
        let app = init_app!();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/swagger").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/swagger/")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn openapi_document_is_served() {
        let app = init_app!();

        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri(OPENAPI_JSON_PATH).to_request(),
        )
        .await;

        assert_eq!(body["info"]["title"], "User API");
        assert!(body["paths"]["/users"]["get"].is_object());
        assert!(body["paths"]["/users/{id}"]["delete"].is_object());
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_routes_return_json_404() {
        let app = init_app!();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/nope").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = init_app!();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
