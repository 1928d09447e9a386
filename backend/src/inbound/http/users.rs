//! Users API handlers.
//!
//! ```text
//! GET    /users       List every stored user
//! POST   /users       {"name":"Ana","email":"ana@x.com"}
//! PUT    /users/{id}  {"name":"Ana Silva","email":"ana@x.com"}
//! DELETE /users/{id}
//! ```
//!
//! Each handler performs at most one repository call. Successes emit an
//! `info` entry and failures an `error` entry carrying the store's message as
//! metadata; clients only ever see a generic message.

use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, delete, get, post, put, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AppLogger, AppLoggerExt, UserPersistenceError};
use crate::domain::{Error, User, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::middleware::TraceId;

/// Request body for create and update.
///
/// Both fields are optional; a missing field is stored as `null`. An empty
/// body, or one sent with a non-JSON content type, reads as `{}`. A JSON body
/// that fails to parse is rejected with `400`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserPayload {
    #[serde(default)]
    #[schema(example = "Ana")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "ana@x.com")]
    pub email: Option<String>,
}

impl From<UserPayload> for UserDraft {
    fn from(value: UserPayload) -> Self {
        Self::new(value.name, value.email)
    }
}

/// Response body for `PUT /users/{id}`.
///
/// The identifier is echoed back as the string taken from the path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdatedUserResponse {
    #[schema(example = "1")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

fn declares_json(req: &HttpRequest) -> bool {
    match req.mime_type() {
        Ok(Some(mime)) => {
            mime.subtype().as_str() == "json"
                || mime.suffix().is_some_and(|suffix| suffix.as_str() == "json")
        }
        Ok(None) => true,
        Err(_) => false,
    }
}

impl FromRequest for UserPayload {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if !declares_json(req) {
            return Box::pin(async { Ok::<_, actix_web::Error>(Self::default()) });
        }
        let body = web::Bytes::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move {
            let body = body.await?;
            if body.is_empty() {
                return Ok(Self::default());
            }
            serde_json::from_slice::<Self>(&body)
                .map_err(|err| json_error_handler(JsonPayloadError::Deserialize(err), &req))
        })
    }
}

/// Path identifiers that are not integers cannot match a stored row.
fn stored_id(raw: &str) -> Option<UserId> {
    raw.parse().ok()
}

/// Log a store failure and build the generic client-facing error.
fn store_failure(
    logger: &dyn AppLogger,
    client_message: &'static str,
    log_message: &str,
    id: Option<UserId>,
    err: &UserPersistenceError,
) -> Error {
    let mut metadata = TraceId::log_metadata();
    if let Some(id) = id {
        metadata.insert("id".to_owned(), id.get().into());
    }
    metadata.insert("error".to_owned(), err.to_string().into());
    logger.error(log_message, metadata);
    Error::internal(client_message)
}

/// List every stored user in storage order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Every stored user", body = [UserSchema]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list().await.map_err(|err| {
        store_failure(
            state.logger.as_ref(),
            "failed to list users",
            "failed to list users",
            None,
            &err,
        )
    })?;
    let mut metadata = TraceId::log_metadata();
    metadata.insert("count".to_owned(), users.len().into());
    state.logger.info("GET /users - users listed", metadata);
    Ok(web::Json(users))
}

/// Create a user and return it with its assigned identifier.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Malformed JSON body", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: UserPayload,
) -> ApiResult<HttpResponse> {
    let draft = UserDraft::from(payload);
    let user = state.users.create(&draft).await.map_err(|err| {
        store_failure(
            state.logger.as_ref(),
            "failed to create user",
            "failed to create user",
            None,
            &err,
        )
    })?;
    let mut metadata = TraceId::log_metadata();
    metadata.insert("id".to_owned(), user.id().get().into());
    state.logger.info(
        &format!("POST /users - user created: {}", user.name().unwrap_or("<null>")),
        metadata,
    );
    Ok(HttpResponse::Created().json(user))
}

/// Overwrite the name and email of the user with `id`.
///
/// Unknown identifiers are not an error: nothing is updated and the request
/// still succeeds. The identifier is echoed back exactly as given in the path.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UpdatedUserResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: UserPayload,
) -> ApiResult<web::Json<UpdatedUserResponse>> {
    let raw_id = path.into_inner();
    let draft = UserDraft::from(payload);
    if let Some(id) = stored_id(&raw_id) {
        state.users.update(id, &draft).await.map_err(|err| {
            store_failure(
                state.logger.as_ref(),
                "failed to update user",
                &format!("failed to update user {id}"),
                Some(id),
                &err,
            )
        })?;
    }
    state.logger.info(
        &format!("PUT /users/{raw_id} - user updated"),
        TraceId::log_metadata(),
    );
    Ok(web::Json(UpdatedUserResponse {
        id: raw_id,
        name: draft.name().map(str::to_owned),
        email: draft.email().map(str::to_owned),
    }))
}

/// Remove the user with `id`.
///
/// Deleting an unknown or already deleted identifier still returns `204`.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User removed"),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw_id = path.into_inner();
    if let Some(id) = stored_id(&raw_id) {
        state.users.delete(id).await.map_err(|err| {
            store_failure(
                state.logger.as_ref(),
                "failed to delete user",
                &format!("failed to delete user {id}"),
                Some(id),
                &err,
            )
        })?;
    }
    state.logger.info(
        &format!("DELETE /users/{raw_id} - user removed"),
        TraceId::log_metadata(),
    );
    Ok(HttpResponse::NoContent().finish())
}
