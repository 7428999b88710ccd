//! Request handlers for the HTTP API.
//!
//! Every body is decoded into its endpoint's request struct and validated once
//! into a typed value before it reaches the session manager. A body that is not
//! valid JSON is treated as empty, so it fails the same field validation.

use std::time::Duration;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_cookies::{Cookie, Cookies, cookie::time::Duration as CookieDuration};
use tracing::{debug, info, warn};

use super::protocol::{HealthResponse, StatusResponse};
use crate::{
    Error,
    constants::{ITEM_PATH, SESSION_COOKIE},
    item::{AddItemRequest, ItemCommand, RemoveItemRequest, UpdateItemRequest},
    session::{SessionError, SessionManager, SessionToken},
    user::{Credentials, LoginRequest, RegisterRequest, Registration},
};

const NOT_LOGGED_IN: &str = "Not logged in (possibly, your session expired).";
const TOKEN_FAILURE: &str = "Failed to generate session-id. Try again.";

/// Error wrapper turning library errors into `{status: 1, msg}` responses.
pub(crate) struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.0 {
            Error::Session(SessionError::NotAuthenticated) => {
                (StatusCode::BAD_REQUEST, NOT_LOGGED_IN.to_string())
            }
            Error::Session(SessionError::TokenGeneration { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, TOKEN_FAILURE.to_string())
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        warn!(module = self.0.module(), %status, "request failed: {}", self.0);
        (status, Json(StatusResponse::failure(msg))).into_response()
    }
}

type ApiResult = Result<Response, ApiError>;

fn body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("unreadable request body: {rejection}");
            T::default()
        }
    }
}

fn session_token(cookies: &Cookies) -> Result<String, ApiError> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| SessionError::NotAuthenticated.into())
}

/// Cookie lifetime matching the session timeout, saturating at `i64::MAX` seconds.
fn cookie_max_age(timeout: Duration) -> CookieDuration {
    CookieDuration::seconds(i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX))
}

/// Attach the session cookie and acknowledge.
fn session_established(
    manager: &SessionManager,
    cookies: &Cookies,
    token: SessionToken,
) -> Response {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_path(ITEM_PATH);
    cookie.set_max_age(cookie_max_age(manager.config().timeout));
    cookies.add(cookie);
    Json(StatusResponse::success()).into_response()
}

fn acknowledged() -> Response {
    Json(StatusResponse::success()).into_response()
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// Handler for POST /register
pub(crate) async fn register(
    State(manager): State<SessionManager>,
    cookies: Cookies,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult {
    let registration = Registration::try_from(body(payload))?;
    let token = manager.register(registration).await?;
    Ok(session_established(&manager, &cookies, token))
}

/// Handler for POST /login
pub(crate) async fn login(
    State(manager): State<SessionManager>,
    cookies: Cookies,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let credentials = Credentials::try_from(body(payload))?;
    let username = credentials.username.clone();
    let token = manager.login(credentials).await?;
    info!(%username, "user logged in");
    Ok(session_established(&manager, &cookies, token))
}

// ============================================================================
// Item Handlers
// ============================================================================

/// Handler for GET /item
pub(crate) async fn list_items(
    State(manager): State<SessionManager>,
    cookies: Cookies,
) -> ApiResult {
    let token = session_token(&cookies)?;
    let items = manager.items(&token).await?;
    Ok(Json(items).into_response())
}

/// Handler for POST /item
pub(crate) async fn add_item(
    State(manager): State<SessionManager>,
    cookies: Cookies,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> ApiResult {
    let token = session_token(&cookies)?;
    let request = body(payload);
    let auto_assigned = request.id.as_ref().is_none_or(|id| id.is_null());
    let command = ItemCommand::try_from(request)?;
    let item = manager.apply(&token, command).await?;
    match item {
        Some(item) if auto_assigned => {
            Ok(Json(StatusResponse::assigned(item.id)).into_response())
        }
        _ => Ok(acknowledged()),
    }
}

/// Handler for PUT /item
pub(crate) async fn update_item(
    State(manager): State<SessionManager>,
    cookies: Cookies,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> ApiResult {
    let token = session_token(&cookies)?;
    let command = ItemCommand::try_from(body(payload))?;
    manager.apply(&token, command).await?;
    Ok(acknowledged())
}

/// Handler for DELETE /item
pub(crate) async fn delete_item(
    State(manager): State<SessionManager>,
    cookies: Cookies,
    payload: Result<Json<RemoveItemRequest>, JsonRejection>,
) -> ApiResult {
    let token = session_token(&cookies)?;
    let command = ItemCommand::try_from(body(payload))?;
    manager.apply(&token, command).await?;
    Ok(acknowledged())
}

// ============================================================================
// Health Handler
// ============================================================================

/// Handler for GET /health
pub(crate) async fn health(State(manager): State<SessionManager>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        users: manager.user_count().await,
        sessions: manager.session_count().await,
    })
}
