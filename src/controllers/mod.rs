//! HTTP edge: routing, token extraction and request bodies.

pub mod blog;
pub mod music;
pub mod user;

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::map_response_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::auth::{Claims, TokenService};
use crate::error::{AppError, InternalDetail};
use crate::presenters::MessageView;

pub use blog::BlogController;
pub use music::MusicController;
pub use user::UserController;

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub user: Arc<UserController>,
    pub music: Arc<MusicController>,
    pub blog: Arc<BlogController>,
    pub tokens: Arc<TokenService>,
    /// Whether 500 responses carry their cause.
    pub expose_internal_errors: bool,
}

impl AppState {
    pub fn with_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }
}

/// Identity of a request carrying a valid token, taken from
/// `Authorization: Bearer <token>` or the legacy `x-auth-token` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

fn bearer(parts: &Parts) -> Option<&str> {
    if let Some(v) = parts.headers.get(header::AUTHORIZATION) {
        return v
            .to_str()
            .ok()
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim);
    }

    parts
        .headers
        .get("x-auth-token")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;

        let claims = state.tokens.verify(token)?;
        tracing::trace!(user_id = %claims.sub, "authenticated");

        Ok(AuthUser(claims))
    }
}

/// Path ids that are not UUIDs cannot name anything, so they read as missing.
pub(crate) fn parse_id<T: FromStr>(raw: &str, missing: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError::NotFound(missing.to_string()))
}

async fn reveal_internal(State(state): State<AppState>, resp: Response) -> Response {
    match resp.extensions().get::<InternalDetail>() {
        Some(detail) if state.expose_internal_errors => AppError::detailed_internal(detail),
        _ => resp,
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(MessageView::new("Route not found")))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(user::register))
        .route("/auth/login", post(user::login))
        .route("/auth/me", get(user::me))
        .route("/music", get(music::list).post(music::add))
        .route("/music/trending", get(music::trending))
        .route("/music/language/:language", get(music::by_language))
        .route("/music/:id/like", post(music::like))
        .route("/music/:id/play", post(music::play))
        .route("/blog", get(blog::list).post(blog::create))
        .route("/blog/:id", get(blog::get).delete(blog::delete))
        .route("/blog/:id/like", post(blog::like))
        .route("/blog/:id/comment", post(blog::comment));

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { "OK" }))
        .fallback(not_found)
        .layer(map_response_with_state(state.clone(), reveal_internal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
