//! HTTP request handlers

pub mod cart;
pub mod catalog;
pub mod configure;
pub mod middleware;
pub mod orders;

pub use cart::*;
pub use catalog::*;
pub use configure::*;
pub use orders::*;

use crate::cart::CartError;
use crate::models::ApiResponse;
use crate::session::SessionError;
use crate::validation::ValidationError;
use axum::{
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::AppendHeaders,
    routing::{delete, get, post, put},
    Json, Router,
};

/// Cookie carrying the shopper session token
pub const SESSION_COOKIE: &str = "kc_cart_session";

/// Status, an optional `Set-Cookie` for a freshly created shopper session,
/// and the JSON envelope
pub type ApiReply<T> = (
    StatusCode,
    AppendHeaders<Option<(HeaderName, String)>>,
    Json<ApiResponse<T>>,
);

/// Routes under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Catalog
        .route("/catalog/archetypes", get(list_archetypes))
        .route("/catalog/colors", get(list_colors))
        // Configuration session
        .route("/configurations", post(start_configuration))
        .route(
            "/configurations/current",
            get(get_configuration)
                .put(update_configuration)
                .delete(cancel_configuration),
        )
        .route(
            "/configurations/current/confirm",
            post(confirm_configuration),
        )
        // Cart
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/:id", delete(remove_cart_item))
        .route("/cart/:id/quantity", put(update_cart_quantity))
        // Orders
        .route("/orders", post(submit_order))
        .route("/send-order-email", post(send_order_email))
}

// =============================================================================
// Errors
// =============================================================================

/// A failed request: the status to answer with and a message for the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Blank checkout fields, reported by name next to the message
    pub missing_fields: Option<Vec<String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            missing_fields: None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        let missing_fields = match &e {
            ValidationError::MissingFields { fields } => Some(fields.clone()),
            ValidationError::Required { field } => Some(vec![field.clone()]),
            _ => None,
        };
        Self {
            missing_fields,
            ..Self::new(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        let status = match e {
            CartError::NotFound(_) => StatusCode::NOT_FOUND,
            CartError::DuplicateId(_) => StatusCode::CONFLICT,
            CartError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Cart(e) => e.into(),
            SessionError::Validation(e) => e.into(),
            SessionError::NotApplicable { .. } => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            SessionError::ArchetypeMismatch { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
            SessionError::UnknownArchetype(_) => Self::new(StatusCode::NOT_FOUND, e.to_string()),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
            return Some(value.to_string());
        }
    }

    None
}

fn session_cookie(state: &AppState, token: &str) -> String {
    let secure_flag = if state.is_production { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        state.shoppers.expiry_secs(),
        secure_flag
    )
}

/// Build the reply for a handler result, attaching a cookie when a new
/// shopper session was created
pub fn reply<T>(
    state: &AppState,
    new_token: Option<String>,
    status: StatusCode,
    result: Result<T, ApiError>,
) -> ApiReply<T> {
    let cookie = new_token.map(|token| (header::SET_COOKIE, session_cookie(state, &token)));
    match result {
        Ok(data) => (status, AppendHeaders(cookie), Json(ApiResponse::success(data))),
        Err(e) => (
            e.status,
            AppendHeaders(cookie),
            Json(ApiResponse::error(e.message).with_missing_fields(e.missing_fields)),
        ),
    }
}
