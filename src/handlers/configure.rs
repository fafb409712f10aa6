//! Configuration session handlers
//!
//! A shopper has at most one configuration in progress. Starting a new one
//! replaces whatever was staged before.

use super::{extract_session_token, reply, ApiError, ApiReply, AppState};
use crate::cart::CartError;
use crate::catalog::find_archetype;
use crate::models::{CartResponse, ConfiguredProduct, StartConfigurationRequest};
use crate::session::{
    CommitOutcome, ConfigurationSession, DraftUpdate, SessionError, SessionView,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub outcome: CommitOutcome,
    pub product: ConfiguredProduct,
    pub cart: CartResponse,
}

fn no_configuration() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "No configuration in progress")
}

/// Start configuring an archetype, or reopen a cart line for editing
pub async fn start_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<StartConfigurationRequest>,
) -> ApiReply<SessionView> {
    let token = extract_session_token(&headers);

    let Some(archetype) = find_archetype(input.archetype_id) else {
        return reply(
            &state,
            None,
            StatusCode::NOT_FOUND,
            Err(SessionError::UnknownArchetype(input.archetype_id).into()),
        );
    };

    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| -> Result<SessionView, ApiError> {
            let existing = match input.product_id {
                Some(id) => Some(shopper.cart.get(id).ok_or(CartError::NotFound(id))?),
                None => None,
            };
            let session = ConfigurationSession::start(archetype, existing)?;
            let view = session.view();
            if shopper.configuring.replace(session).is_some() {
                tracing::debug!("Discarded previous configuration in progress");
            }
            Ok(view)
        })
        .await;

    reply(&state, access.new_token, StatusCode::CREATED, access.value)
}

pub async fn get_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiReply<SessionView> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| {
            shopper
                .configuring
                .as_ref()
                .map(ConfigurationSession::view)
                .ok_or_else(no_configuration)
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

/// Stage a partial edit of the current draft
pub async fn update_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<DraftUpdate>,
) -> ApiReply<SessionView> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| -> Result<SessionView, ApiError> {
            let session = shopper.configuring.as_mut().ok_or_else(no_configuration)?;
            session.apply(update)?;
            Ok(session.view())
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

/// Abort the current configuration; the cart is left untouched
pub async fn cancel_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiReply<()> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| {
            shopper
                .configuring
                .take()
                .map(|_| ())
                .ok_or_else(no_configuration)
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

/// Confirm the draft and write it into the cart.
///
/// On failure the configuration stays open so the shopper can correct it.
pub async fn confirm_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiReply<CommitResponse> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| -> Result<CommitResponse, ApiError> {
            let session = shopper.configuring.take().ok_or_else(no_configuration)?;
            match session.clone().commit(&mut shopper.cart) {
                Ok((outcome, product)) => Ok(CommitResponse {
                    outcome,
                    product,
                    cart: CartResponse::from_cart(&shopper.cart),
                }),
                Err(e) => {
                    shopper.configuring = Some(session);
                    Err(e.into())
                }
            }
        })
        .await;

    let status = match access.value {
        Ok(CommitResponse {
            outcome: CommitOutcome::Added,
            ..
        }) => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    reply(&state, access.new_token, status, access.value)
}
