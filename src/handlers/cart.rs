//! Cart overview handlers

use super::{extract_session_token, reply, ApiError, ApiReply, AppState};
use crate::models::{CartResponse, UpdateQuantityRequest};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

pub async fn get_cart(State(state): State<AppState>, headers: HeaderMap) -> ApiReply<CartResponse> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| {
            Ok::<_, ApiError>(CartResponse::from_cart(&shopper.cart))
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

pub async fn update_cart_quantity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateQuantityRequest>,
) -> ApiReply<CartResponse> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| -> Result<CartResponse, ApiError> {
            shopper.cart.set_quantity(id, input.quantity)?;
            Ok(CartResponse::from_cart(&shopper.cart))
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiReply<CartResponse> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| -> Result<CartResponse, ApiError> {
            let removed = shopper.cart.remove_by_id(id)?;
            tracing::debug!(product_id = %removed.id, "Removed cart line");
            Ok(CartResponse::from_cart(&shopper.cart))
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}

pub async fn clear_cart(State(state): State<AppState>, headers: HeaderMap) -> ApiReply<CartResponse> {
    let token = extract_session_token(&headers);
    let access = state
        .shoppers
        .with_session(token.as_deref(), |shopper| {
            shopper.cart.clear();
            Ok::<_, ApiError>(CartResponse::from_cart(&shopper.cart))
        })
        .await;

    reply(&state, access.new_token, StatusCode::OK, access.value)
}
