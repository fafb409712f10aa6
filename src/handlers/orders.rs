//! Order submission handlers

use super::{extract_session_token, reply, ApiError, ApiReply};
use crate::mailer::{Mailer, Outbox};
use crate::models::ContactFields;
use crate::order::{
    assemble_order, decode_cart_items, deliver_order, interrupted_receipt, receipt, OrderPayload,
    OrderReceipt, OrderSettings, OrderSubmission,
};
use crate::store::{ShopperSession, ShopperStore};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub shoppers: Arc<ShopperStore>,
    pub mailer: Arc<dyn Mailer>,
    pub outbox: Arc<Outbox>,
    pub orders: Arc<OrderSettings>,
    pub is_production: bool,
    /// False when mail is only logged
    pub smtp_configured: bool,
}

// =============================================================================
// Order Endpoints
// =============================================================================

/// Validate the checkout form against the session cart, then clear the cart
/// and mark the session as submitting.
fn stage_order(
    shopper: &mut ShopperSession,
    contact: ContactFields,
    settings: &OrderSettings,
) -> Result<OrderSubmission, ApiError> {
    if shopper.submitting {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Your order is already being submitted",
        ));
    }
    let order = assemble_order(contact, shopper.cart.snapshot(), settings)?;
    shopper.cart.clear();
    shopper.submitting = true;
    Ok(order)
}

/// Submit the session cart as an order
pub async fn submit_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(contact): Json<ContactFields>,
) -> ApiReply<OrderReceipt> {
    let token = extract_session_token(&headers);

    let staged = match token.as_deref() {
        Some(token) => {
            state
                .shoppers
                .with_existing(token, |shopper| {
                    stage_order(shopper, contact.clone(), &state.orders)
                })
                .await
        }
        None => None,
    };
    // Without a live session the cart is empty; assembling still reports
    // contact problems before the empty cart
    let staged = staged.unwrap_or_else(|| {
        assemble_order(contact, Vec::new(), &state.orders).map_err(ApiError::from)
    });

    let order = match staged {
        Ok(order) => order,
        Err(e) => {
            tracing::info!("Order rejected: {}", e.message);
            return reply(&state, None, e.status, Err(e));
        }
    };

    tracing::info!(
        reference = %order.reference,
        items = order.items.len(),
        "Order accepted"
    );

    // Delivery runs in its own task so the submitting flag is released even
    // when the client disconnects mid-request. Sending is nested one level
    // deeper so a panic while sending still reaches the flag reset.
    let reference = order.reference.clone();
    let item_count = order.items.len();
    let shoppers = state.shoppers.clone();
    let task_state = state.clone();
    let delivery = tokio::spawn(async move {
        let sending = tokio::spawn(async move {
            let report = deliver_order(
                &order,
                &task_state.orders,
                task_state.mailer.as_ref(),
                &task_state.outbox,
            )
            .await;
            receipt(&order, report)
        })
        .await;
        if let Some(token) = token {
            shoppers
                .with_existing(&token, |shopper| shopper.submitting = false)
                .await;
        }
        sending
    })
    .await;

    let receipt = match delivery {
        Ok(Ok(receipt)) => receipt,
        Ok(Err(e)) | Err(e) => {
            tracing::error!(%reference, "Order delivery task failed: {}", e);
            interrupted_receipt(reference, item_count)
        }
    };
    reply(&state, None, StatusCode::OK, Ok(receipt))
}

/// Stateless order submission with the cart in the request body
pub async fn send_order_email(
    State(state): State<AppState>,
    Json(payload): Json<OrderPayload>,
) -> ApiReply<OrderReceipt> {
    let assembled = decode_cart_items(payload.cart_items)
        .and_then(|items| assemble_order(payload.contact, items, &state.orders));

    let order = match assembled {
        Ok(order) => order,
        Err(e) => {
            tracing::info!("Order email request rejected: {}", e);
            return reply(&state, None, StatusCode::BAD_REQUEST, Err(e.into()));
        }
    };

    tracing::info!(
        reference = %order.reference,
        items = order.items.len(),
        "Order accepted"
    );
    let report = deliver_order(&order, &state.orders, state.mailer.as_ref(), &state.outbox).await;
    reply(&state, None, StatusCode::OK, Ok(receipt(&order, report)))
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub mailer: &'static str,
    pub pending_emails: usize,
}

pub async fn health(State(state): State<AppState>) -> ApiReply<HealthResponse> {
    let health = HealthResponse {
        status: "ok",
        mailer: if state.smtp_configured { "smtp" } else { "log" },
        pending_emails: state.outbox.len().await,
    };
    reply(&state, None, StatusCode::OK, Ok(health))
}
