//! Order assembly and notification dispatch
//!
//! An order is accepted once the contact details and cart snapshot pass
//! validation and have been assembled. Sending the two notification emails
//! happens afterwards; a delivery failure is reported as a warning and the
//! message goes to the retry outbox, it never turns an accepted order into a
//! failed one.

mod legacy;

pub use legacy::LegacyCartItem;

use crate::email::{self, Branding, Recipient};
use crate::mailer::{DeliveryReport, DeliveryStatus, Mailer, OutgoingEmail, Outbox};
use crate::models::{ConfiguredProduct, ContactFields};
use crate::validation::{validate_cart_not_empty, validate_contact, validate_product, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Settings the order flow needs from the application configuration
#[derive(Debug, Clone)]
pub struct OrderSettings {
    /// Used when the shopper leaves the country blank
    pub default_country: String,
    /// Where business notifications are sent
    pub business_email: String,
    pub branding: Branding,
}

/// Contact details plus the cart as it was at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub reference: String,
    pub received_at: DateTime<Utc>,
    pub contact: ContactFields,
    pub items: Vec<ConfiguredProduct>,
}

impl OrderSubmission {
    pub fn country(&self) -> &str {
        self.contact.country.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub reference: String,
    pub item_count: usize,
    pub delivery: DeliveryReport,
    pub warnings: Vec<String>,
}

/// Human-readable order reference, e.g. `KC-20261016-3f2a1`
pub fn generate_reference(now: DateTime<Utc>) -> String {
    format!(
        "KC-{}-{}",
        now.format("%Y%m%d"),
        &Uuid::new_v4().simple().to_string()[..5]
    )
}

/// Validate the checkout input and combine it with the cart snapshot.
///
/// Nothing is sent when this fails.
pub fn assemble_order(
    mut contact: ContactFields,
    items: Vec<ConfiguredProduct>,
    settings: &OrderSettings,
) -> Result<OrderSubmission, ValidationError> {
    validate_contact(&contact)?;
    validate_cart_not_empty(&items)?;
    for item in &items {
        validate_product(item)?;
    }

    let country_missing = contact
        .country
        .as_deref()
        .map_or(true, |c| c.trim().is_empty());
    if country_missing {
        contact.country = Some(settings.default_country.clone());
    }

    let received_at = Utc::now();
    Ok(OrderSubmission {
        reference: generate_reference(received_at),
        received_at,
        contact,
        items,
    })
}

/// Render and send both notifications.
///
/// The business notification goes out first and replies to it reach the
/// customer; the confirmation replies to the business. Each message is sent
/// independently so one failure does not hold back the other.
pub async fn deliver_order(
    order: &OrderSubmission,
    settings: &OrderSettings,
    mailer: &dyn Mailer,
    outbox: &Outbox,
) -> DeliveryReport {
    let business = email::render(order, Recipient::Business, &settings.branding);
    let customer = email::render(order, Recipient::Customer, &settings.branding);

    let business = OutgoingEmail {
        to: settings.business_email.clone(),
        reply_to: Some(order.contact.email.trim().to_string()),
        subject: business.subject,
        text: business.text,
        html: business.html,
    };
    let customer = OutgoingEmail {
        to: order.contact.email.trim().to_string(),
        reply_to: Some(settings.business_email.clone()),
        subject: customer.subject,
        text: customer.text,
        html: customer.html,
    };

    DeliveryReport {
        business: send_or_queue(&order.reference, Recipient::Business, business, mailer, outbox).await,
        customer: send_or_queue(&order.reference, Recipient::Customer, customer, mailer, outbox).await,
    }
}

async fn send_or_queue(
    reference: &str,
    recipient: Recipient,
    message: OutgoingEmail,
    mailer: &dyn Mailer,
    outbox: &Outbox,
) -> DeliveryStatus {
    match mailer.send(&message).await {
        Ok(message_id) => {
            tracing::info!(reference, ?recipient, %message_id, "Order notification sent");
            DeliveryStatus::Sent { message_id }
        }
        Err(e) => {
            tracing::error!(reference, ?recipient, "Order notification failed: {}", e);
            let error = e.to_string();
            outbox.enqueue(message, error.clone()).await;
            DeliveryStatus::Queued { error }
        }
    }
}

pub fn receipt(order: &OrderSubmission, delivery: DeliveryReport) -> OrderReceipt {
    OrderReceipt {
        reference: order.reference.clone(),
        item_count: order.items.len(),
        warnings: delivery.warnings(),
        delivery,
    }
}

/// Receipt for an accepted order whose delivery stopped without a report
pub fn interrupted_receipt(reference: String, item_count: usize) -> OrderReceipt {
    let delivery = DeliveryReport::uniform(DeliveryStatus::Unconfirmed {
        error: "delivery was interrupted".to_string(),
    });
    OrderReceipt {
        reference,
        item_count,
        warnings: delivery.warnings(),
        delivery,
    }
}

// =============================================================================
// Untyped payloads
// =============================================================================

/// Order payload posted by clients that send contact fields and cart items
/// in one flat object
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(flatten)]
    pub contact: ContactFields,
    #[serde(default)]
    pub cart_items: Value,
}

/// Decode `cartItems`, which may arrive as a JSON list or as a string
/// holding a JSON-encoded list. Lines carrying a `productId` use the older
/// front-end's shape; other lines are [`ConfiguredProduct`]s.
pub fn decode_cart_items(value: Value) -> Result<Vec<ConfiguredProduct>, ValidationError> {
    let entries: Vec<Value> = match value {
        Value::Null => Vec::new(),
        Value::Array(entries) => entries,
        Value::String(encoded) if encoded.trim().is_empty() => Vec::new(),
        Value::String(encoded) => serde_json::from_str(&encoded).map_err(malformed)?,
        other => {
            return Err(ValidationError::MalformedCartItems(format!(
                "expected a list, got {}",
                json_kind(&other)
            )))
        }
    };

    let items = entries
        .into_iter()
        .map(decode_cart_item)
        .collect::<Result<Vec<_>, _>>()?;
    for item in &items {
        validate_product(item)?;
    }
    Ok(items)
}

fn decode_cart_item(entry: Value) -> Result<ConfiguredProduct, ValidationError> {
    if entry.get("productId").is_some() {
        serde_json::from_value::<LegacyCartItem>(entry)
            .map_err(malformed)?
            .into_product()
    } else {
        serde_json::from_value(entry).map_err(malformed)
    }
}

fn malformed(e: serde_json::Error) -> ValidationError {
    ValidationError::MalformedCartItems(e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
