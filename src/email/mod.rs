//! Order notification rendering
//!
//! One renderer serves both recipients. The business notification lists
//! every resolved field of every product; the customer confirmation shows a
//! friendlier subset. Rendering is pure: the same order always produces the
//! same documents.

mod html;
mod text;

use crate::models::ConfiguredProduct;
use crate::order::OrderSubmission;
use serde::Serialize;

/// Shown for a field that applies to the product but has no value
pub const EMPTY_VALUE: &str = "-";
pub const NO_PRODUCTS: &str = "No products selected";
pub const NO_REMARKS: &str = "No remarks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Business,
    Customer,
}

/// Company details printed in the emails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// A labelled line of product detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

impl Row {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label,
            value: if value.trim().is_empty() {
                EMPTY_VALUE.to_string()
            } else {
                value
            },
        }
    }
}

pub fn render(order: &OrderSubmission, recipient: Recipient, branding: &Branding) -> RenderedEmail {
    RenderedEmail {
        subject: subject(order, recipient, branding),
        text: text::render(order, recipient, branding),
        html: html::render(order, recipient, branding),
    }
}

fn subject(order: &OrderSubmission, recipient: Recipient, branding: &Branding) -> String {
    match recipient {
        Recipient::Business => format!(
            "New configurator request {} - {}",
            order.reference,
            order.contact.full_name()
        ),
        Recipient::Customer => format!(
            "Confirmation of your window frame request - {}",
            branding.company_name
        ),
    }
}

/// Detail rows for one product.
///
/// Rows for fields that do not apply to the archetype are never produced;
/// which ones apply follows from the archetype class and panel count.
pub fn product_rows(product: &ConfiguredProduct, recipient: Recipient) -> Vec<Row> {
    let mut rows = vec![Row::new("Product type", product.archetype_name.as_str())];

    match recipient {
        Recipient::Business => {
            rows.push(Row::new("Type", product.archetype_class.label()));
            rows.push(Row::new("Configuration", product.layout_key.as_str()));
            rows.push(Row::new("Panels", product.panel_count.to_string()));
            rows.push(Row::new("Width", format!("{} mm", product.width)));
            rows.push(Row::new("Height", format!("{} mm", product.height)));
        }
        Recipient::Customer => {
            rows.push(Row::new(
                "Dimensions",
                format!("{} x {} mm", product.width, product.height),
            ));
        }
    }

    rows.push(Row::new("Inside color", product.inside_color.name.as_str()));
    if product.has_fixed_part() {
        let name = product
            .outside_fixed_color
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or_default();
        rows.push(Row::new("Outside color (fixed part)", name));
    }
    rows.push(Row::new(
        "Outside color (moving parts)",
        product.outside_moving_color.name.as_str(),
    ));

    if product.is_window() {
        if let Some(ref window) = product.window {
            let glass_label = match recipient {
                Recipient::Business => "Glass type",
                Recipient::Customer => "Glazing",
            };
            rows.push(Row::new(glass_label, window.glass_type_name.as_str()));
            rows.push(Row::new("Glass finish", window.glass_finish_name.as_str()));
            rows.push(Row::new("Opening direction", window.opening_direction.label()));
            rows.push(Row::new("Insect screens", window.screen_count.label()));
        }
    }

    rows.push(Row::new("Quantity", product.quantity.max(1).to_string()));
    rows
}

/// Timestamp format used in both email variants
fn received_at(order: &OrderSubmission) -> String {
    order.received_at.format("%d-%m-%Y %H:%M UTC").to_string()
}
