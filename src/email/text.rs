//! Plain-text email bodies

use super::{product_rows, received_at, Branding, Recipient, NO_PRODUCTS, NO_REMARKS};
use crate::order::OrderSubmission;
use std::fmt::Write;

pub(super) fn render(order: &OrderSubmission, recipient: Recipient, branding: &Branding) -> String {
    match recipient {
        Recipient::Business => business(order, branding),
        Recipient::Customer => customer(order, branding),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

fn products(out: &mut String, order: &OrderSubmission, recipient: Recipient) {
    if order.items.is_empty() {
        let _ = writeln!(out, "{}", NO_PRODUCTS);
        return;
    }
    for (index, product) in order.items.iter().enumerate() {
        let _ = writeln!(out, "Product {}", index + 1);
        for row in product_rows(product, recipient) {
            let _ = writeln!(out, "  {}: {}", row.label, row.value);
        }
        out.push('\n');
    }
}

fn business(order: &OrderSubmission, branding: &Branding) -> String {
    let contact = &order.contact;
    let mut out = String::new();

    heading(&mut out, "NEW ORDER REQUEST - WINDOW CONFIGURATOR");
    let _ = writeln!(out, "Reference: {}", order.reference);
    let _ = writeln!(out, "Received: {}", received_at(order));
    out.push('\n');

    heading(&mut out, "CONTACT DETAILS");
    let _ = writeln!(out, "Name: {}", contact.full_name());
    let _ = writeln!(out, "Email: {}", contact.email);
    let _ = writeln!(out, "Phone: {}", contact.phone);
    out.push('\n');

    heading(&mut out, "ADDRESS");
    let _ = writeln!(out, "Street: {} {}", contact.street, contact.house_number);
    let _ = writeln!(out, "Postcode: {}", contact.postcode);
    let _ = writeln!(out, "Place: {}", contact.place);
    let _ = writeln!(out, "Country: {}", order.country());
    out.push('\n');

    heading(&mut out, "SELECTED PRODUCTS");
    products(&mut out, order, Recipient::Business);
    out.push('\n');

    heading(&mut out, "REMARKS");
    let _ = writeln!(out, "{}", contact.remarks_text().unwrap_or(NO_REMARKS));
    out.push('\n');

    let _ = writeln!(out, "---");
    let _ = writeln!(
        out,
        "This message was generated automatically by the {} configurator.",
        branding.company_name
    );
    out
}

fn customer(order: &OrderSubmission, branding: &Branding) -> String {
    let contact = &order.contact;
    let mut out = String::new();

    let _ = writeln!(out, "Dear {},", contact.first_name);
    out.push('\n');
    let _ = writeln!(
        out,
        "Thank you for configuring your window frames with {}.",
        branding.company_name
    );
    let _ = writeln!(
        out,
        "We have received your request (reference {}). Below is an overview of your choices.",
        order.reference
    );
    out.push('\n');

    heading(&mut out, "YOUR CONFIGURATION");
    products(&mut out, order, Recipient::Customer);
    out.push('\n');

    if let Some(remarks) = contact.remarks_text() {
        heading(&mut out, "YOUR REMARKS");
        let _ = writeln!(out, "{}", remarks);
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "We will contact you personally within 24 to 48 hours to discuss your request and the next steps."
    );
    let _ = writeln!(
        out,
        "Any further questions or wishes in the meantime? Simply reply to this email."
    );
    out.push('\n');
    let _ = writeln!(out, "Kind regards,");
    let _ = writeln!(out, "{}", branding.company_name);
    let _ = writeln!(out, "{}", branding.email);
    let _ = writeln!(out, "{}", branding.phone);
    let _ = writeln!(out, "{}", branding.website);
    out
}
