//! HTML email bodies
//!
//! Every interpolated value goes through [`escape`]; remarks additionally
//! keep their line breaks.

use super::{product_rows, received_at, Branding, Recipient, NO_PRODUCTS, NO_REMARKS};
use crate::order::OrderSubmission;
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; color: #333; background: #f9f9f9; margin: 0; padding: 0; }
.container { max-width: 700px; margin: 20px auto; background: white; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.header { background: linear-gradient(135deg, #8B7355 0%, #A0826D 100%); padding: 30px 20px; text-align: center; border-bottom: 3px solid #B59871; color: white; }
.header h1 { margin: 0; font-size: 24px; }
.content { padding: 30px 20px; }
.section { margin: 25px 0; }
.section-title { font-weight: bold; font-size: 16px; margin: 15px 0 12px 0; padding-bottom: 8px; border-bottom: 2px solid #B59871; }
.product { margin-bottom: 20px; padding: 15px; border-left: 4px solid #B59871; background: #f9f9f9; }
.product strong.title { display: block; margin-bottom: 12px; color: #B59871; }
table { width: 100%; border-collapse: collapse; }
td { padding: 8px; border-bottom: 1px solid #eee; text-align: left; }
.remarks { background: #f9f9f9; padding: 12px; border-left: 4px solid #B59871; }
.footer { background: #f5f5f5; padding: 20px; text-align: center; font-size: 12px; color: #666; }";

/// Escape text for use in HTML element content and attribute values
pub(super) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn multiline(input: &str) -> String {
    escape(input).replace("\r\n", "\n").replace('\n', "<br>")
}

pub(super) fn render(order: &OrderSubmission, recipient: Recipient, branding: &Branding) -> String {
    let (title, body) = match recipient {
        Recipient::Business => ("New Configurator Request", business(order)),
        Recipient::Customer => ("Confirmation of your request", customer(order, branding)),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{style}\n</style>\n</head>\n\
         <body>\n<div class=\"container\">\n<div class=\"header\">\n<h1>{title}</h1>\n<p>{company}</p>\n</div>\n\
         <div class=\"content\">\n{body}</div>\n{footer}</div>\n</body>\n</html>\n",
        style = STYLE,
        title = title,
        company = escape(&branding.company_name),
        body = body,
        footer = footer(order, recipient, branding),
    )
}

fn section(out: &mut String, title: &str, content: &str) {
    let _ = write!(
        out,
        "<div class=\"section\">\n<div class=\"section-title\">{}</div>\n{}</div>\n",
        escape(title),
        content
    );
}

fn info_table(rows: &[(&str, String)]) -> String {
    let mut out = String::from("<table>\n");
    for (label, value) in rows {
        let _ = writeln!(
            out,
            "<tr><td><strong>{}:</strong></td><td>{}</td></tr>",
            escape(label),
            value
        );
    }
    out.push_str("</table>\n");
    out
}

fn products(order: &OrderSubmission, recipient: Recipient) -> String {
    if order.items.is_empty() {
        return format!("<p>{}</p>\n", NO_PRODUCTS);
    }

    let mut out = String::new();
    for (index, product) in order.items.iter().enumerate() {
        let rows: Vec<(&str, String)> = product_rows(product, recipient)
            .into_iter()
            .map(|row| (row.label, escape(&row.value)))
            .collect();
        let _ = write!(
            out,
            "<div class=\"product\">\n<strong class=\"title\">Product {}</strong>\n{}</div>\n",
            index + 1,
            info_table(&rows)
        );
    }
    out
}

fn business(order: &OrderSubmission) -> String {
    let contact = &order.contact;
    let email = escape(&contact.email);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<p><strong>Reference:</strong> {} &middot; <strong>Received:</strong> {}</p>",
        escape(&order.reference),
        received_at(order)
    );

    section(
        &mut out,
        "Customer details",
        &info_table(&[
            ("Name", escape(&contact.full_name())),
            ("Email", format!("<a href=\"mailto:{0}\">{0}</a>", email)),
            ("Phone", escape(&contact.phone)),
        ]),
    );
    section(
        &mut out,
        "Address",
        &info_table(&[
            (
                "Street",
                escape(&format!("{} {}", contact.street, contact.house_number)),
            ),
            ("Postcode", escape(&contact.postcode)),
            ("Place", escape(&contact.place)),
            ("Country", escape(order.country())),
        ]),
    );
    section(&mut out, "Selected products", &products(order, Recipient::Business));

    let remarks = match contact.remarks_text() {
        Some(remarks) => multiline(remarks),
        None => format!("<em>{}</em>", NO_REMARKS),
    };
    section(
        &mut out,
        "Remarks",
        &format!("<div class=\"remarks\">{}</div>\n", remarks),
    );
    out
}

fn customer(order: &OrderSubmission, branding: &Branding) -> String {
    let contact = &order.contact;
    let mut out = String::new();

    let _ = writeln!(out, "<p>Dear {},</p>", escape(&contact.first_name));
    let _ = writeln!(
        out,
        "<p>Thank you for configuring your window frames with {}.</p>",
        escape(&branding.company_name)
    );
    let _ = writeln!(
        out,
        "<p><strong>We have received your request</strong> (reference {}). Below is an overview of your choices.</p>",
        escape(&order.reference)
    );

    section(&mut out, "Your configuration", &products(order, Recipient::Customer));

    if let Some(remarks) = contact.remarks_text() {
        section(
            &mut out,
            "Your remarks",
            &format!("<div class=\"remarks\">{}</div>\n", multiline(remarks)),
        );
    }

    let _ = writeln!(
        out,
        "<p>We will contact you personally within 24 to 48 hours to discuss your request and the next steps.</p>"
    );
    let _ = writeln!(
        out,
        "<p>Any further questions or wishes in the meantime? Simply reply to this email.</p>"
    );
    let _ = writeln!(
        out,
        "<p><strong>Kind regards,</strong><br>{}<br>{}<br>{}<br>{}</p>",
        escape(&branding.company_name),
        escape(&branding.email),
        escape(&branding.phone),
        escape(&branding.website)
    );
    out
}

fn footer(order: &OrderSubmission, recipient: Recipient, branding: &Branding) -> String {
    let line = match recipient {
        Recipient::Business => format!(
            "This message was generated automatically by the {} configurator.",
            escape(&branding.company_name)
        ),
        Recipient::Customer => {
            "This is an automatically generated confirmation. Reply to this email with any questions."
                .to_string()
        }
    };
    format!(
        "<div class=\"footer\">\n<p>{}</p>\n<p>{}</p>\n</div>\n",
        line,
        received_at(order)
    )
}
