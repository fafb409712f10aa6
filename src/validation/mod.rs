//! Input validation module

use crate::models::{ConfiguredProduct, ContactFields};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Allowed frame width in millimetres
pub const WIDTH_RANGE_MM: RangeInclusive<u32> = 400..=6000;
/// Allowed frame height in millimetres
pub const HEIGHT_RANGE_MM: RangeInclusive<u32> = 400..=3000;

/// Largest quantity accepted for one cart line
pub const MAX_QUANTITY: u32 = 999;

const MAX_FIELD_LEN: usize = 255;
const MAX_REMARKS_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Required fields missing: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Field '{field}' is too long (max {max} characters)")]
    TooLong { field: String, max: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{field} must be between {min} and {max} mm (got {value})")]
    OutOfRange {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Quantity must be between 1 and 999 (got {0})")]
    InvalidQuantity(u32),

    #[error("Add at least one product to your cart before submitting")]
    EmptyCart,

    #[error("Invalid product in cart: {0}")]
    InvalidProduct(String),

    #[error("Cart items could not be read: {0}")]
    MalformedCartItems(String),
}

/// Checkout fields that must be non-blank, in the order they are reported
const REQUIRED_CONTACT_FIELDS: [&str; 8] = [
    "email",
    "firstName",
    "lastName",
    "street",
    "houseNumber",
    "postcode",
    "place",
    "phone",
];

fn contact_field<'a>(input: &'a ContactFields, field: &str) -> &'a str {
    match field {
        "email" => &input.email,
        "firstName" => &input.first_name,
        "lastName" => &input.last_name,
        "street" => &input.street,
        "houseNumber" => &input.house_number,
        "postcode" => &input.postcode,
        "place" => &input.place,
        "phone" => &input.phone,
        _ => "",
    }
}

/// Validate checkout contact details.
///
/// Every blank required field is reported at once so the shopper can fix
/// the form in one pass.
pub fn validate_contact(input: &ContactFields) -> Result<(), ValidationError> {
    let missing: Vec<String> = REQUIRED_CONTACT_FIELDS
        .iter()
        .filter(|field| contact_field(input, field).trim().is_empty())
        .map(|field| field.to_string())
        .collect();

    match missing.len() {
        0 => {}
        1 => {
            return Err(ValidationError::Required {
                field: missing[0].clone(),
            })
        }
        _ => return Err(ValidationError::MissingFields { fields: missing }),
    }

    for field in REQUIRED_CONTACT_FIELDS {
        if contact_field(input, field).len() > MAX_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_FIELD_LEN,
            });
        }
    }

    if let Some(ref country) = input.country {
        if country.len() > MAX_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: "country".to_string(),
                max: MAX_FIELD_LEN,
            });
        }
    }

    if let Some(ref remarks) = input.remarks {
        if remarks.len() > MAX_REMARKS_LEN {
            return Err(ValidationError::TooLong {
                field: "remarks".to_string(),
                max: MAX_REMARKS_LEN,
            });
        }
    }

    if !validator::validate_email(input.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate frame geometry against the archetype-independent bounds
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), ValidationError> {
    check_range("width", width, &WIDTH_RANGE_MM)?;
    check_range("height", height, &HEIGHT_RANGE_MM)
}

fn check_range(field: &str, value: u32, range: &RangeInclusive<u32>) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

pub fn validate_quantity(quantity: u32) -> Result<(), ValidationError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(ValidationError::InvalidQuantity(quantity));
    }
    Ok(())
}

pub fn validate_cart_not_empty(items: &[ConfiguredProduct]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Check a product received from outside the process.
///
/// Products committed through a configuration session already satisfy
/// these rules; this guards payloads decoded at the HTTP boundary.
pub fn validate_product(product: &ConfiguredProduct) -> Result<(), ValidationError> {
    validate_dimensions(product.width, product.height)?;
    validate_quantity(product.quantity)?;

    if product.has_fixed_part() != product.outside_fixed_color.is_some() {
        return Err(ValidationError::InvalidProduct(format!(
            "product {} has {} panel(s) but {} an outside fixed color",
            product.id,
            product.panel_count,
            if product.outside_fixed_color.is_some() {
                "carries"
            } else {
                "lacks"
            }
        )));
    }

    if product.is_window() != product.window.is_some() {
        return Err(ValidationError::InvalidProduct(format!(
            "window options on product {} do not match archetype class '{}'",
            product.id,
            product.archetype_class.label()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArchetypeClass, ColorChoice};
    use uuid::Uuid;

    fn valid_contact() -> ContactFields {
        ContactFields {
            email: "jan@example.com".to_string(),
            phone: "612345678".to_string(),
            first_name: "Jan".to_string(),
            last_name: "de Vries".to_string(),
            street: "Kerkstraat".to_string(),
            house_number: "12a".to_string(),
            postcode: "1234 AB".to_string(),
            place: "Utrecht".to_string(),
            country: None,
            remarks: None,
        }
    }

    fn door() -> ConfiguredProduct {
        ConfiguredProduct {
            id: Uuid::new_v4(),
            archetype_id: 41,
            archetype_name: "Front door without side or top lights".to_string(),
            archetype_class: ArchetypeClass::FrontDoor,
            layout_key: "front-door-simple".to_string(),
            panel_count: 1,
            width: 1000,
            height: 2400,
            inside_color: ColorChoice { id: "1".to_string(), name: "White smooth".to_string() },
            outside_fixed_color: None,
            outside_moving_color: ColorChoice { id: "5".to_string(), name: "Anthracite".to_string() },
            window: None,
            quantity: 1,
        }
    }

    #[test]
    fn test_validate_contact_valid() {
        assert!(validate_contact(&valid_contact()).is_ok());
    }

    #[test]
    fn test_validate_contact_blank_field() {
        let mut input = valid_contact();
        input.place = "   ".to_string();
        assert_eq!(
            validate_contact(&input),
            Err(ValidationError::Required {
                field: "place".to_string()
            })
        );
    }

    #[test]
    fn test_validate_contact_reports_all_missing_fields() {
        let mut input = valid_contact();
        input.email = String::new();
        input.house_number = " ".to_string();
        input.phone = String::new();

        match validate_contact(&input) {
            Err(ValidationError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["email", "houseNumber", "phone"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_contact_remarks_and_country_optional() {
        let mut input = valid_contact();
        input.remarks = Some(String::new());
        input.country = Some(String::new());
        assert!(validate_contact(&input).is_ok());
    }

    #[test]
    fn test_validate_contact_invalid_email() {
        let mut input = valid_contact();
        input.email = "not-an-email".to_string();
        assert_eq!(validate_contact(&input), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_contact_remarks_too_long() {
        let mut input = valid_contact();
        input.remarks = Some("x".repeat(MAX_REMARKS_LEN + 1));
        assert!(matches!(
            validate_contact(&input),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_dimensions_bounds() {
        assert!(validate_dimensions(400, 400).is_ok());
        assert!(validate_dimensions(6000, 3000).is_ok());
        assert!(matches!(
            validate_dimensions(399, 800),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "width"
        ));
        assert!(matches!(
            validate_dimensions(1200, 3001),
            Err(ValidationError::OutOfRange { ref field, max: 3000, .. }) if field == "height"
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(validate_quantity(0), Err(ValidationError::InvalidQuantity(0)));
        assert_eq!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::InvalidQuantity(MAX_QUANTITY + 1))
        );
        assert_eq!(
            validate_quantity(u32::MAX).unwrap_err().to_string(),
            format!("Quantity must be between 1 and 999 (got {})", u32::MAX)
        );
    }

    #[test]
    fn test_validate_cart_not_empty() {
        assert_eq!(validate_cart_not_empty(&[]), Err(ValidationError::EmptyCart));
        assert!(validate_cart_not_empty(&[door()]).is_ok());
    }

    #[test]
    fn test_validate_product_field_presence() {
        assert!(validate_product(&door()).is_ok());

        let mut stray_fixed = door();
        stray_fixed.outside_fixed_color = Some(stray_fixed.inside_color.clone());
        assert!(matches!(
            validate_product(&stray_fixed),
            Err(ValidationError::InvalidProduct(_))
        ));

        let mut missing_window = door();
        missing_window.archetype_class = ArchetypeClass::Window;
        assert!(matches!(
            validate_product(&missing_window),
            Err(ValidationError::InvalidProduct(_))
        ));
    }
}
