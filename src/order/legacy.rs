//! Cart lines as the older single-page front-end posts them
//!
//! That front-end keeps its cart in the browser and sends it with the order.
//! Each line names the archetype by `productId`, carries flat color ids with
//! their labels, and always includes an outside fixed color even for
//! single-panel products. The catalog decides which fields apply.

use crate::catalog::{find_archetype, resolve_color_name, Archetype, DEFAULT_COLOR_ID};
use crate::models::{
    ColorChoice, ConfiguredProduct, GlassFinish, GlassType, OpeningDirection, ScreenCount,
    WindowOptions,
};
use crate::validation::ValidationError;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyCartItem {
    /// Browser-generated, e.g. `1712345678901-0.42`
    pub id: String,
    pub product_id: u32,
    pub width: u32,
    pub height: u32,
    pub inside_color: String,
    pub inside_color_name: String,
    pub outside_fixed_color: String,
    pub outside_fixed_color_name: String,
    pub outside_moving_color: String,
    pub outside_moving_color_name: String,
    pub glass_type: Option<String>,
    pub glass_finish: Option<String>,
    pub direction: Option<String>,
    pub screens: Option<String>,
    pub quantity: Option<u32>,
}

fn invalid(message: String) -> ValidationError {
    ValidationError::InvalidProduct(message)
}

/// Catalog label when the id is known, else the label the client sent
fn color(id: &str, sent_name: &str) -> ColorChoice {
    let id = if id.trim().is_empty() { DEFAULT_COLOR_ID } else { id.trim() };
    let name = match resolve_color_name(id) {
        Ok(name) => name.to_string(),
        Err(e) => {
            tracing::warn!("{}; keeping the submitted label", e);
            sent_name.trim().to_string()
        }
    };
    ColorChoice {
        id: id.to_string(),
        name,
    }
}

/// A blank option means the front-end's default was left in place
fn option<T>(
    raw: Option<&str>,
    default: T,
    parse: fn(&str) -> Option<T>,
    kind: &str,
) -> Result<T, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(code) => parse(code).ok_or_else(|| invalid(format!("unknown {} '{}'", kind, code))),
    }
}

fn parse_direction(code: &str) -> Option<OpeningDirection> {
    match code {
        "left" => Some(OpeningDirection::Left),
        "right" => Some(OpeningDirection::Right),
        _ => None,
    }
}

fn parse_screens(code: &str) -> Option<ScreenCount> {
    match code {
        "none" | "0" => Some(ScreenCount::Zero),
        "1" => Some(ScreenCount::One),
        "2" => Some(ScreenCount::Two),
        "3" => Some(ScreenCount::Three),
        _ => None,
    }
}

impl LegacyCartItem {
    fn window_options(&self) -> Result<WindowOptions, ValidationError> {
        let glass_type = option(
            self.glass_type.as_deref(),
            GlassType::Hr,
            |s| GlassType::from_str(s).ok(),
            "glass type",
        )?;
        let glass_finish = option(
            self.glass_finish.as_deref(),
            GlassFinish::Clear,
            |s| GlassFinish::from_str(s).ok(),
            "glass finish",
        )?;
        Ok(WindowOptions {
            glass_type,
            glass_type_name: glass_type.display_name().to_string(),
            glass_finish,
            glass_finish_name: glass_finish.display_name().to_string(),
            opening_direction: option(
                self.direction.as_deref(),
                OpeningDirection::Left,
                parse_direction,
                "opening direction",
            )?,
            screen_count: option(
                self.screens.as_deref(),
                ScreenCount::Zero,
                parse_screens,
                "screen count",
            )?,
        })
    }

    /// Rebuild the line against the catalog. Fields the archetype does not
    /// have are dropped, whatever the client sent for them.
    pub fn into_product(self) -> Result<ConfiguredProduct, ValidationError> {
        let archetype: &Archetype = find_archetype(self.product_id)
            .ok_or_else(|| invalid(format!("unknown product {}", self.product_id)))?;

        let window = if archetype.is_window() {
            Some(self.window_options()?)
        } else {
            None
        };
        let outside_fixed_color = archetype
            .has_fixed_part()
            .then(|| color(&self.outside_fixed_color, &self.outside_fixed_color_name));

        Ok(ConfiguredProduct {
            // Browser ids are not UUIDs; the line gets a fresh one
            id: Uuid::parse_str(self.id.trim()).unwrap_or_else(|_| Uuid::new_v4()),
            archetype_id: archetype.id,
            archetype_name: archetype.name.to_string(),
            archetype_class: archetype.class,
            layout_key: archetype.layout_key.to_string(),
            panel_count: archetype.panel_count,
            width: self.width,
            height: self.height,
            inside_color: color(&self.inside_color, &self.inside_color_name),
            outside_fixed_color,
            outside_moving_color: color(&self.outside_moving_color, &self.outside_moving_color_name),
            window,
            quantity: self.quantity.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArchetypeClass;
    use serde_json::json;

    fn window_line() -> serde_json::Value {
        json!({
            "id": "1712345678901-0.4821",
            "productId": 4,
            "productName": "Draaikiepraam (L) en vast glas | 3-vaks",
            "configuration": "left-fixed-3",
            "type": "window",
            "panels": 3,
            "width": 1800,
            "height": 1200,
            "insideColor": "1",
            "insideColorName": "Wit glad",
            "outsideFixedColor": "5",
            "outsideFixedColorName": "Antraciet",
            "outsideMovingColor": "5",
            "outsideMovingColorName": "Antraciet",
            "glassType": "triple",
            "glassTypeName": "Triple glas",
            "glassFinish": "satin",
            "glassFinishName": "Satijnglas",
            "direction": "right",
            "screens": "2",
            "quantity": 2
        })
    }

    #[test]
    fn test_window_line_is_rebuilt_from_catalog() {
        let item: LegacyCartItem = serde_json::from_value(window_line()).unwrap();
        let product = item.into_product().unwrap();

        assert_eq!(product.archetype_id, 4);
        assert_eq!(product.archetype_class, ArchetypeClass::Window);
        assert_eq!(product.layout_key, "left-fixed-3");
        assert_eq!(product.panel_count, 3);
        assert_eq!((product.width, product.height), (1800, 1200));
        assert_eq!(product.inside_color.name, "White smooth");
        assert_eq!(product.outside_fixed_color.unwrap().name, "Anthracite");
        assert_eq!(product.quantity, 2);

        let window = product.window.unwrap();
        assert_eq!(window.glass_type, GlassType::Triple);
        assert_eq!(window.glass_finish_name, "Satin glass");
        assert_eq!(window.opening_direction, OpeningDirection::Right);
        assert_eq!(window.screen_count, ScreenCount::Two);
    }

    #[test]
    fn test_single_panel_door_drops_fixed_color_and_window_fields() {
        let item: LegacyCartItem = serde_json::from_value(json!({
            "id": "1712345678901-0.77",
            "productId": 31,
            "type": "back-door",
            "panels": 1,
            "width": 1000,
            "height": 2100,
            "insideColor": "2",
            "insideColorName": "Wit houtnerf",
            "outsideFixedColor": "1",
            "outsideFixedColorName": "Wit glad",
            "outsideMovingColor": "6",
            "outsideMovingColorName": "Zwart",
            "quantity": 1
        }))
        .unwrap();
        let product = item.into_product().unwrap();

        assert_eq!(product.archetype_class, ArchetypeClass::BackDoor);
        assert!(product.outside_fixed_color.is_none());
        assert!(product.window.is_none());
        assert_eq!(product.outside_moving_color.name, "Black");
    }

    #[test]
    fn test_blank_options_take_front_end_defaults() {
        let mut line = window_line();
        line["glassType"] = json!("");
        line["direction"] = json!(null);
        line["outsideFixedColor"] = json!("");
        line.as_object_mut().unwrap().remove("screens");
        line.as_object_mut().unwrap().remove("quantity");

        let product = serde_json::from_value::<LegacyCartItem>(line)
            .unwrap()
            .into_product()
            .unwrap();
        let window = product.window.unwrap();
        assert_eq!(window.glass_type, GlassType::Hr);
        assert_eq!(window.opening_direction, OpeningDirection::Left);
        assert_eq!(window.screen_count, ScreenCount::Zero);
        assert_eq!(product.outside_fixed_color.unwrap().id, DEFAULT_COLOR_ID);
        assert_eq!(product.quantity, 1);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let mut line = window_line();
        line["productId"] = json!(99);
        let item: LegacyCartItem = serde_json::from_value(line).unwrap();
        assert!(matches!(item.into_product(), Err(ValidationError::InvalidProduct(_))));

        let mut line = window_line();
        line["direction"] = json!("up");
        let item: LegacyCartItem = serde_json::from_value(line).unwrap();
        assert!(matches!(item.into_product(), Err(ValidationError::InvalidProduct(_))));
    }

    #[test]
    fn test_unknown_color_keeps_submitted_label() {
        let mut line = window_line();
        line["insideColor"] = json!("42");
        line["insideColorName"] = json!("Golden oak");
        let product = serde_json::from_value::<LegacyCartItem>(line)
            .unwrap()
            .into_product()
            .unwrap();
        assert_eq!(product.inside_color.id, "42");
        assert_eq!(product.inside_color.name, "Golden oak");
    }
}
