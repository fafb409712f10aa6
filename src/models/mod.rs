//! Data models for the application

use crate::cart::Cart;
use crate::catalog::UnknownOptionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchetypeClass {
    Window,
    Sliding,
    GardenDoor,
    BackDoor,
    FrontDoor,
}

impl ArchetypeClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::Window => "Window",
            Self::Sliding => "Lift-and-slide door",
            Self::GardenDoor => "Garden door",
            Self::BackDoor => "Back door",
            Self::FrontDoor => "Front door",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlassType {
    Hr,
    Triple,
}

impl GlassType {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hr => "HR++ glass",
            Self::Triple => "Triple glass",
        }
    }
}

impl FromStr for GlassType {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hr" => Ok(Self::Hr),
            "triple" => Ok(Self::Triple),
            _ => Err(UnknownOptionError::new("glass type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlassFinish {
    Clear,
    Satin,
}

impl GlassFinish {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Clear => "Clear glass",
            Self::Satin => "Satin glass",
        }
    }
}

impl FromStr for GlassFinish {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Self::Clear),
            "satin" => Ok(Self::Satin),
            _ => Err(UnknownOptionError::new("glass finish", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningDirection {
    Left,
    Right,
}

impl OpeningDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// Number of insect screens ordered with a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenCount {
    #[serde(rename = "none")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

impl ScreenCount {
    pub fn label(self) -> &'static str {
        match self {
            Self::Zero => "None",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
        }
    }
}

// =============================================================================
// Configured Product
// =============================================================================

/// A color selection: the raw catalog id plus the name resolved at commit time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChoice {
    pub id: String,
    pub name: String,
}

/// Selections that only exist for window archetypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    pub glass_type: GlassType,
    pub glass_type_name: String,
    pub glass_finish: GlassFinish,
    pub glass_finish_name: String,
    pub opening_direction: OpeningDirection,
    pub screen_count: ScreenCount,
}

/// One cart line.
///
/// `outside_fixed_color` is `Some` iff `panel_count > 1` and `window` is
/// `Some` iff `archetype_class` is [`ArchetypeClass::Window`]. A `None` means
/// "not applicable to this archetype"; an empty name inside a `Some` means
/// "applicable but the label could not be resolved".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredProduct {
    pub id: Uuid,
    pub archetype_id: u32,
    pub archetype_name: String,
    pub archetype_class: ArchetypeClass,
    pub layout_key: String,
    pub panel_count: u8,
    pub width: u32,
    pub height: u32,
    pub inside_color: ColorChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside_fixed_color: Option<ColorChoice>,
    pub outside_moving_color: ColorChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowOptions>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ConfiguredProduct {
    pub fn has_fixed_part(&self) -> bool {
        self.panel_count > 1
    }

    pub fn is_window(&self) -> bool {
        self.archetype_class == ArchetypeClass::Window
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Contact and address details entered at checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ContactFields {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Remarks with surrounding whitespace removed, or `None` when blank
    pub fn remarks_text(&self) -> Option<&str> {
        self.remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// =============================================================================
// API Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConfigurationRequest {
    pub archetype_id: u32,
    /// Cart line to edit; a new product is configured when absent
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

// =============================================================================
// API Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Checkout fields left blank, so the form can mark each one
    #[serde(rename = "missingFields", skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            missing_fields: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            missing_fields: None,
        }
    }

    pub fn with_missing_fields(mut self, fields: Option<Vec<String>>) -> Self {
        self.missing_fields = fields;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<ConfiguredProduct>,
    pub total_quantity: u64,
}

impl CartResponse {
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.snapshot(),
            total_quantity: cart.total_quantity(),
        }
    }
}
