//! Static product and option catalog
//!
//! Archetypes (the product templates a shopper starts from) and the color
//! swatches are fixed at build time. Lookups never mutate anything; a miss is
//! reported as [`UnknownOptionError`] and callers decide how tolerant to be.

use crate::models::{ArchetypeClass, GlassFinish, GlassType};
use serde::Serialize;
use thiserror::Error;

/// Color used for every color selection until the shopper picks another one
pub const DEFAULT_COLOR_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} option: '{id}'")]
pub struct UnknownOptionError {
    pub kind: &'static str,
    pub id: String,
}

impl UnknownOptionError {
    pub(crate) fn new(kind: &'static str, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Archetypes
// =============================================================================

/// A product template the shopper configures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Archetype {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub class: ArchetypeClass,
    pub panel_count: u8,
    /// Selects the preview/layout template in the front-end
    pub layout_key: &'static str,
    pub is_popular: bool,
}

impl Archetype {
    /// Whether the fixed and moving parts get separate outside colors
    pub fn has_fixed_part(&self) -> bool {
        self.panel_count > 1
    }

    pub fn is_window(&self) -> bool {
        self.class == ArchetypeClass::Window
    }
}

const fn archetype(
    id: u32,
    name: &'static str,
    description: &'static str,
    class: ArchetypeClass,
    panel_count: u8,
    layout_key: &'static str,
    is_popular: bool,
) -> Archetype {
    Archetype {
        id,
        name,
        description,
        class,
        panel_count,
        layout_key,
        is_popular,
    }
}

static ARCHETYPES: [Archetype; 23] = [
    // Windows
    archetype(1, "Tilt-turn window", "Configure your tilt-turn window", ArchetypeClass::Window, 1, "single", true),
    archetype(2, "Double tilt-turn window | 2 sections", "Configure your double tilt-turn window", ArchetypeClass::Window, 2, "double", false),
    archetype(3, "Tilt-turn window (L) and fixed glass | 2 sections", "Configure your tilt-turn window with fixed glass on the right", ArchetypeClass::Window, 2, "left-fixed", false),
    archetype(4, "Tilt-turn window (L) and fixed glass | 3 sections", "Configure your three-section window with the opening part on the left", ArchetypeClass::Window, 3, "left-fixed-3", false),
    archetype(5, "Tilt-turn window (M) and fixed glass | 3 sections", "Configure your three-section window with the opening part in the middle", ArchetypeClass::Window, 3, "middle-fixed-3", false),
    archetype(6, "Tilt-turn window (R) and fixed glass | 2 sections", "Configure your tilt-turn window with fixed glass on the left", ArchetypeClass::Window, 2, "right-fixed", false),
    archetype(7, "Tilt-turn windows (L&R) and fixed glass | 3 sections", "Configure your three-section window with two opening parts", ArchetypeClass::Window, 3, "both-fixed-3", false),
    // Lift-and-slide doors
    archetype(11, "2-part lift-and-slide door", "Configure your 2-part lift-and-slide door", ArchetypeClass::Sliding, 2, "sliding-2", true),
    archetype(12, "4-part lift-and-slide door", "Configure your 4-part lift-and-slide door", ArchetypeClass::Sliding, 4, "sliding-4", false),
    // Garden doors
    archetype(21, "Double garden door", "Configure your double garden door", ArchetypeClass::GardenDoor, 2, "double-garden", true),
    archetype(22, "Double garden door with side lights", "Configure your double garden door with side lights", ArchetypeClass::GardenDoor, 4, "double-garden-side", false),
    archetype(23, "Double garden door with transom", "Configure your double garden door with transom", ArchetypeClass::GardenDoor, 2, "double-garden-top", false),
    archetype(24, "Double garden door with transom and side lights", "Configure your double garden door with transom and side lights", ArchetypeClass::GardenDoor, 4, "double-garden-top-side", false),
    // Back doors
    archetype(31, "Back door without side or top lights", "Configure your back door without side or top lights", ArchetypeClass::BackDoor, 1, "back-door-simple", true),
    archetype(32, "Back door with transom", "Configure your back door with transom", ArchetypeClass::BackDoor, 1, "back-door-top", false),
    archetype(33, "Back door with side light left", "Configure your back door with a side light on the left", ArchetypeClass::BackDoor, 2, "back-door-left", false),
    archetype(34, "Back door with side light right", "Configure your back door with a side light on the right", ArchetypeClass::BackDoor, 2, "back-door-right", false),
    archetype(35, "Back door with side light left and rail", "Configure your back door with a side light and rail on the left", ArchetypeClass::BackDoor, 2, "back-door-left-rail", false),
    archetype(36, "Back door with side light right and rail", "Configure your back door with a side light and rail on the right", ArchetypeClass::BackDoor, 2, "back-door-right-rail", false),
    // Front doors
    archetype(41, "Front door without side or top lights", "Configure your front door without side or top lights", ArchetypeClass::FrontDoor, 1, "front-door-simple", true),
    archetype(42, "Front door with transom", "Configure your front door with transom", ArchetypeClass::FrontDoor, 1, "front-door-top", false),
    archetype(43, "Front door with side light left", "Configure your front door with a side light on the left", ArchetypeClass::FrontDoor, 2, "front-door-left", false),
    archetype(44, "Front door with side light right", "Configure your front door with a side light on the right", ArchetypeClass::FrontDoor, 2, "front-door-right", false),
];

/// All archetypes in listing order
pub fn archetypes() -> &'static [Archetype] {
    &ARCHETYPES
}

pub fn archetypes_by_class(class: ArchetypeClass) -> impl Iterator<Item = &'static Archetype> {
    ARCHETYPES.iter().filter(move |a| a.class == class)
}

pub fn find_archetype(id: u32) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

// =============================================================================
// Colors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    pub id: &'static str,
    pub name: &'static str,
    pub ral: &'static str,
    pub hex: &'static str,
}

static COLORS: [Color; 9] = [
    Color { id: "1", name: "White smooth", ral: "RAL 9016", hex: "#F1F0EA" },
    Color { id: "2", name: "White woodgrain", ral: "RAL 9010", hex: "#E8E6D1" },
    Color { id: "3", name: "Cream smooth", ral: "RAL 9001", hex: "#E9E0D2" },
    Color { id: "4", name: "Cream woodgrain", ral: "RAL 9001", hex: "#E9E0D2" },
    Color { id: "5", name: "Anthracite", ral: "RAL 7016", hex: "#383E42" },
    Color { id: "6", name: "Black", ral: "RAL 9005", hex: "#0E0E10" },
    Color { id: "7", name: "Spar green woodgrain", ral: "RAL 9006", hex: "#31442C" },
    Color { id: "8", name: "Steel blue woodgrain", ral: "RAL 5011", hex: "#1A2B3C" },
    Color { id: "9", name: "Monument green woodgrain", ral: "RAL 6064", hex: "#2C3A2B" },
];

pub fn colors() -> &'static [Color] {
    &COLORS
}

/// Resolve a color id to its display name
pub fn resolve_color_name(id: &str) -> Result<&'static str, UnknownOptionError> {
    COLORS
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name)
        .ok_or_else(|| UnknownOptionError::new("color", id))
}

/// Resolve a color id, degrading to an empty name on a miss.
///
/// A configured product stays usable when a label cannot be resolved; the
/// email renderer shows the row with a placeholder instead.
pub fn color_name_or_empty(id: &str) -> String {
    match resolve_color_name(id) {
        Ok(name) => name.to_string(),
        Err(e) => {
            tracing::warn!("{}; storing an empty display name", e);
            String::new()
        }
    }
}

// =============================================================================
// Glass
// =============================================================================

pub fn resolve_glass_type_name(code: &str) -> Result<&'static str, UnknownOptionError> {
    code.parse::<GlassType>().map(GlassType::display_name)
}

pub fn resolve_glass_finish_name(code: &str) -> Result<&'static str, UnknownOptionError> {
    code.parse::<GlassFinish>().map(GlassFinish::display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_archetype_ids_are_unique() {
        let ids: HashSet<u32> = archetypes().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), archetypes().len());
    }

    #[test]
    fn test_every_class_has_one_popular_archetype() {
        for class in [
            ArchetypeClass::Window,
            ArchetypeClass::Sliding,
            ArchetypeClass::GardenDoor,
            ArchetypeClass::BackDoor,
            ArchetypeClass::FrontDoor,
        ] {
            let popular = archetypes_by_class(class).filter(|a| a.is_popular).count();
            assert_eq!(popular, 1, "{:?}", class);
        }
    }

    #[test]
    fn test_find_archetype() {
        let single = find_archetype(1).unwrap();
        assert!(single.is_window());
        assert!(!single.has_fixed_part());

        let sliding = find_archetype(12).unwrap();
        assert_eq!(sliding.panel_count, 4);
        assert!(sliding.has_fixed_part());

        assert!(find_archetype(99).is_none());
    }

    #[test]
    fn test_resolve_color_name() {
        assert_eq!(resolve_color_name("5"), Ok("Anthracite"));
        assert_eq!(resolve_color_name(DEFAULT_COLOR_ID), Ok("White smooth"));

        let err = resolve_color_name("42").unwrap_err();
        assert_eq!(err.kind, "color");
        assert_eq!(err.id, "42");
    }

    #[test]
    fn test_color_name_or_empty_tolerates_unknown_ids() {
        assert_eq!(color_name_or_empty("6"), "Black");
        assert_eq!(color_name_or_empty("not-a-color"), "");
    }

    #[test]
    fn test_resolve_glass_names() {
        assert_eq!(resolve_glass_type_name("hr"), Ok("HR++ glass"));
        assert_eq!(resolve_glass_type_name("triple"), Ok("Triple glass"));
        assert_eq!(resolve_glass_finish_name("clear"), Ok("Clear glass"));
        assert_eq!(resolve_glass_finish_name("satin"), Ok("Satin glass"));
        assert!(resolve_glass_type_name("double").is_err());
        assert!(resolve_glass_finish_name("frosted").is_err());
    }
}
