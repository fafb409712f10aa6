//! Configuration sessions
//!
//! A [`ConfigurationSession`] stages the edits for one configured product.
//! Nothing touches the cart until the session is committed; dropping the
//! session discards the staged values.

use crate::cart::{Cart, CartError};
use crate::catalog::{color_name_or_empty, Archetype, DEFAULT_COLOR_ID};
use crate::models::{
    ArchetypeClass, ColorChoice, ConfiguredProduct, GlassFinish, GlassType, OpeningDirection,
    ScreenCount, WindowOptions,
};
use crate::validation::{validate_dimensions, validate_quantity, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_WIDTH_MM: u32 = 860;
pub const DEFAULT_HEIGHT_MM: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("'{field}' does not apply to {archetype}")]
    NotApplicable {
        field: &'static str,
        archetype: String,
    },

    #[error("Product {product_id} was configured as archetype {expected}, not {given}")]
    ArchetypeMismatch {
        product_id: Uuid,
        expected: u32,
        given: u32,
    },

    #[error("Unknown product archetype: {0}")]
    UnknownArchetype(u32),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// The editable values of a product being configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDraft {
    pub width: u32,
    pub height: u32,
    pub inside_color_id: String,
    pub outside_fixed_color_id: String,
    pub outside_moving_color_id: String,
    pub glass_type: GlassType,
    pub glass_finish: GlassFinish,
    pub opening_direction: OpeningDirection,
    pub screen_count: ScreenCount,
    pub quantity: u32,
}

impl Default for ConfigurationDraft {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_MM,
            height: DEFAULT_HEIGHT_MM,
            inside_color_id: DEFAULT_COLOR_ID.to_string(),
            outside_fixed_color_id: DEFAULT_COLOR_ID.to_string(),
            outside_moving_color_id: DEFAULT_COLOR_ID.to_string(),
            glass_type: GlassType::Hr,
            glass_finish: GlassFinish::Clear,
            opening_direction: OpeningDirection::Left,
            screen_count: ScreenCount::Zero,
            quantity: 1,
        }
    }
}

impl ConfigurationDraft {
    fn from_product(product: &ConfiguredProduct) -> Self {
        let defaults = Self::default();
        let window = product.window.as_ref();
        Self {
            width: product.width,
            height: product.height,
            inside_color_id: product.inside_color.id.clone(),
            outside_fixed_color_id: product
                .outside_fixed_color
                .as_ref()
                .map(|c| c.id.clone())
                .unwrap_or(defaults.outside_fixed_color_id),
            outside_moving_color_id: product.outside_moving_color.id.clone(),
            glass_type: window.map_or(defaults.glass_type, |w| w.glass_type),
            glass_finish: window.map_or(defaults.glass_finish, |w| w.glass_finish),
            opening_direction: window.map_or(defaults.opening_direction, |w| w.opening_direction),
            screen_count: window.map_or(defaults.screen_count, |w| w.screen_count),
            quantity: product.quantity,
        }
    }
}

/// A partial edit of the draft; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub inside_color_id: Option<String>,
    pub outside_fixed_color_id: Option<String>,
    pub outside_moving_color_id: Option<String>,
    pub glass_type: Option<GlassType>,
    pub glass_finish: Option<GlassFinish>,
    pub opening_direction: Option<OpeningDirection>,
    pub screen_count: Option<ScreenCount>,
    pub quantity: Option<u32>,
}

/// Archetype facts copied into every product made from it
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProductTemplate {
    archetype_id: u32,
    name: String,
    class: ArchetypeClass,
    layout_key: String,
    panel_count: u8,
}

impl ProductTemplate {
    fn has_fixed_part(&self) -> bool {
        self.panel_count > 1
    }

    fn is_window(&self) -> bool {
        self.class == ArchetypeClass::Window
    }
}

/// Whether a commit appended a new cart line or overwrote an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    Added,
    Updated,
}

#[derive(Debug, Clone)]
pub struct ConfigurationSession {
    template: ProductTemplate,
    editing: Option<Uuid>,
    draft: ConfigurationDraft,
}

impl ConfigurationSession {
    /// Start configuring `archetype`.
    ///
    /// With an existing product the session edits that cart line: every
    /// editable value is seeded from it and the archetype facts copied at its
    /// creation are kept.
    pub fn start(
        archetype: &Archetype,
        existing: Option<&ConfiguredProduct>,
    ) -> Result<Self, SessionError> {
        let session = match existing {
            Some(product) => {
                if product.archetype_id != archetype.id {
                    return Err(SessionError::ArchetypeMismatch {
                        product_id: product.id,
                        expected: product.archetype_id,
                        given: archetype.id,
                    });
                }
                Self {
                    template: ProductTemplate {
                        archetype_id: product.archetype_id,
                        name: product.archetype_name.clone(),
                        class: product.archetype_class,
                        layout_key: product.layout_key.clone(),
                        panel_count: product.panel_count,
                    },
                    editing: Some(product.id),
                    draft: ConfigurationDraft::from_product(product),
                }
            }
            None => Self {
                template: ProductTemplate {
                    archetype_id: archetype.id,
                    name: archetype.name.to_string(),
                    class: archetype.class,
                    layout_key: archetype.layout_key.to_string(),
                    panel_count: archetype.panel_count,
                },
                editing: None,
                draft: ConfigurationDraft::default(),
            },
        };
        Ok(session)
    }

    pub fn draft(&self) -> &ConfigurationDraft {
        &self.draft
    }

    /// Id of the cart line being edited, if any
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn archetype_id(&self) -> u32 {
        self.template.archetype_id
    }

    /// Stage an edit. Fields that do not apply to the archetype are rejected
    /// so the draft never carries values the committed product would drop.
    pub fn apply(&mut self, update: DraftUpdate) -> Result<(), SessionError> {
        if update.outside_fixed_color_id.is_some() && !self.template.has_fixed_part() {
            return Err(self.not_applicable("outsideFixedColorId"));
        }
        if !self.template.is_window() {
            let window_field = [
                ("glassType", update.glass_type.is_some()),
                ("glassFinish", update.glass_finish.is_some()),
                ("openingDirection", update.opening_direction.is_some()),
                ("screenCount", update.screen_count.is_some()),
            ]
            .into_iter()
            .find(|(_, present)| *present);
            if let Some((field, _)) = window_field {
                return Err(self.not_applicable(field));
            }
        }

        let draft = &mut self.draft;
        if let Some(width) = update.width {
            draft.width = width;
        }
        if let Some(height) = update.height {
            draft.height = height;
        }
        if let Some(id) = update.inside_color_id {
            draft.inside_color_id = id;
        }
        if let Some(id) = update.outside_fixed_color_id {
            draft.outside_fixed_color_id = id;
        }
        if let Some(id) = update.outside_moving_color_id {
            draft.outside_moving_color_id = id;
        }
        if let Some(glass_type) = update.glass_type {
            draft.glass_type = glass_type;
        }
        if let Some(glass_finish) = update.glass_finish {
            draft.glass_finish = glass_finish;
        }
        if let Some(direction) = update.opening_direction {
            draft.opening_direction = direction;
        }
        if let Some(screens) = update.screen_count {
            draft.screen_count = screens;
        }
        if let Some(quantity) = update.quantity {
            draft.quantity = quantity;
        }
        Ok(())
    }

    fn not_applicable(&self, field: &'static str) -> SessionError {
        SessionError::NotApplicable {
            field,
            archetype: self.template.name.clone(),
        }
    }

    /// Build the configured product from the staged values.
    ///
    /// Display names are resolved now and stored with the ids. Inapplicable
    /// fields are left out. An edit keeps the original product id; a new
    /// product gets a fresh one.
    pub fn confirm(&self) -> Result<ConfiguredProduct, SessionError> {
        let draft = &self.draft;
        validate_dimensions(draft.width, draft.height)?;
        validate_quantity(draft.quantity)?;

        let outside_fixed_color = self
            .template
            .has_fixed_part()
            .then(|| color_choice(&draft.outside_fixed_color_id));

        let window = self.template.is_window().then(|| WindowOptions {
            glass_type: draft.glass_type,
            glass_type_name: draft.glass_type.display_name().to_string(),
            glass_finish: draft.glass_finish,
            glass_finish_name: draft.glass_finish.display_name().to_string(),
            opening_direction: draft.opening_direction,
            screen_count: draft.screen_count,
        });

        Ok(ConfiguredProduct {
            id: self.editing.unwrap_or_else(Uuid::new_v4),
            archetype_id: self.template.archetype_id,
            archetype_name: self.template.name.clone(),
            archetype_class: self.template.class,
            layout_key: self.template.layout_key.clone(),
            panel_count: self.template.panel_count,
            width: draft.width,
            height: draft.height,
            inside_color: color_choice(&draft.inside_color_id),
            outside_fixed_color,
            outside_moving_color: color_choice(&draft.outside_moving_color_id),
            window,
            quantity: draft.quantity,
        })
    }

    /// Confirm and write the product into the cart: a new product is added,
    /// an edited one overwrites its cart line.
    pub fn commit(
        self,
        cart: &mut Cart,
    ) -> Result<(CommitOutcome, ConfiguredProduct), SessionError> {
        let product = self.confirm()?;
        let outcome = if self.editing.is_some() {
            cart.update_by_id(product.clone())?;
            CommitOutcome::Updated
        } else {
            cart.add(product.clone())?;
            CommitOutcome::Added
        };
        tracing::debug!(product_id = %product.id, ?outcome, "Configuration committed");
        Ok((outcome, product))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            archetype_id: self.template.archetype_id,
            archetype_name: self.template.name.clone(),
            archetype_class: self.template.class,
            layout_key: self.template.layout_key.clone(),
            panel_count: self.template.panel_count,
            editing_product_id: self.editing,
            fixed_part_editable: self.template.has_fixed_part(),
            window_options_editable: self.template.is_window(),
            draft: self.draft.clone(),
        }
    }
}

fn color_choice(id: &str) -> ColorChoice {
    ColorChoice {
        id: id.to_string(),
        name: color_name_or_empty(id),
    }
}

/// What the configurator screen needs to render a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub archetype_id: u32,
    pub archetype_name: String,
    pub archetype_class: ArchetypeClass,
    pub layout_key: String,
    pub panel_count: u8,
    pub editing_product_id: Option<Uuid>,
    pub fixed_part_editable: bool,
    pub window_options_editable: bool,
    pub draft: ConfigurationDraft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_archetype;

    fn single_window() -> &'static Archetype {
        find_archetype(1).unwrap()
    }

    fn sliding_door() -> &'static Archetype {
        find_archetype(11).unwrap()
    }

    #[test]
    fn test_start_seeds_defaults() {
        let session = ConfigurationSession::start(single_window(), None).unwrap();
        let draft = session.draft();
        assert_eq!(draft.width, 860);
        assert_eq!(draft.height, 500);
        assert_eq!(draft.inside_color_id, "1");
        assert_eq!(draft.glass_type, GlassType::Hr);
        assert_eq!(draft.glass_finish, GlassFinish::Clear);
        assert_eq!(draft.opening_direction, OpeningDirection::Left);
        assert_eq!(draft.screen_count, ScreenCount::Zero);
        assert_eq!(draft.quantity, 1);
        assert!(session.editing().is_none());
    }

    #[test]
    fn test_confirm_single_panel_window() {
        let mut session = ConfigurationSession::start(single_window(), None).unwrap();
        session
            .apply(DraftUpdate {
                width: Some(1200),
                height: Some(800),
                inside_color_id: Some("5".to_string()),
                glass_type: Some(GlassType::Triple),
                screen_count: Some(ScreenCount::Two),
                ..Default::default()
            })
            .unwrap();

        let product = session.confirm().unwrap();
        assert_eq!(product.width, 1200);
        assert_eq!(product.inside_color.name, "Anthracite");
        assert!(product.outside_fixed_color.is_none());

        let window = product.window.unwrap();
        assert_eq!(window.glass_type_name, "Triple glass");
        assert_eq!(window.glass_finish_name, "Clear glass");
        assert_eq!(window.screen_count, ScreenCount::Two);
    }

    #[test]
    fn test_confirm_multi_panel_door() {
        let mut session = ConfigurationSession::start(sliding_door(), None).unwrap();
        session
            .apply(DraftUpdate {
                width: Some(2400),
                height: Some(2200),
                outside_fixed_color_id: Some("6".to_string()),
                ..Default::default()
            })
            .unwrap();

        let product = session.confirm().unwrap();
        assert_eq!(product.outside_fixed_color.unwrap().name, "Black");
        assert!(product.window.is_none());
        assert_eq!(product.panel_count, 2);
    }

    #[test]
    fn test_apply_rejects_inapplicable_fields() {
        let mut window = ConfigurationSession::start(single_window(), None).unwrap();
        assert!(matches!(
            window.apply(DraftUpdate {
                outside_fixed_color_id: Some("2".to_string()),
                ..Default::default()
            }),
            Err(SessionError::NotApplicable { field: "outsideFixedColorId", .. })
        ));

        let mut door = ConfigurationSession::start(sliding_door(), None).unwrap();
        assert!(matches!(
            door.apply(DraftUpdate {
                width: Some(2000),
                screen_count: Some(ScreenCount::One),
                ..Default::default()
            }),
            Err(SessionError::NotApplicable { field: "screenCount", .. })
        ));
        // A rejected update leaves the draft untouched
        assert_eq!(door.draft().width, DEFAULT_WIDTH_MM);
    }

    #[test]
    fn test_confirm_enforces_bounds() {
        let mut session = ConfigurationSession::start(sliding_door(), None).unwrap();
        session
            .apply(DraftUpdate {
                width: Some(6001),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(
            session.confirm(),
            Err(SessionError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let mut session = ConfigurationSession::start(sliding_door(), None).unwrap();
        session
            .apply(DraftUpdate {
                quantity: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(
            session.confirm(),
            Err(SessionError::Validation(ValidationError::InvalidQuantity(0)))
        ));
    }

    #[test]
    fn test_unknown_color_degrades_to_empty_name() {
        let mut session = ConfigurationSession::start(single_window(), None).unwrap();
        session
            .apply(DraftUpdate {
                inside_color_id: Some("99".to_string()),
                ..Default::default()
            })
            .unwrap();
        let product = session.confirm().unwrap();
        assert_eq!(product.inside_color.id, "99");
        assert_eq!(product.inside_color.name, "");
    }

    #[test]
    fn test_new_products_get_distinct_ids() {
        let session = ConfigurationSession::start(single_window(), None).unwrap();
        let a = session.confirm().unwrap();
        let b = session.confirm().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_reopen_reproduces_draft() {
        for archetype in [single_window(), sliding_door(), find_archetype(5).unwrap()] {
            let mut session = ConfigurationSession::start(archetype, None).unwrap();
            session
                .apply(DraftUpdate {
                    width: Some(1500),
                    height: Some(1100),
                    inside_color_id: Some("3".to_string()),
                    outside_moving_color_id: Some("8".to_string()),
                    ..Default::default()
                })
                .unwrap();
            let staged = session.draft().clone();

            let mut cart = Cart::new();
            let (_, product) = session.commit(&mut cart).unwrap();

            let reopened = ConfigurationSession::start(archetype, cart.get(product.id)).unwrap();
            assert_eq!(reopened.draft(), &staged);
            assert_eq!(reopened.editing(), Some(product.id));
        }
    }

    #[test]
    fn test_commit_edit_updates_existing_line() {
        let mut cart = Cart::new();
        let session = ConfigurationSession::start(single_window(), None).unwrap();
        let (outcome, product) = session.commit(&mut cart).unwrap();
        assert_eq!(outcome, CommitOutcome::Added);

        let other = ConfigurationSession::start(sliding_door(), None).unwrap();
        other.commit(&mut cart).unwrap();

        let mut edit = ConfigurationSession::start(single_window(), cart.get(product.id)).unwrap();
        edit.apply(DraftUpdate {
            quantity: Some(5),
            ..Default::default()
        })
        .unwrap();
        let (outcome, edited) = edit.commit(&mut cart).unwrap();

        assert_eq!(outcome, CommitOutcome::Updated);
        assert_eq!(edited.id, product.id);
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, product.id);
        assert_eq!(snapshot[0].quantity, 5);
        assert_eq!(snapshot[0].width, product.width);
        assert_eq!(snapshot[1].quantity, 1);
    }

    #[test]
    fn test_commit_edit_of_removed_line_fails() {
        let mut cart = Cart::new();
        let (_, product) = ConfigurationSession::start(single_window(), None)
            .unwrap()
            .commit(&mut cart)
            .unwrap();
        let edit = ConfigurationSession::start(single_window(), Some(&product)).unwrap();
        cart.remove_by_id(product.id).unwrap();

        assert!(matches!(
            edit.commit(&mut cart),
            Err(SessionError::Cart(CartError::NotFound(_)))
        ));
    }

    #[test]
    fn test_start_rejects_mismatched_archetype() {
        let product = ConfigurationSession::start(single_window(), None)
            .unwrap()
            .confirm()
            .unwrap();
        assert!(matches!(
            ConfigurationSession::start(sliding_door(), Some(&product)),
            Err(SessionError::ArchetypeMismatch { expected: 1, given: 11, .. })
        ));
    }
}
