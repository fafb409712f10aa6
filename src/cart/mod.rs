//! Cart store
//!
//! An ordered list of configured products owned by one shopper session.
//! Insertion order is kept for display and for the product numbering in
//! the notification emails.

use crate::models::ConfiguredProduct;
use crate::validation::validate_quantity;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Contract violations on the cart; these indicate a caller bug rather than
/// something the shopper can fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Product {0} is already in the cart")]
    DuplicateId(Uuid),

    #[error("Product {0} not found in cart")]
    NotFound(Uuid),

    #[error("Quantity must be between 1 and 999 (got {0})")]
    InvalidQuantity(u32),
}

#[derive(Debug, Default)]
pub struct Cart {
    items: Vec<ConfiguredProduct>,
    /// Every id ever added, so a removed id is never accepted again
    issued: HashSet<Uuid>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a product
    pub fn add(&mut self, product: ConfiguredProduct) -> Result<(), CartError> {
        if !self.issued.insert(product.id) {
            return Err(CartError::DuplicateId(product.id));
        }
        self.items.push(product);
        Ok(())
    }

    /// Replace the entry with the same id, keeping its position
    pub fn update_by_id(&mut self, product: ConfiguredProduct) -> Result<(), CartError> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id == product.id)
            .ok_or(CartError::NotFound(product.id))?;
        *slot = product;
        Ok(())
    }

    pub fn set_quantity(&mut self, id: Uuid, quantity: u32) -> Result<(), CartError> {
        validate_quantity(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CartError::NotFound(id))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Remove a product; the remaining entries keep their relative order
    pub fn remove_by_id(&mut self, id: Uuid) -> Result<ConfiguredProduct, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::NotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Owned copy of the cart contents; later cart edits do not affect it
    pub fn snapshot(&self) -> Vec<ConfiguredProduct> {
        self.items.clone()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: Uuid) -> Option<&ConfiguredProduct> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
