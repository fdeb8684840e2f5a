// Delivery catalog model: which deliveries each item may ship with

use crate::error::CatalogError;
use crate::models::{DeliveryId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps every known item, in item order, to the ordered list of deliveries it is eligible for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryCatalog {
    eligible: BTreeMap<ItemId, Vec<DeliveryId>>,
}

impl DeliveryCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object of the form `{"item": ["delivery", ...]}`
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Registers (or replaces) the eligible deliveries of an item
    pub fn insert<I, D>(&mut self, item: I, deliveries: D)
    where
        I: Into<ItemId>,
        D: IntoIterator,
        D::Item: Into<DeliveryId>,
    {
        self.eligible
            .insert(item.into(), deliveries.into_iter().map(Into::into).collect());
    }

    /// Eligible deliveries of an item; unknown items have none
    pub fn eligible_deliveries(&self, item: &str) -> &[DeliveryId] {
        self.eligible.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.eligible.contains_key(item)
    }

    /// Checks if an item may ship with the given delivery
    pub fn is_eligible(&self, item: &str, delivery: &str) -> bool {
        self.eligible_deliveries(item).iter().any(|d| d == delivery)
    }

    /// Number of items in the catalog
    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Iterates over all catalog items in ascending order
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.eligible.keys()
    }
}

impl<I, D> FromIterator<(I, D)> for DeliveryCatalog
where
    I: Into<ItemId>,
    D: IntoIterator,
    D::Item: Into<DeliveryId>,
{
    fn from_iter<T: IntoIterator<Item = (I, D)>>(iter: T) -> Self {
        let mut catalog = DeliveryCatalog::new();
        for (item, deliveries) in iter {
            catalog.insert(item, deliveries);
        }
        catalog
    }
}
