// Basket split model: the delivery chosen for every item of a basket

use crate::models::{DeliveryId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of splitting a basket, mapping each item to the deliveries carrying it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketSplit {
    assignments: BTreeMap<ItemId, Vec<DeliveryId>>,
}

impl BasketSplit {
    /// Creates an empty split
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `item` travels with `delivery`
    pub fn assign<I: Into<ItemId>, D: Into<DeliveryId>>(&mut self, item: I, delivery: D) {
        self.assignments
            .entry(item.into())
            .or_default()
            .push(delivery.into());
    }

    /// Makes sure `item` has an entry even if nothing was assigned to it
    pub fn ensure_item<I: Into<ItemId>>(&mut self, item: I) {
        self.assignments.entry(item.into()).or_default();
    }

    /// Gets all deliveries assigned to an item
    pub fn get(&self, item: &str) -> Option<&[DeliveryId]> {
        self.assignments.get(item).map(Vec::as_slice)
    }

    /// Gets the delivery of an item when exactly one is assigned
    pub fn delivery_of(&self, item: &str) -> Option<&DeliveryId> {
        match self.get(item) {
            Some([delivery]) => Some(delivery),
            _ => None,
        }
    }

    /// Number of items in the split
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates over (item, deliveries) pairs in item order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Vec<DeliveryId>)> {
        self.assignments.iter()
    }

    /// Checks that every item is carried by exactly one delivery
    pub fn is_complete(&self) -> bool {
        self.assignments.values().all(|deliveries| deliveries.len() == 1)
    }

    /// Distinct deliveries used by the split, sorted
    pub fn deliveries(&self) -> Vec<&DeliveryId> {
        self.groups().into_keys().collect()
    }

    /// Items grouped by the delivery carrying them
    pub fn groups(&self) -> BTreeMap<&DeliveryId, Vec<&ItemId>> {
        let mut groups: BTreeMap<&DeliveryId, Vec<&ItemId>> = BTreeMap::new();
        for (item, deliveries) in &self.assignments {
            for delivery in deliveries {
                groups.entry(delivery).or_default().push(item);
            }
        }
        groups
    }

    /// Size of the biggest delivery group, 0 for an empty split
    pub fn largest_group_size(&self) -> usize {
        self.groups().values().map(Vec::len).max().unwrap_or(0)
    }
}
