// Seeded generators for synthetic catalogs and baskets (benchmarks and property tests)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{DeliveryCatalog, DeliveryId, ItemId};

const DELIVERY_NAMES: [&str; 8] = [
    "Courier",
    "Express Collection",
    "Pick-up point",
    "Parcel locker",
    "Mailbox delivery",
    "In-store pick-up",
    "Next day shipping",
    "Same day delivery",
];

/// Name of the `index`-th synthetic delivery
pub fn delivery_name(index: usize) -> DeliveryId {
    match DELIVERY_NAMES.get(index) {
        Some(name) => name.to_string(),
        None => format!("Delivery {}", index + 1),
    }
}

/// Name of the `index`-th synthetic item
pub fn item_name(index: usize) -> ItemId {
    format!("Item {}", index + 1)
}

/// Builds a catalog where each item is eligible for 1..=max_eligible random deliveries
pub fn random_catalog(
    seed: u64,
    item_count: usize,
    delivery_count: usize,
    max_eligible: usize,
) -> DeliveryCatalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let deliveries: Vec<DeliveryId> = (0..delivery_count).map(delivery_name).collect();
    let max_eligible = max_eligible.clamp(1, delivery_count.max(1));

    (0..item_count)
        .map(|index| {
            let eligible_count = rng.gen_range(1..=max_eligible);
            let eligible: Vec<DeliveryId> = deliveries
                .choose_multiple(&mut rng, eligible_count)
                .cloned()
                .collect();
            (item_name(index), eligible)
        })
        .collect()
}

/// Picks `size` distinct catalog items in random order
pub fn random_basket(seed: u64, catalog: &DeliveryCatalog, size: usize) -> Vec<ItemId> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut items: Vec<ItemId> = catalog.items().cloned().collect();
    items.shuffle(&mut rng);
    items.truncate(size);
    items
}
