//! Basket splitter: exhaustive delivery-configuration search driving a min-cost max-flow.
//!
//! The basket is modelled as a bipartite flow network
//!
//! ```text
//! source --(1, 0)--> item --(1, 0)--> delivery --(tier)--> sink
//! ```
//!
//! where every delivery -> sink edge is set to one of four [`SinkTier`]s. For every
//! delivery D the search favors D (cheapest tier) and then walks all subsets of the
//! other deliveries, disabling the subset and re-solving the flow. A configuration is
//! kept when it routes every item and beats the incumbent on total cost, or ties on
//! cost while pushing strictly more items through D.

use std::collections::HashSet;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::algorithms::extract::extract_split;
use crate::algorithms::min_cost_flow::MinCostMaxFlow;
use crate::algorithms::BasketSplitSolver;
use crate::config::SplitterConfig;
use crate::error::{CatalogError, SplitError};
use crate::models::{
    BasketSplit, Capacity, Cost, DeliveryCatalog, DeliveryId, Flow, ItemId, NodeIndex,
};

/// Capacity of an enabled delivery -> sink edge
pub const UNBOUNDED_CAPACITY: Capacity = 1_000_007;

pub const FAVORED_COST: Cost = 1;
pub const BASE_COST: Cost = 10;
pub const PENALTY_COST: Cost = 20;

/// State of a delivery -> sink edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkTier {
    /// Enabled at base cost, as built
    Base,
    /// Enabled at the cheapest cost for the current outer iteration
    Favored,
    /// Closed for the current subset
    Disabled,
    /// Enabled again after having been favored or disabled
    Penalized,
}

impl SinkTier {
    pub fn capacity(self) -> Capacity {
        match self {
            SinkTier::Disabled => 0,
            _ => UNBOUNDED_CAPACITY,
        }
    }

    pub fn cost(self) -> Cost {
        match self {
            SinkTier::Base => BASE_COST,
            SinkTier::Favored => FAVORED_COST,
            SinkTier::Disabled | SinkTier::Penalized => PENALTY_COST,
        }
    }
}

/// Node numbering of one basket's network.
///
/// Items occupy `0..n`, deliveries `n..n + k` in first-seen order, then source and sink.
#[derive(Debug, Clone)]
pub struct GraphLayout {
    items: Vec<ItemId>,
    eligible: Vec<Vec<usize>>,
    deliveries: Vec<DeliveryId>,
}

impl GraphLayout {
    /// Numbers the distinct items of a basket and the deliveries they may use
    pub fn new<S: AsRef<str>>(basket: &[S], catalog: &DeliveryCatalog) -> Self {
        let mut seen_items = HashSet::new();
        let mut items = Vec::new();
        let mut eligible = Vec::new();
        let mut deliveries: Vec<DeliveryId> = Vec::new();

        for item in basket.iter().map(|item| item.as_ref()) {
            if !seen_items.insert(item) {
                debug!("item {} appears more than once, routing it once", item);
                continue;
            }
            if !catalog.contains_item(item) {
                warn!("item {} is not in the delivery catalog", item);
            }

            let mut targets = Vec::new();
            for delivery in catalog.eligible_deliveries(item) {
                let position = match deliveries.iter().position(|d| d == delivery) {
                    Some(position) => position,
                    None => {
                        deliveries.push(delivery.clone());
                        deliveries.len() - 1
                    }
                };
                if !targets.contains(&position) {
                    targets.push(position);
                }
            }

            items.push(item.to_string());
            eligible.push(targets);
        }

        Self {
            items,
            eligible,
            deliveries,
        }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn deliveries(&self) -> &[DeliveryId] {
        &self.deliveries
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }

    pub fn node_count(&self) -> usize {
        self.items.len() + self.deliveries.len() + 2
    }

    pub fn item_node(&self, item: usize) -> NodeIndex {
        item
    }

    pub fn delivery_node(&self, delivery: usize) -> NodeIndex {
        self.items.len() + delivery
    }

    pub fn source(&self) -> NodeIndex {
        self.items.len() + self.deliveries.len()
    }

    pub fn sink(&self) -> NodeIndex {
        self.source() + 1
    }

    /// Delivery represented by `node`, if it is a delivery node
    pub fn delivery_at(&self, node: NodeIndex) -> Option<&DeliveryId> {
        node.checked_sub(self.items.len())
            .and_then(|position| self.deliveries.get(position))
    }

    /// Items that no delivery can carry
    pub fn unroutable_items(&self) -> impl Iterator<Item = &ItemId> {
        self.items
            .iter()
            .zip(&self.eligible)
            .filter(|(_, targets)| targets.is_empty())
            .map(|(item, _)| item)
    }
}

/// Counters collected over one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Delivery configurations solved
    pub configurations: u64,
    /// Configurations routing every item
    pub feasible: u64,
    /// Times the incumbent was replaced
    pub improvements: u64,
}

/// Best configuration found so far
#[derive(Debug, Clone)]
struct Incumbent {
    cost: Cost,
    favored_flow: Flow,
    split: BasketSplit,
}

impl Incumbent {
    fn is_beaten_by(&self, cost: Cost, favored_flow: Flow) -> bool {
        cost < self.cost || (cost == self.cost && favored_flow > self.favored_flow)
    }
}

/// Everything owned by a single `split` invocation
struct SearchContext<'a> {
    layout: GraphLayout,
    solver: MinCostMaxFlow,
    tiers: Vec<SinkTier>,
    edge_count: usize,
    best: Option<Incumbent>,
    stats: SearchStats,
    config: &'a SplitterConfig,
}

impl<'a> SearchContext<'a> {
    fn build(layout: GraphLayout, config: &'a SplitterConfig) -> Result<Self, SplitError> {
        let mut solver =
            MinCostMaxFlow::with_nodes(layout.node_count(), layout.source(), layout.sink())?;

        for (position, targets) in layout.eligible.iter().enumerate() {
            let item_node = layout.item_node(position);
            solver.add_edge(layout.source(), item_node, 1, 0)?;
            for &delivery in targets {
                solver.add_edge(item_node, layout.delivery_node(delivery), 1, 0)?;
            }
        }
        for delivery in 0..layout.delivery_count() {
            let tier = SinkTier::Base;
            solver.add_edge(
                layout.delivery_node(delivery),
                layout.sink(),
                tier.capacity(),
                tier.cost(),
            )?;
        }

        let edge_count = solver.network().edge_count();
        let tiers = vec![SinkTier::Base; layout.delivery_count()];

        Ok(Self {
            layout,
            solver,
            tiers,
            edge_count,
            best: None,
            stats: SearchStats::default(),
            config,
        })
    }

    fn set_tier(&mut self, delivery: usize, tier: SinkTier) -> Result<(), SplitError> {
        self.solver.update_edge(
            self.layout.delivery_node(delivery),
            self.layout.sink(),
            tier.capacity(),
            tier.cost(),
        )?;
        self.tiers[delivery] = tier;
        Ok(())
    }

    /// Checks every delivery -> sink edge against the tier it is expected to be in
    fn verify_tiers(&self) -> Result<(), SplitError> {
        let network = self.solver.network();
        if network.edge_count() != self.edge_count {
            return Err(SplitError::InvariantViolation(format!(
                "network holds {} edges, {} were built",
                network.edge_count(),
                self.edge_count
            )));
        }

        for (delivery, tier) in self.tiers.iter().enumerate() {
            let node = self.layout.delivery_node(delivery);
            let consistent = network.last_edge(node).map_or(false, |edge| {
                !edge.is_residual()
                    && edge.to == self.layout.sink()
                    && edge.capacity == tier.capacity()
                    && edge.original_cost == tier.cost()
            });
            if !consistent {
                return Err(SplitError::InvariantViolation(format!(
                    "sink edge of delivery {} is not in tier {:?}",
                    self.layout.deliveries[delivery], tier
                )));
            }
        }
        Ok(())
    }

    /// Tier a toggled delivery returns to
    fn restore_tier(&self) -> SinkTier {
        if self.config.restore_to_base {
            SinkTier::Base
        } else {
            SinkTier::Penalized
        }
    }

    fn verify_if_enabled(&self) -> Result<(), SplitError> {
        if self.config.verify_restores {
            self.verify_tiers()
        } else {
            Ok(())
        }
    }

    /// Solves the current configuration and keeps it if it beats the incumbent
    fn evaluate(&mut self, favored: usize) -> Result<(), SplitError> {
        let summary = self.solver.solve()?;
        self.stats.configurations += 1;

        if summary.max_flow != self.layout.item_count() as Flow {
            return Ok(());
        }
        self.stats.feasible += 1;

        let favored_flow = self
            .solver
            .network()
            .last_edge(self.layout.delivery_node(favored))
            .map_or(0, |edge| edge.flow);
        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| best.is_beaten_by(summary.min_cost, favored_flow));

        if improves {
            trace!(
                "new best: cost {}, {} items through {}",
                summary.min_cost,
                favored_flow,
                self.layout.deliveries[favored]
            );
            self.stats.improvements += 1;
            self.best = Some(Incumbent {
                cost: summary.min_cost,
                favored_flow,
                split: extract_split(self.solver.network(), &self.layout),
            });
        }
        Ok(())
    }

    fn run(mut self) -> Result<(BasketSplit, SearchStats), SplitError> {
        let delivery_count = self.layout.delivery_count();
        let restore = self.restore_tier();

        for favored in 0..delivery_count {
            self.set_tier(favored, SinkTier::Favored)?;
            let others: Vec<usize> = (0..delivery_count).filter(|&d| d != favored).collect();

            for mask in 0..(1u64 << others.len()) {
                let disabled: Vec<usize> = others
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (mask >> bit) & 1 == 1)
                    .map(|(_, &delivery)| delivery)
                    .collect();

                for &delivery in &disabled {
                    self.set_tier(delivery, SinkTier::Disabled)?;
                }
                self.evaluate(favored)?;
                for &delivery in disabled.iter().rev() {
                    self.set_tier(delivery, restore)?;
                }
                self.verify_if_enabled()?;
            }

            self.set_tier(favored, restore)?;
            self.verify_if_enabled()?;
        }

        debug!(
            "searched {} configurations over {} deliveries: {} feasible, {} improvements",
            self.stats.configurations,
            delivery_count,
            self.stats.feasible,
            self.stats.improvements
        );

        match self.best {
            Some(best) => Ok((best.split, self.stats)),
            None => Err(SplitError::InfeasibleAssignment {
                item_count: self.layout.item_count(),
                delivery_count,
            }),
        }
    }
}

/// Splits baskets over the deliveries their items are eligible for
#[derive(Debug, Clone, Default)]
pub struct BasketSplitter {
    catalog: DeliveryCatalog,
    config: SplitterConfig,
}

impl BasketSplitter {
    /// Creates a splitter with the default configuration
    pub fn new(catalog: DeliveryCatalog) -> Self {
        Self::with_config(catalog, SplitterConfig::default())
    }

    pub fn with_config(catalog: DeliveryCatalog, config: SplitterConfig) -> Self {
        Self { catalog, config }
    }

    /// Creates a splitter from a JSON catalog
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(DeliveryCatalog::from_json_str(json)?))
    }

    pub fn catalog(&self) -> &DeliveryCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Assigns every item of the basket to exactly one delivery
    pub fn split<S: AsRef<str>>(&self, basket: &[S]) -> Result<BasketSplit, SplitError> {
        self.split_with_stats(basket).map(|(split, _)| split)
    }

    /// Like [`BasketSplitter::split`], also returning the search counters
    pub fn split_with_stats<S: AsRef<str>>(
        &self,
        basket: &[S],
    ) -> Result<(BasketSplit, SearchStats), SplitError> {
        let layout = GraphLayout::new(basket, &self.catalog);
        if layout.item_count() == 0 {
            return Ok((BasketSplit::new(), SearchStats::default()));
        }

        let limit = self.config.delivery_limit();
        if layout.delivery_count() > limit {
            return Err(SplitError::TooManyDeliveries {
                found: layout.delivery_count(),
                limit,
            });
        }

        // No configuration can route an item without eligible deliveries
        if let Some(item) = layout.unroutable_items().next() {
            warn!("item {} has no eligible delivery", item);
            return Err(SplitError::InfeasibleAssignment {
                item_count: layout.item_count(),
                delivery_count: layout.delivery_count(),
            });
        }

        debug!(
            "splitting {} items across {} deliveries",
            layout.item_count(),
            layout.delivery_count()
        );
        SearchContext::build(layout, &self.config)?.run()
    }

    /// Splits independent baskets in parallel, keeping input order
    pub fn split_all<S: AsRef<str> + Sync>(
        &self,
        baskets: &[Vec<S>],
    ) -> Vec<Result<BasketSplit, SplitError>> {
        baskets.par_iter().map(|basket| self.split(basket)).collect()
    }
}

impl BasketSplitSolver for BasketSplitter {
    fn split_basket(&self, basket: &[ItemId]) -> Result<BasketSplit, SplitError> {
        self.split(basket)
    }

    fn is_valid_split(&self, basket: &[ItemId], split: &BasketSplit) -> bool {
        let distinct: HashSet<&str> = basket.iter().map(String::as_str).collect();
        split.len() == distinct.len()
            && distinct.iter().all(|item| {
                split
                    .delivery_of(item)
                    .map_or(false, |delivery| self.catalog.is_eligible(item, delivery))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(entries: &[(&str, &[&str])]) -> BasketSplitter {
        BasketSplitter::new(
            entries
                .iter()
                .map(|(item, deliveries)| (*item, deliveries.iter().copied()))
                .collect(),
        )
    }

    #[test]
    fn test_layout_numbering() {
        let catalog: DeliveryCatalog = [("A", vec!["X", "Y", "X"]), ("B", vec!["Y", "Z"])]
            .into_iter()
            .collect();
        let layout = GraphLayout::new(&["A", "B", "A"], &catalog);

        assert_eq!(layout.items(), &["A".to_string(), "B".to_string()]);
        assert_eq!(
            layout.deliveries(),
            &["X".to_string(), "Y".to_string(), "Z".to_string()]
        );
        assert_eq!(layout.eligible, vec![vec![0, 1], vec![1, 2]]);
        assert_eq!(layout.node_count(), 7);
        assert_eq!(layout.source(), 5);
        assert_eq!(layout.sink(), 6);
        assert_eq!(layout.delivery_at(3).map(String::as_str), Some("Y"));
        assert_eq!(layout.delivery_at(1), None);
        assert_eq!(layout.delivery_at(5), None);
    }

    #[test]
    fn test_sink_tiers() {
        assert_eq!(SinkTier::Base.cost(), 10);
        assert_eq!(SinkTier::Favored.cost(), 1);
        assert_eq!(SinkTier::Disabled.capacity(), 0);
        assert_eq!(SinkTier::Penalized.capacity(), UNBOUNDED_CAPACITY);
        assert_eq!(SinkTier::Penalized.cost(), 20);
    }

    #[test]
    fn test_incumbent_tie_break() {
        let best = Incumbent {
            cost: 12,
            favored_flow: 2,
            split: BasketSplit::new(),
        };
        assert!(best.is_beaten_by(11, 0));
        assert!(best.is_beaten_by(12, 3));
        assert!(!best.is_beaten_by(12, 2));
        assert!(!best.is_beaten_by(13, 5));
    }

    #[test]
    fn test_two_deliveries_that_cannot_merge() {
        let splitter = splitter(&[("A", &["X"]), ("B", &["X"]), ("C", &["Y"])]);
        let split = splitter.split(&["A", "B", "C"]).unwrap();

        assert_eq!(split.delivery_of("A").map(String::as_str), Some("X"));
        assert_eq!(split.delivery_of("B").map(String::as_str), Some("X"));
        assert_eq!(split.delivery_of("C").map(String::as_str), Some("Y"));
    }

    #[test]
    fn test_shared_delivery_wins() {
        let splitter = splitter(&[("A", &["X", "Y"]), ("B", &["X", "Y"])]);
        let split = splitter.split(&["A", "B"]).unwrap();

        assert_eq!(split.deliveries().len(), 1);
        assert_eq!(split.delivery_of("A"), split.delivery_of("B"));
    }

    #[test]
    fn test_item_without_delivery_is_infeasible() {
        let splitter = splitter(&[("A", &[]), ("B", &["X"])]);
        assert_eq!(
            splitter.split(&["A", "B"]),
            Err(SplitError::InfeasibleAssignment {
                item_count: 2,
                delivery_count: 1
            })
        );
    }

    #[test]
    fn test_single_delivery_degenerates() {
        let splitter = splitter(&[("A", &["X"]), ("B", &["X"]), ("C", &["X"])]);
        let (split, stats) = splitter.split_with_stats(&["A", "B", "C"]).unwrap();

        assert_eq!(split.deliveries(), vec!["X"]);
        assert_eq!(stats.configurations, 1);
        assert_eq!(stats.feasible, 1);
    }

    #[test]
    fn test_search_visits_every_configuration() {
        let splitter = splitter(&[("A", &["X", "Y", "Z"]), ("B", &["Y"]), ("C", &["Z"])]);
        let (_, stats) = splitter.split_with_stats(&["A", "B", "C"]).unwrap();

        // k * 2^(k - 1) configurations for k = 3
        assert_eq!(stats.configurations, 12);
        assert!(stats.feasible > 0);
        assert!(stats.improvements >= 1);
    }

    #[test]
    fn test_empty_basket() {
        let splitter = splitter(&[("A", &["X"])]);
        let empty: [&str; 0] = [];
        assert_eq!(splitter.split(&empty), Ok(BasketSplit::new()));
    }

    #[test]
    fn test_too_many_deliveries() {
        let config = SplitterConfig {
            max_deliveries: 2,
            ..SplitterConfig::default()
        };
        let catalog: DeliveryCatalog = [("A", vec!["X", "Y", "Z"])].into_iter().collect();
        let splitter = BasketSplitter::with_config(catalog, config);

        assert_eq!(
            splitter.split(&["A"]),
            Err(SplitError::TooManyDeliveries { found: 3, limit: 2 })
        );
    }

    #[test]
    fn test_restores_leave_tiers_consistent() {
        let catalog: DeliveryCatalog = [("A", vec!["X", "Y"]), ("B", vec!["Y", "Z"])]
            .into_iter()
            .collect();
        let layout = GraphLayout::new(&["A", "B"], &catalog);
        let config = SplitterConfig::default();
        let mut context = SearchContext::build(layout, &config).unwrap();
        context.verify_tiers().unwrap();

        context.set_tier(0, SinkTier::Favored).unwrap();
        context.set_tier(2, SinkTier::Disabled).unwrap();
        context.set_tier(1, SinkTier::Disabled).unwrap();
        context.verify_tiers().unwrap();
        context.set_tier(1, SinkTier::Penalized).unwrap();
        context.set_tier(2, SinkTier::Penalized).unwrap();
        context.verify_tiers().unwrap();

        // A tier table that disagrees with the network is caught
        context.tiers[0] = SinkTier::Base;
        assert!(matches!(
            context.verify_tiers(),
            Err(SplitError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_restore_tier_changes_later_iterations() {
        // X is seen first and covers five items, Y covers six
        let catalog: DeliveryCatalog = (1..=10)
            .map(|i| {
                let deliveries = match i {
                    1..=4 => vec!["X"],
                    5 => vec!["X", "Y"],
                    _ => vec!["Y"],
                };
                (format!("I{}", i), deliveries)
            })
            .collect();
        let basket: Vec<String> = (1..=10).map(|i| format!("I{}", i)).collect();

        // Once X has been favored every other delivery costs the penalty, so Y cannot
        // catch up with X's first configuration
        let penalized = BasketSplitter::new(catalog.clone()).split(&basket).unwrap();
        assert_eq!(penalized.delivery_of("I5").map(String::as_str), Some("X"));
        assert_eq!(penalized.largest_group_size(), 5);

        let config = SplitterConfig {
            restore_to_base: true,
            ..SplitterConfig::default()
        };
        let restored = BasketSplitter::with_config(catalog, config)
            .split(&basket)
            .unwrap();
        assert_eq!(restored.delivery_of("I5").map(String::as_str), Some("Y"));
        assert_eq!(restored.largest_group_size(), 6);
    }

    #[test]
    fn test_is_valid_split() {
        let splitter = splitter(&[("A", &["X"]), ("B", &["X", "Y"])]);
        let basket = vec!["A".to_string(), "B".to_string()];
        let split = splitter.split_basket(&basket).unwrap();
        assert!(splitter.is_valid_split(&basket, &split));

        let mut wrong = BasketSplit::new();
        wrong.assign("A", "Y");
        wrong.assign("B", "Y");
        assert!(!splitter.is_valid_split(&basket, &wrong));
    }
}
