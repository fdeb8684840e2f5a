pub mod basket_splitter;
pub mod extract;
pub mod min_cost_flow;

// Common algorithm traits
use crate::error::SplitError;
use crate::models::{BasketSplit, ItemId};

/// Trait for basket splitting solvers
pub trait BasketSplitSolver {
    /// Assign every item of the basket to exactly one eligible delivery
    fn split_basket(&self, basket: &[ItemId]) -> Result<BasketSplit, SplitError>;

    /// Check if a split routes every basket item through one eligible delivery
    fn is_valid_split(&self, basket: &[ItemId], split: &BasketSplit) -> bool;
}
