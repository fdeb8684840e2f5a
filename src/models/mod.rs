// Models module - exports all model types

mod basket_split;
mod catalog;
mod edge;
mod flow_network;

// Re-export model types
pub use self::basket_split::BasketSplit;
pub use self::catalog::DeliveryCatalog;
pub use self::edge::Edge;
pub use self::flow_network::FlowNetwork;

// Common type aliases for improved code readability
pub type ItemId = String;
pub type DeliveryId = String;
pub type NodeIndex = usize;
pub type EdgeIndex = usize;
pub type Capacity = i64;
pub type Cost = i64;
pub type Flow = i64;
