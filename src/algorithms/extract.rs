// Reads the item -> delivery assignment out of a solved network

use crate::algorithms::basket_splitter::GraphLayout;
use crate::models::{BasketSplit, FlowNetwork};

/// Maps every item to the deliveries its outgoing edges carry flow to
pub fn extract_split(network: &FlowNetwork, layout: &GraphLayout) -> BasketSplit {
    let mut split = BasketSplit::new();

    for (position, item) in layout.items().iter().enumerate() {
        split.ensure_item(item.as_str());
        for (_, edge) in network.edges_from(layout.item_node(position)) {
            if edge.is_residual() || edge.flow <= 0 {
                continue;
            }
            if let Some(delivery) = layout.delivery_at(edge.to) {
                split.assign(item.as_str(), delivery.as_str());
            }
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryCatalog;

    #[test]
    fn test_extract_follows_positive_flow() {
        let catalog: DeliveryCatalog = [("A", vec!["X", "Y"]), ("B", vec!["Y"])]
            .into_iter()
            .collect();
        let layout = GraphLayout::new(&["A", "B"], &catalog);

        let mut network = FlowNetwork::new(layout.node_count());
        let a_to_x = network
            .add_edge(layout.item_node(0), layout.delivery_node(0), 1, 0)
            .unwrap();
        network
            .add_edge(layout.item_node(0), layout.delivery_node(1), 1, 0)
            .unwrap();
        let b_to_y = network
            .add_edge(layout.item_node(1), layout.delivery_node(1), 1, 0)
            .unwrap();
        network.augment(a_to_x, 1);
        network.augment(b_to_y, 1);

        let split = extract_split(&network, &layout);
        assert_eq!(split.delivery_of("A").map(String::as_str), Some("X"));
        assert_eq!(split.delivery_of("B").map(String::as_str), Some("Y"));
    }

    #[test]
    fn test_extract_keeps_unrouted_items() {
        let catalog: DeliveryCatalog = [("A", vec!["X"])].into_iter().collect();
        let layout = GraphLayout::new(&["A"], &catalog);
        let network = FlowNetwork::new(layout.node_count());

        let split = extract_split(&network, &layout);
        assert_eq!(split.len(), 1);
        assert!(!split.is_complete());
    }
}
