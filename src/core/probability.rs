//! Berechnung der Erreichbarkeits-Wahrscheinlichkeit jedes Knotens.
//!
//! Jeder Wurzelknoten startet mit 1.0 (Wurzeln sind unabhängig, nicht
//! exklusiv). Eine Verzweigung mit lokaler Wahrscheinlichkeit `p` und
//! eingehender Wahrscheinlichkeit `P` gibt `P·p` an ihre Success-Kinder
//! und `P·(1−p)` an ihre Failure-Kinder weiter.

use super::event::Event;
use super::node::{Node, NodeKind};
use indexmap::IndexMap;

/// Reach-Wahrscheinlichkeit pro Knoten-ID in Pre-Order
pub type ReachMap = IndexMap<u64, f64>;

/// Bringt eine Wahrscheinlichkeit in `[0, 1]`; nicht-endliche Werte ergeben 0.
pub fn sanitize_probability(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Berechnet die Reach-Wahrscheinlichkeiten eines Events.
pub fn compute_reach(event: &Event) -> ReachMap {
    compute_reach_for(&event.model)
}

/// Berechnet die Reach-Wahrscheinlichkeiten einer Wurzel-Sequenz.
pub fn compute_reach_for(roots: &[Node]) -> ReachMap {
    let mut reach = ReachMap::with_capacity(roots.len());
    for root in roots {
        propagate(root, 1.0, &mut reach);
    }
    reach
}

fn propagate(node: &Node, incoming: f64, reach: &mut ReachMap) {
    reach.insert(node.id, incoming);
    if let NodeKind::Branch { params, children } = &node.kind {
        // Wert wird bei jeder Berechnung frisch gelesen
        let p = sanitize_probability(params.split_probability);
        for child in &children.on_success {
            propagate(child, incoming * p, reach);
        }
        for child in &children.on_failure {
            propagate(child, incoming * (1.0 - p), reach);
        }
    }
}

/// Aufsummierte Erwartungswerte der Blatt-Aktionen eines Events
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReachSummary {
    /// Anzahl der Verzweigungen
    pub branches: usize,
    /// Anzahl der Blatt-Aktionen
    pub leaves: usize,
    /// Erwartete Anzahl gespawnter Items (Σ reach · amount)
    pub expected_items: f64,
    /// Erwartete Anzahl gespawnter Kreaturen (Σ reach · count)
    pub expected_creatures: f64,
    /// Erwartete Anzahl angewendeter Afflictions (Σ reach)
    pub expected_afflictions: f64,
}

/// Fasst die Reach-Werte eines Events pro Aktionsart zusammen.
///
/// Knoten ohne Eintrag in `reach` zählen mit Wahrscheinlichkeit 0.
pub fn summarize(event: &Event, reach: &ReachMap) -> ReachSummary {
    let mut summary = ReachSummary::default();
    super::tree::walk_preorder(&event.model, &mut |node, _| {
        let p = reach.get(&node.id).copied().unwrap_or(0.0);
        match &node.kind {
            NodeKind::Branch { .. } => summary.branches += 1,
            NodeKind::SpawnItem(params) => {
                summary.leaves += 1;
                summary.expected_items += p * f64::from(params.amount);
            }
            NodeKind::SpawnCreature(params) => {
                summary.leaves += 1;
                summary.expected_creatures += p * f64::from(params.count);
            }
            NodeKind::ApplyAffliction(_) => {
                summary.leaves += 1;
                summary.expected_afflictions += p;
            }
        }
    });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::{BranchParams, BranchSide, NodeKindTag, NodeParams};
    use approx::assert_relative_eq;

    fn branch(id: u64, p: f64) -> Node {
        let mut node = Node::new(id, NodeKindTag::Branch);
        node.set_params(NodeParams::Branch(BranchParams {
            split_probability: p,
        }));
        node
    }

    #[test]
    fn roots_start_at_one() {
        let roots = vec![
            Node::new(1, NodeKindTag::SpawnItem),
            Node::new(2, NodeKindTag::ApplyAffliction),
        ];
        let reach = compute_reach_for(&roots);
        assert_eq!(reach.get(&1), Some(&1.0));
        assert_eq!(reach.get(&2), Some(&1.0));
    }

    #[test]
    fn nested_branches_multiply() {
        let mut outer = branch(1, 0.5);
        let mut inner = branch(2, 0.2);
        inner
            .branch_mut(BranchSide::Success)
            .unwrap()
            .push(Node::new(3, NodeKindTag::SpawnItem));
        inner
            .branch_mut(BranchSide::Failure)
            .unwrap()
            .push(Node::new(4, NodeKindTag::SpawnItem));
        outer.branch_mut(BranchSide::Failure).unwrap().push(inner);

        let reach = compute_reach_for(&[outer]);
        assert_relative_eq!(reach[&1], 1.0);
        assert_relative_eq!(reach[&2], 0.5);
        assert_relative_eq!(reach[&3], 0.1);
        assert_relative_eq!(reach[&4], 0.4);
        // Erhaltung: P·p + P·(1−p) == P
        assert_relative_eq!(reach[&3] + reach[&4], reach[&2]);
        assert_eq!(reach.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn invalid_split_probability_reads_as_zero() {
        let mut node = Node::new(1, NodeKindTag::Branch);
        if let NodeKind::Branch { params, .. } = &mut node.kind {
            params.split_probability = f64::NAN;
        }
        node.branch_mut(BranchSide::Success)
            .unwrap()
            .push(Node::new(2, NodeKindTag::SpawnItem));
        node.branch_mut(BranchSide::Failure)
            .unwrap()
            .push(Node::new(3, NodeKindTag::SpawnItem));

        let reach = compute_reach_for(&[node]);
        assert_eq!(reach[&2], 0.0);
        assert_eq!(reach[&3], 1.0);
    }

    #[test]
    fn summary_weights_leaf_amounts() {
        let mut root = branch(1, 0.25);
        let mut item = Node::new(2, NodeKindTag::SpawnItem);
        if let NodeKind::SpawnItem(params) = &mut item.kind {
            params.amount = 4;
        }
        root.branch_mut(BranchSide::Success).unwrap().push(item);
        root.branch_mut(BranchSide::Failure)
            .unwrap()
            .push(Node::new(3, NodeKindTag::ApplyAffliction));

        let event = Event {
            name: "e".into(),
            model: vec![root],
        };
        let reach = compute_reach(&event);
        let summary = summarize(&event, &reach);
        assert_eq!(summary.branches, 1);
        assert_eq!(summary.leaves, 2);
        assert_relative_eq!(summary.expected_items, 1.0);
        assert_relative_eq!(summary.expected_afflictions, 0.75);
        assert_relative_eq!(summary.expected_creatures, 0.0);
    }
}
