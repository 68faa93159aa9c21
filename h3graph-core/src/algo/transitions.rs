//! Edge-expanded (line) graph construction.
//!
//! Every pair of an edge entering a node and an edge leaving it is a
//! candidate turn. Turning back onto the very same edge and forbidden
//! turns are removed.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use itertools::Itertools;
use log::info;
use petgraph::{Direction, graph::NodeIndex};
use rayon::prelude::*;
use serde::Serialize;

use super::restrictions::ForbiddenTurns;
use crate::EdgeIndex;
use crate::model::{EdgeRegistry, TransitionRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransitionStats {
    pub candidates: usize,
    pub u_turns_removed: usize,
    pub forbidden_removed: usize,
    pub transitions: usize,
}

impl Add for TransitionStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            candidates: self.candidates + other.candidates,
            u_turns_removed: self.u_turns_removed + other.u_turns_removed,
            forbidden_removed: self.forbidden_removed + other.forbidden_removed,
            transitions: self.transitions + other.transitions,
        }
    }
}

impl Sum for TransitionStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for TransitionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} candidates kept ({} u-turns, {} forbidden)",
            self.transitions, self.candidates, self.u_turns_removed, self.forbidden_removed
        )
    }
}

/// Cartesian product of the edges entering and leaving one node
pub fn candidate_transitions<'a>(
    incoming: &'a [EdgeIndex],
    outgoing: &'a [EdgeIndex],
) -> impl Iterator<Item = TransitionRecord> + 'a {
    incoming
        .iter()
        .copied()
        .cartesian_product(outgoing.iter().copied())
        .map(TransitionRecord::from)
}

/// Legal transitions through one via node
pub fn expand_node(
    incoming: &[EdgeIndex],
    outgoing: &[EdgeIndex],
    forbidden: &ForbiddenTurns,
) -> (Vec<TransitionRecord>, TransitionStats) {
    let mut stats = TransitionStats::default();
    let mut transitions = Vec::new();

    for turn in candidate_transitions(incoming, outgoing) {
        stats.candidates += 1;
        if turn.incoming_edge == turn.outgoing_edge {
            stats.u_turns_removed += 1;
        } else if forbidden.contains(turn.incoming_edge, turn.outgoing_edge) {
            stats.forbidden_removed += 1;
        } else {
            transitions.push(turn);
        }
    }
    stats.transitions = transitions.len();

    (transitions, stats)
}

/// Builds the full transition set, sorted by `(incoming, outgoing)`.
///
/// A transition's via node is the shared endpoint of its edges, so no
/// pair is produced by two different nodes.
pub fn build_transitions(
    registry: &EdgeRegistry,
    forbidden: &ForbiddenTurns,
    parallel: bool,
) -> (Vec<TransitionRecord>, TransitionStats) {
    let expand = |node: NodeIndex| {
        let incoming = registry.edges_at(node, Direction::Incoming);
        let outgoing = registry.edges_at(node, Direction::Outgoing);
        expand_node(&incoming, &outgoing, forbidden)
    };

    let nodes: Vec<NodeIndex> = registry.node_indices().collect();
    let per_node: Vec<(Vec<TransitionRecord>, TransitionStats)> = if parallel {
        nodes.into_par_iter().map(expand).collect()
    } else {
        nodes.into_iter().map(expand).collect()
    };

    let stats: TransitionStats = per_node.iter().map(|(_, stats)| *stats).sum();
    let mut transitions: Vec<TransitionRecord> = Vec::with_capacity(stats.transitions);
    for (node_transitions, _) in per_node {
        transitions.extend(node_transitions);
    }
    transitions.sort_unstable();

    info!("Built edge graph: {stats}");
    (transitions, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawEdge;

    const A: EdgeIndex = 0;
    const B: EdgeIndex = 1;
    const C: EdgeIndex = 2;

    fn pairs(transitions: &[TransitionRecord]) -> Vec<(EdgeIndex, EdgeIndex)> {
        transitions
            .iter()
            .map(|t| (t.incoming_edge, t.outgoing_edge))
            .sorted()
            .collect()
    }

    #[test]
    fn test_candidates_are_the_cartesian_product() {
        let candidates: Vec<_> = candidate_transitions(&[A, B], &[A, C]).collect();
        assert_eq!(
            pairs(&candidates),
            vec![(A, A), (A, C), (B, A), (B, C)]
        );
    }

    #[test]
    fn test_same_edge_turn_is_removed() {
        let (transitions, stats) = expand_node(&[A, B], &[A, C], &ForbiddenTurns::default());
        assert_eq!(pairs(&transitions), vec![(A, C), (B, A), (B, C)]);
        assert_eq!(stats.candidates, 4);
        assert_eq!(stats.u_turns_removed, 1);
        assert_eq!(stats.forbidden_removed, 0);
    }

    #[test]
    fn test_forbidden_turn_is_removed() {
        let forbidden: ForbiddenTurns = [(B, C)].into_iter().collect();
        let (transitions, stats) = expand_node(&[A, B], &[A, C], &forbidden);
        assert_eq!(pairs(&transitions), vec![(A, C), (B, A)]);
        assert_eq!(stats.forbidden_removed, 1);
    }

    #[test]
    fn test_forbidden_pairs_are_order_sensitive() {
        let forbidden: ForbiddenTurns = [(C, B)].into_iter().collect();
        let (transitions, _) = expand_node(&[A, B], &[A, C], &forbidden);
        assert_eq!(pairs(&transitions), vec![(A, C), (B, A), (B, C)]);
    }

    #[test]
    fn test_empty_sides_yield_nothing() {
        let (transitions, stats) = expand_node(&[], &[A, B], &ForbiddenTurns::default());
        assert!(transitions.is_empty());
        assert_eq!(stats, TransitionStats::default());
    }

    #[test]
    fn test_build_over_graph() {
        // 1 <-> 2 -> 3
        let registry = EdgeRegistry::build(&[
            RawEdge::new(1, 2, 1.0),
            RawEdge::new(2, 1, 1.0),
            RawEdge::new(2, 3, 1.0),
        ])
        .unwrap();

        let (transitions, stats) = build_transitions(&registry, &ForbiddenTurns::default(), false);
        // at node 2: 0 -> 1, 0 -> 2; at node 1: 1 -> 0
        assert_eq!(pairs(&transitions), vec![(0, 1), (0, 2), (1, 0)]);
        assert_eq!(stats.transitions, 3);
        assert_eq!(
            stats.candidates,
            stats.transitions + stats.u_turns_removed + stats.forbidden_removed
        );

        let (parallel, parallel_stats) =
            build_transitions(&registry, &ForbiddenTurns::default(), true);
        assert_eq!(transitions, parallel);
        assert_eq!(stats, parallel_stats);
    }
}
