//! Turn restriction resolution.
//!
//! A restriction names ways and a via node; here it is matched against the
//! directed edges around the via node and turned into a forbidden
//! `(incoming, outgoing)` edge pair. Coverage is best effort: restrictions
//! that cannot be matched are skipped with a reason, never failed.
//!
//! Every kind, including `only_*`, is encoded as the single named pair.
//! For `only_*` kinds this forbids the named exit instead of all others;
//! such restrictions are counted so the gap stays visible.

use std::fmt;

use hashbrown::HashSet;
use log::{debug, info, warn};
use serde::Serialize;

use crate::model::{EdgeRecord, EdgeRegistry, RawRestriction, TransitionRecord};
use crate::{EdgeIndex, WayId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Relation has no via node, from way or to way member
    IncompleteRelation,
    ViaNotInGraph,
    FromWayNotFound,
    ToWayNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::IncompleteRelation => "incomplete relation",
            SkipReason::ViaNotInGraph => "via node not in graph",
            SkipReason::FromWayNotFound => "no incoming edge on from way",
            SkipReason::ToWayNotFound => "no outgoing edge on to way",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionOutcome {
    Forbidden(TransitionRecord),
    Skipped(SkipReason),
}

/// Set of forbidden `(incoming, outgoing)` pairs; order sensitive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenTurns(HashSet<TransitionRecord>);

impl ForbiddenTurns {
    pub fn contains(&self, incoming: EdgeIndex, outgoing: EdgeIndex) -> bool {
        self.0.contains(&TransitionRecord::new(incoming, outgoing))
    }

    pub fn insert(&mut self, turn: TransitionRecord) -> bool {
        self.0.insert(turn)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(EdgeIndex, EdgeIndex)> for ForbiddenTurns {
    fn from_iter<I: IntoIterator<Item = (EdgeIndex, EdgeIndex)>>(iter: I) -> Self {
        Self(iter.into_iter().map(TransitionRecord::from).collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RestrictionStats {
    pub total: usize,
    pub resolved: usize,
    /// `only_*` restrictions encoded as a single forbidden pair
    pub mandatory_simplified: usize,
    pub incomplete: usize,
    pub via_not_in_graph: usize,
    pub from_way_not_found: usize,
    pub to_way_not_found: usize,
}

impl RestrictionStats {
    fn record(&mut self, restriction: &RawRestriction, outcome: RestrictionOutcome) {
        self.total += 1;
        match outcome {
            RestrictionOutcome::Forbidden(_) => {
                self.resolved += 1;
                if restriction.is_mandatory() {
                    self.mandatory_simplified += 1;
                }
            }
            RestrictionOutcome::Skipped(SkipReason::IncompleteRelation) => self.incomplete += 1,
            RestrictionOutcome::Skipped(SkipReason::ViaNotInGraph) => self.via_not_in_graph += 1,
            RestrictionOutcome::Skipped(SkipReason::FromWayNotFound) => {
                self.from_way_not_found += 1;
            }
            RestrictionOutcome::Skipped(SkipReason::ToWayNotFound) => self.to_way_not_found += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.total - self.resolved
    }
}

impl fmt::Display for RestrictionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} resolved ({} incomplete, {} via not in graph, {} from way not found, {} to way not found)",
            self.resolved,
            self.total,
            self.incomplete,
            self.via_not_in_graph,
            self.from_way_not_found,
            self.to_way_not_found
        )
    }
}

/// Lowest-indexed candidate edge built from `way`
fn find_edge(candidates: &[EdgeIndex], edges: &[EdgeRecord], way: WayId) -> Option<EdgeIndex> {
    candidates
        .iter()
        .copied()
        .find(|&index| edges.get(index).is_some_and(|edge| edge.ways.contains(way)))
}

pub fn resolve_restriction(
    restriction: &RawRestriction,
    registry: &EdgeRegistry,
    edges: &[EdgeRecord],
) -> RestrictionOutcome {
    let (Some(via), Some(from_way), Some(to_way)) = (
        restriction.via_node,
        restriction.from_way,
        restriction.to_way,
    ) else {
        return RestrictionOutcome::Skipped(SkipReason::IncompleteRelation);
    };

    if !registry.contains_node(via) {
        return RestrictionOutcome::Skipped(SkipReason::ViaNotInGraph);
    }

    let Some(incoming) = find_edge(&registry.incoming(via), edges, from_way) else {
        return RestrictionOutcome::Skipped(SkipReason::FromWayNotFound);
    };
    let Some(outgoing) = find_edge(&registry.outgoing(via), edges, to_way) else {
        return RestrictionOutcome::Skipped(SkipReason::ToWayNotFound);
    };

    RestrictionOutcome::Forbidden(TransitionRecord::new(incoming, outgoing))
}

/// Resolves all restrictions into forbidden turns
pub fn resolve_restrictions(
    restrictions: &[RawRestriction],
    registry: &EdgeRegistry,
    edges: &[EdgeRecord],
) -> (ForbiddenTurns, RestrictionStats) {
    let mut forbidden = ForbiddenTurns::default();
    let mut stats = RestrictionStats::default();

    for restriction in restrictions {
        let outcome = resolve_restriction(restriction, registry, edges);
        match outcome {
            RestrictionOutcome::Forbidden(turn) => {
                forbidden.insert(turn);
            }
            RestrictionOutcome::Skipped(reason) => {
                debug!("Skipping restriction {}: {reason}", restriction.id);
            }
        }
        stats.record(restriction, outcome);
    }

    info!(
        "Resolved {} of {} turn restrictions into {} forbidden turns",
        stats.resolved,
        stats.total,
        forbidden.len()
    );
    if stats.mandatory_simplified > 0 {
        warn!(
            "{} only_* restrictions were encoded as a single forbidden turn; \
            other exits at their via nodes stay allowed",
            stats.mandatory_simplified
        );
    }

    (forbidden, stats)
}
