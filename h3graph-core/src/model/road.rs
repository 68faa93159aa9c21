//! Raw road graph components, as handed over by the graph provider

use std::fmt;

use geo::{LineString, Point};

use crate::{NodeId, WayId};

/// Road graph node
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNode {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Directed road segment before any annotation
#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    pub tail: NodeId,
    pub head: NodeId,
    /// Length in meters
    pub length: f64,
    /// Raw `maxspeed` tag, possibly with a unit suffix
    pub maxspeed: Option<String>,
    /// `highway` tag values; merged edges may carry several
    pub highway: Vec<String>,
    /// Ways this edge was built from
    pub ways: WaySet,
    pub geometry: Option<LineString<f64>>,
}

impl RawEdge {
    pub fn new(tail: NodeId, head: NodeId, length: f64) -> Self {
        Self {
            tail,
            head,
            length,
            maxspeed: None,
            highway: Vec::new(),
            ways: WaySet::default(),
            geometry: None,
        }
    }

    #[must_use]
    pub fn with_maxspeed(mut self, maxspeed: impl Into<String>) -> Self {
        self.maxspeed = Some(maxspeed.into());
        self
    }

    #[must_use]
    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway.push(highway.into());
        self
    }

    #[must_use]
    pub fn with_way(mut self, way: WayId) -> Self {
        self.ways = WaySet::single(way);
        self
    }

    #[must_use]
    pub fn with_ways(mut self, ways: WaySet) -> Self {
        self.ways = ways;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.tail == self.head
    }

    /// First road class, used for speed defaults
    pub fn road_class(&self) -> Option<&str> {
        self.highway.first().map(String::as_str)
    }
}

/// Set of way identifiers carried by an edge.
///
/// A scalar way id is stored as a singleton, so matching never
/// has to branch on the attribute shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WaySet(Vec<WayId>);

impl WaySet {
    pub fn single(way: WayId) -> Self {
        Self(vec![way])
    }

    pub fn contains(&self, way: WayId) -> bool {
        self.0.binary_search(&way).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = WayId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<WayId> for WaySet {
    fn from(way: WayId) -> Self {
        Self::single(way)
    }
}

impl<const N: usize> From<[WayId; N]> for WaySet {
    fn from(ways: [WayId; N]) -> Self {
        ways.into_iter().collect()
    }
}

impl FromIterator<WayId> for WaySet {
    fn from_iter<I: IntoIterator<Item = WayId>>(iter: I) -> Self {
        let mut ways: Vec<WayId> = iter.into_iter().collect();
        ways.sort_unstable();
        ways.dedup();
        Self(ways)
    }
}

impl fmt::Display for WaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [way] => write!(f, "{way}"),
            ways => {
                write!(f, "[")?;
                for (i, way) in ways.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{way}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Turn restriction relation as extracted from OSM.
/// Any member may be missing in the source data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRestriction {
    pub id: i64,
    /// Restriction kind, e.g. `no_left_turn`; passed through untouched
    pub kind: String,
    pub from_way: Option<WayId>,
    pub via_node: Option<NodeId>,
    pub to_way: Option<WayId>,
}

impl RawRestriction {
    /// `only_*` kinds forbid every other exit, which is not expressed here
    pub fn is_mandatory(&self) -> bool {
        self.kind.starts_with("only_")
    }
}

/// Directed road graph handed over by the raw graph provider.
/// Edge order is the enumeration order used for edge indices.
#[derive(Debug, Clone, Default)]
pub struct RawGraph {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<RawEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_way_set_membership() {
        let ways = WaySet::from([42, 7, 42]);
        assert_eq!(ways.len(), 2);
        assert!(ways.contains(7));
        assert!(ways.contains(42));
        assert!(!ways.contains(8));
    }

    #[test]
    fn test_way_set_display() {
        assert_eq!(WaySet::single(5).to_string(), "5");
        assert_eq!(WaySet::from([9, 3]).to_string(), "[3, 9]");
        assert_eq!(WaySet::default().to_string(), "");
    }

    #[test]
    fn test_road_class_uses_first_value() {
        let edge = RawEdge::new(1, 2, 10.0)
            .with_highway("primary")
            .with_highway("secondary");
        assert_eq!(edge.road_class(), Some("primary"));
        assert_eq!(RawEdge::new(1, 2, 10.0).road_class(), None);
    }
}
