use geo::LineString;
use serde::Deserialize;
use wkt::TryFromWkt;

use super::de;
use crate::model::{RawEdge, RawRestriction, RoadNode, WaySet};
use crate::{Error, NodeId, WayId};

#[derive(Debug, Clone, Deserialize)]
pub struct FeedNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub length: f64,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub maxspeed: Option<String>,
    #[serde(default, deserialize_with = "de::text_list")]
    pub highway: Vec<String>,
    #[serde(default, deserialize_with = "de::way_set")]
    pub osmid: WaySet,
    /// WKT `LINESTRING`
    #[serde(default, deserialize_with = "de::optional_text")]
    pub geometry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedRestriction {
    pub id: i64,
    pub restriction: String,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub from: Option<WayId>,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub via: Option<NodeId>,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub to: Option<WayId>,
}

impl From<FeedNode> for RoadNode {
    fn from(node: FeedNode) -> Self {
        RoadNode::new(node.id, node.lat, node.lon)
    }
}

impl TryFrom<FeedEdge> for RawEdge {
    type Error = Error;

    fn try_from(edge: FeedEdge) -> Result<Self, Self::Error> {
        let geometry = edge
            .geometry
            .as_deref()
            .map(|text| {
                LineString::<f64>::try_from_wkt_str(text).map_err(|e| {
                    Error::InvalidData(format!(
                        "Invalid geometry for edge {} -> {}: {e}",
                        edge.source, edge.target
                    ))
                })
            })
            .transpose()?;

        Ok(RawEdge {
            tail: edge.source,
            head: edge.target,
            length: edge.length,
            maxspeed: edge.maxspeed,
            highway: edge.highway,
            ways: edge.osmid,
            geometry,
        })
    }
}

impl From<FeedRestriction> for RawRestriction {
    fn from(row: FeedRestriction) -> Self {
        RawRestriction {
            id: row.id,
            kind: row.restriction,
            from_way: row.from,
            via_node: row.via,
            to_way: row.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read<T: for<'de> Deserialize<'de>>(data: &str) -> Vec<T> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .unwrap()
    }

    #[test]
    fn test_edge_rows_collapse_list_shapes() {
        let rows: Vec<FeedEdge> = read(
            "source,target,length,maxspeed,highway,osmid,geometry\n\
             1,2,10.5,45 mph,residential,100,\n\
             2,3,20,,\"['primary', 'primary_link']\",\"[200, 201]\",\"LINESTRING (30 10, 30.1 10.1)\"\n",
        );
        assert_eq!(rows.len(), 2);

        let first = RawEdge::try_from(rows[0].clone()).unwrap();
        assert_eq!(first.maxspeed.as_deref(), Some("45 mph"));
        assert_eq!(first.road_class(), Some("residential"));
        assert_eq!(first.ways, WaySet::single(100));
        assert!(first.geometry.is_none());

        let second = RawEdge::try_from(rows[1].clone()).unwrap();
        assert_eq!(second.maxspeed, None);
        assert_eq!(second.highway, vec!["primary", "primary_link"]);
        assert!(second.ways.contains(200) && second.ways.contains(201));
        assert_eq!(second.geometry.map(|g| g.0.len()), Some(2));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let rows: Vec<FeedEdge> = read("source,target,length\n5,6,1.0\n");
        let edge = RawEdge::try_from(rows[0].clone()).unwrap();
        assert!(edge.highway.is_empty());
        assert!(edge.ways.is_empty());
    }

    #[test]
    fn test_invalid_geometry_is_reported() {
        let rows: Vec<FeedEdge> = read("source,target,length,geometry\n5,6,1.0,POINT\n");
        let err = RawEdge::try_from(rows[0].clone()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_restriction_rows_with_missing_members() {
        let rows: Vec<FeedRestriction> = read(
            "id,restriction,from,via,to\n\
             7,no_left_turn,10,2,20\n\
             8,only_straight_on,,nan,30.0\n",
        );
        let first = RawRestriction::from(rows[0].clone());
        assert_eq!(first.kind, "no_left_turn");
        assert_eq!(
            (first.from_way, first.via_node, first.to_way),
            (Some(10), Some(2), Some(20))
        );

        let second = RawRestriction::from(rows[1].clone());
        assert_eq!(
            (second.from_way, second.via_node, second.to_way),
            (None, None, Some(30))
        );
        assert!(second.is_mandatory());
    }
}
