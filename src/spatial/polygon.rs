//! Simple polygon rings assembled from graph data.
//!
//! Two sources:
//!
//! - **Array mode**: a node property holding a list of point values.
//! - **Graph-walk mode**: an anchor node whose `first_rel` edge leads to the
//!   first vertex, each vertex linked to the next by a `next_rel` edge.
//!
//! Either way the result is explicitly closed: if the last coordinate is not
//! the first, a closing vertex copying the first is appended.

use serde::Serialize;
use tracing::{debug, trace};

use crate::model::NodeId;
use crate::storage::GraphView;
use crate::{Error, Result};
use super::config::PolygonConfig;
use super::coordinate::Coordinate;
use super::point::{ArrayPoint, DirectPoint, Point};
use super::walk::ChainWalker;

/// Where a ring vertex came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VertexSource {
    /// A node visited by a chain walk.
    Node(NodeId),
    /// An element of a point array property.
    ArrayIndex(usize),
    /// Appended to close the ring.
    Closing,
}

/// One position on a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vertex {
    pub coordinate: Coordinate,
    pub source: VertexSource,
}

impl Point for Vertex {
    fn coordinate(&self) -> Result<Coordinate> {
        Ok(self.coordinate.clone())
    }
}

/// Ordered, explicitly closed polygon boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    vertices: Vec<Vertex>,
}

impl Ring {
    // ========================================================================
    // Assembly
    // ========================================================================

    /// Build a ring from a node property holding a list of point values.
    ///
    /// An empty list gives an empty ring.
    pub fn from_array<G: GraphView + ?Sized>(graph: &G, node: NodeId, property: &str) -> Result<Self> {
        let value = graph.require_property(node, property)?;
        let values = value.as_list().ok_or_else(|| Error::TypeMismatch {
            context: format!("property `{property}` on node {node}"),
            expected: "LIST",
            got: value.type_name(),
        })?;

        let vertices = (0..values.len())
            .map(|index| {
                let point = ArrayPoint::new(values, index, node, property);
                Ok(Vertex {
                    coordinate: point.coordinate()?,
                    source: VertexSource::ArrayIndex(point.index()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(%node, property, points = vertices.len(), "assembled ring from array");
        Ok(Self::closed(vertices))
    }

    /// Build a ring by walking `start -first_rel-> v1 -next_rel-> v2 …`,
    /// reading each vertex's `point_property`, with the default walk bound.
    pub fn from_graph<G: GraphView + ?Sized>(
        graph: &G,
        start: NodeId,
        point_property: &str,
        first_rel: &str,
        next_rel: &str,
    ) -> Result<Self> {
        Self::from_graph_with(graph, start, point_property, first_rel, next_rel, &PolygonConfig::default())
    }

    /// [`Ring::from_graph`] with explicit settings.
    pub fn from_graph_with<G: GraphView + ?Sized>(
        graph: &G,
        start: NodeId,
        point_property: &str,
        first_rel: &str,
        next_rel: &str,
        config: &PolygonConfig,
    ) -> Result<Self> {
        let chain = ChainWalker::new(graph, first_rel, next_rel)
            .with_max_steps(config.max_walk_steps)
            .walk(start)?;

        let vertices = chain
            .into_iter()
            .map(|id| {
                let point = DirectPoint::new(graph, id, point_property);
                Ok(Vertex {
                    coordinate: point.coordinate()?,
                    source: VertexSource::Node(point.node()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(%start, points = vertices.len(), "assembled ring from chain");
        Ok(Self::closed(vertices))
    }

    /// Apply the closure rule: append a copy of the first vertex unless the
    /// last one already has the same coordinate.
    fn closed(mut vertices: Vec<Vertex>) -> Self {
        let closing = match (vertices.first(), vertices.last()) {
            (Some(first), Some(last)) if first.coordinate != last.coordinate => {
                Some(first.coordinate.clone())
            }
            _ => None,
        };
        if let Some(coordinate) = closing {
            trace!(points = vertices.len(), "appending closing vertex");
            vertices.push(Vertex { coordinate, source: VertexSource::Closing });
        }
        Self { vertices }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// First and last coordinates are equal. Always true for a non-empty
    /// assembled ring.
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => first.coordinate == last.coordinate,
            _ => false,
        }
    }

    pub fn points(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.vertices.iter().map(|v| &v.coordinate)
    }

    pub fn first(&self) -> Option<&Vertex> {
        self.vertices.first()
    }

    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    /// Ordinate count of the first vertex, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.vertices.first().map(|v| v.coordinate.dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::spatial::fixture::Fixture;
    use pretty_assertions::assert_eq;

    fn coords(ring: &Ring) -> Vec<Vec<f64>> {
        ring.coordinates().map(|c| c.as_slice().to_vec()).collect()
    }

    #[test]
    fn test_array_ring_is_closed() {
        let mut g = Fixture::default();
        let building = g.add_node(
            &["Building"],
            &[(
                "locations",
                Value::List(vec![
                    Value::cartesian(-10.0, -10.0),
                    Value::cartesian(10.0, -10.0),
                    Value::cartesian(10.0, 10.0),
                    Value::cartesian(0.0, 20.0),
                    Value::cartesian(-10.0, 10.0),
                ]),
            )],
        );

        let ring = Ring::from_array(&g, building, "locations").unwrap();
        assert_eq!(ring.len(), 6);
        assert!(ring.is_closed());
        assert_eq!(
            coords(&ring),
            vec![
                vec![-10.0, -10.0],
                vec![10.0, -10.0],
                vec![10.0, 10.0],
                vec![0.0, 20.0],
                vec![-10.0, 10.0],
                vec![-10.0, -10.0],
            ]
        );
        assert_eq!(ring.points()[2].source, VertexSource::ArrayIndex(2));
        assert_eq!(ring.last().unwrap().source, VertexSource::Closing);
    }

    #[test]
    fn test_pre_closed_array_is_unchanged() {
        let mut g = Fixture::default();
        let building = g.add_node(
            &["Building"],
            &[(
                "locations",
                Value::List(vec![
                    Value::cartesian(0.0, 0.0),
                    Value::cartesian(4.0, 0.0),
                    Value::cartesian(4.0, 4.0),
                    Value::cartesian(0.0, 4.0),
                    Value::cartesian(0.0, 0.0),
                ]),
            )],
        );

        let ring = Ring::from_array(&g, building, "locations").unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.last().unwrap().source, VertexSource::ArrayIndex(4));
    }

    #[test]
    fn test_single_point_array() {
        let mut g = Fixture::default();
        let n = g.add_node(&["Building"], &[("locations", Value::List(vec![Value::cartesian(1.0, 1.0)]))]);

        let ring = Ring::from_array(&g, n, "locations").unwrap();
        assert_eq!(ring.len(), 1);
        assert!(ring.is_closed());
    }

    #[test]
    fn test_empty_array() {
        let mut g = Fixture::default();
        let n = g.add_node(&["Building"], &[("locations", Value::List(Vec::new()))]);

        let ring = Ring::from_array(&g, n, "locations").unwrap();
        assert!(ring.is_empty());
        assert!(!ring.is_closed());
        assert_eq!(ring.dimension(), None);
    }

    #[test]
    fn test_array_of_raw_ordinates() {
        let mut g = Fixture::default();
        let n = g.add_node(
            &["Building"],
            &[(
                "locations",
                Value::List(vec![
                    Value::from(vec![0.0, 0.0, 1.0]),
                    Value::from(vec![2.0, 0.0, 1.0]),
                    Value::from(vec![2.0, 2.0, 1.0]),
                ]),
            )],
        );

        let ring = Ring::from_array(&g, n, "locations").unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.dimension(), Some(3));
    }

    #[test]
    fn test_array_errors() {
        let mut g = Fixture::default();
        let n = g.add_node(
            &["Building"],
            &[
                ("single", Value::cartesian(1.0, 1.0)),
                ("mixed", Value::List(vec![Value::cartesian(1.0, 1.0), Value::Bool(true)])),
                ("short", Value::List(vec![Value::from(vec![1.0])])),
            ],
        );

        assert!(matches!(
            Ring::from_array(&g, n, "locations"),
            Err(Error::MissingProperty { .. })
        ));
        assert!(matches!(
            Ring::from_array(&g, n, "single"),
            Err(Error::TypeMismatch { expected: "LIST", got: "POINT", .. })
        ));
        assert!(matches!(
            Ring::from_array(&g, n, "mixed"),
            Err(Error::TypeMismatch { expected: "POINT", got: "BOOLEAN", .. })
        ));
        assert!(matches!(
            Ring::from_array(&g, n, "short"),
            Err(Error::MalformedPoint { ordinates: 1 })
        ));
    }

    #[test]
    fn test_graph_ring() {
        let mut g = Fixture::default();
        let main = g.add_node(&["Main"], &[]);
        let markers = g.markers(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
        g.chain(main, &markers, "First", "Next");

        let ring = Ring::from_graph(&g, main, "location", "First", "Next").unwrap();
        assert_eq!(
            coords(&ring),
            vec![
                vec![-10.0, -10.0],
                vec![10.0, -10.0],
                vec![10.0, 10.0],
                vec![-10.0, 10.0],
                vec![-10.0, -10.0],
            ]
        );
        let sources: Vec<VertexSource> = ring.points().iter().map(|v| v.source).collect();
        assert_eq!(
            sources,
            vec![
                VertexSource::Node(markers[0]),
                VertexSource::Node(markers[1]),
                VertexSource::Node(markers[2]),
                VertexSource::Node(markers[3]),
                VertexSource::Closing,
            ]
        );
    }

    #[test]
    fn test_graph_ring_closed_by_edge() {
        let mut g = Fixture::default();
        let main = g.add_node(&["Main"], &[]);
        let markers = g.markers(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        g.chain(main, &markers, "First", "Next");
        g.link(markers[2], markers[0], "Next");

        let ring = Ring::from_graph(&g, main, "location", "First", "Next").unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.last().unwrap().source, VertexSource::Closing);
    }

    #[test]
    fn test_graph_ring_missing_vertex_property() {
        let mut g = Fixture::default();
        let main = g.add_node(&["Main"], &[]);
        let a = g.add_node(&["LocationMarker"], &[("location", Value::cartesian(0.0, 0.0))]);
        let b = g.add_node(&["LocationMarker"], &[("name", Value::from("no location"))]);
        g.chain(main, &[a, b], "First", "Next");

        let err = Ring::from_graph(&g, main, "location", "First", "Next").unwrap_err();
        assert!(matches!(err, Error::MissingProperty { node, .. } if node == b));
    }

    #[test]
    fn test_graph_ring_broken_chain() {
        let mut g = Fixture::default();
        let main = g.add_node(&["Main"], &[]);
        let markers = g.markers(&[(0.0, 0.0)]);
        g.link(main, markers[0], "Other");

        let err = Ring::from_graph(&g, main, "location", "First", "Next").unwrap_err();
        assert!(matches!(err, Error::BrokenChain { node, ref rel_type } if node == main && rel_type == "First"));
    }

    #[test]
    fn test_graph_ring_respects_config_bound() {
        let mut g = Fixture::default();
        let main = g.add_node(&["Main"], &[]);
        let markers = g.markers(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        g.chain(main, &markers, "First", "Next");

        let tight = PolygonConfig { max_walk_steps: 3 };
        let err = Ring::from_graph_with(&g, main, "location", "First", "Next", &tight).unwrap_err();
        assert!(matches!(err, Error::CycleDetected { steps: 3, .. }));

        let enough = PolygonConfig { max_walk_steps: 4 };
        let ring = Ring::from_graph_with(&g, main, "location", "First", "Next", &enough).unwrap();
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_vertex_is_a_point() {
        let vertex = Vertex { coordinate: Coordinate::xy(3.0, 4.0), source: VertexSource::Closing };
        assert_eq!(vertex.coordinate().unwrap(), Coordinate::xy(3.0, 4.0));
    }

    #[test]
    fn test_ring_serializes() {
        let mut g = Fixture::default();
        let n = g.add_node(
            &["Building"],
            &[("locations", Value::List(vec![Value::cartesian(0.0, 0.0), Value::cartesian(1.0, 0.0)]))],
        );
        let ring = Ring::from_array(&g, n, "locations").unwrap();

        let json = serde_json::to_value(&ring).unwrap();
        assert_eq!(json["vertices"][0]["coordinate"], serde_json::json!([0.0, 0.0]));
        assert_eq!(json["vertices"][2]["source"], serde_json::json!("Closing"));
    }

    mod laws {
        use super::*;
        use crate::spatial::{CompositePoint, Point};
        use proptest::prelude::*;

        fn positions() -> impl Strategy<Value = Vec<(f64, f64)>> {
            prop::collection::vec((-100i32..100, -100i32..100), 1..24)
                .prop_map(|v| v.into_iter().map(|(x, y)| (x as f64, y as f64)).collect())
        }

        proptest! {
            #[test]
            fn array_ring_obeys_closure_law(pos in positions()) {
                let mut g = Fixture::default();
                let values = pos.iter().map(|&(x, y)| Value::cartesian(x, y)).collect::<Vec<_>>();
                let n = g.add_node(&["Building"], &[("locations", Value::List(values))]);

                let ring = Ring::from_array(&g, n, "locations").unwrap();
                let expected_len = if pos.first() == pos.last() { pos.len() } else { pos.len() + 1 };
                prop_assert_eq!(ring.len(), expected_len);
                prop_assert!(ring.is_closed());
                for (vertex, &(x, y)) in ring.points().iter().zip(&pos) {
                    prop_assert_eq!(vertex.coordinate.as_slice(), &[x, y][..]);
                }
            }

            #[test]
            fn graph_ring_keeps_traversal_order(pos in positions()) {
                let mut g = Fixture::default();
                let main = g.add_node(&["Main"], &[]);
                let markers = g.markers(&pos);
                g.chain(main, &markers, "First", "Next");

                let ring = Ring::from_graph(&g, main, "location", "First", "Next").unwrap();
                prop_assert!(ring.is_closed());
                let visited: Vec<VertexSource> = ring.points()[..markers.len()].iter().map(|v| v.source).collect();
                let expected: Vec<VertexSource> = markers.iter().map(|&id| VertexSource::Node(id)).collect();
                prop_assert_eq!(visited, expected);
                let expected_len = if pos.first() == pos.last() { pos.len() } else { pos.len() + 1 };
                prop_assert_eq!(ring.len(), expected_len);
            }

            #[test]
            fn composite_point_matches_supplied_order(x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e3f64..1e3) {
                let mut g = Fixture::default();
                let n = g.add_node(&["Location"], &[("x", Value::Float(x)), ("y", Value::Float(y)), ("z", Value::Float(z))]);

                let xy = CompositePoint::new(&g, n, "x", "y").coordinate().unwrap();
                prop_assert_eq!(xy.as_slice(), &[x, y][..]);
                let zyx = CompositePoint::new(&g, n, "z", "y").with_z("x").coordinate().unwrap();
                prop_assert_eq!(zyx.as_slice(), &[z, y, x][..]);
            }
        }
    }
}
