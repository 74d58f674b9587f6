//! Point adapters: views over graph data that yield one coordinate.

use smallvec::SmallVec;

use crate::model::{NodeId, Value};
use crate::storage::GraphView;
use crate::{Error, Result};
use super::coordinate::{Coordinate, decode_in};

/// Anything that can produce exactly one coordinate.
///
/// Implementations read the graph on every call and hold no state of their
/// own, so repeated calls against the same snapshot return the same value.
pub trait Point {
    fn coordinate(&self) -> Result<Coordinate>;
}

// ============================================================================
// DirectPoint
// ============================================================================

/// A point stored as a single point-valued property on a node.
pub struct DirectPoint<'g, G: GraphView + ?Sized> {
    graph: &'g G,
    node: NodeId,
    property: String,
}

impl<'g, G: GraphView + ?Sized> DirectPoint<'g, G> {
    pub fn new(graph: &'g G, node: NodeId, property: impl Into<String>) -> Self {
        Self { graph, node, property: property.into() }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl<G: GraphView + ?Sized> Point for DirectPoint<'_, G> {
    fn coordinate(&self) -> Result<Coordinate> {
        let value = self.graph.require_property(self.node, &self.property)?;
        decode_in(value, || format!("property `{}` on node {}", self.property, self.node))
    }
}

// ============================================================================
// CompositePoint
// ============================================================================

/// A point assembled from separate numeric properties, e.g. `x` and `y`.
///
/// Ordinates come out in the order the property names were given.
pub struct CompositePoint<'g, G: GraphView + ?Sized> {
    graph: &'g G,
    node: NodeId,
    keys: SmallVec<[String; 3]>,
}

impl<'g, G: GraphView + ?Sized> CompositePoint<'g, G> {
    pub fn new(
        graph: &'g G,
        node: NodeId,
        x: impl Into<String>,
        y: impl Into<String>,
    ) -> Self {
        let mut keys = SmallVec::new();
        keys.push(x.into());
        keys.push(y.into());
        Self { graph, node, keys }
    }

    /// Add a third ordinate read from `z`.
    pub fn with_z(mut self, z: impl Into<String>) -> Self {
        self.keys.truncate(2);
        self.keys.push(z.into());
        self
    }
}

impl<G: GraphView + ?Sized> Point for CompositePoint<'_, G> {
    fn coordinate(&self) -> Result<Coordinate> {
        let mut ordinates = [0.0f64; 3];
        for (slot, key) in ordinates.iter_mut().zip(&self.keys) {
            let value = self.graph.require_property(self.node, key)?;
            *slot = value.as_float().ok_or_else(|| Error::TypeMismatch {
                context: format!("property `{key}` on node {}", self.node),
                expected: "FLOAT",
                got: value.type_name(),
            })?;
        }
        let [x, y, z] = ordinates;
        Ok(match self.keys.len() {
            3 => Coordinate::xyz(x, y, z),
            _ => Coordinate::xy(x, y),
        })
    }
}

// ============================================================================
// ArrayPoint
// ============================================================================

/// One element of a point array read off a node.
///
/// Borrows the originating array so that a polygon built from an array
/// property does one property lookup, not one per vertex.
pub struct ArrayPoint<'a> {
    values: &'a [Value],
    index: usize,
    node: NodeId,
    property: &'a str,
}

impl<'a> ArrayPoint<'a> {
    pub fn new(values: &'a [Value], index: usize, node: NodeId, property: &'a str) -> Self {
        Self { values, index, node, property }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Point for ArrayPoint<'_> {
    fn coordinate(&self) -> Result<Coordinate> {
        let value = self.values.get(self.index).ok_or_else(|| {
            Error::NotFound(format!(
                "element {} of `{}` on node {}",
                self.index, self.property, self.node
            ))
        })?;
        decode_in(value, || {
            format!("element {} of `{}` on node {}", self.index, self.property, self.node)
        })
    }
}
