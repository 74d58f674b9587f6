//! Property value type, a subset of Neo4j's storable types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// SRID Neo4j assigns to 2D cartesian points.
pub const SRID_CARTESIAN: i32 = 7203;
/// SRID Neo4j assigns to 3D cartesian points.
pub const SRID_CARTESIAN_3D: i32 = 9157;

/// Property value stored on a node or relationship.
///
/// - Scalars: Bool, Int, Float, String, Bytes
/// - Containers: List, Map
/// - Spatial: Point2D, Point3D
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),

    // Spatial types
    Point2D { srid: i32, x: f64, y: f64 },
    Point3D { srid: i32, x: f64, y: f64, z: f64 },
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    /// 2D cartesian point.
    pub fn cartesian(x: f64, y: f64) -> Self {
        Value::Point2D { srid: SRID_CARTESIAN, x, y }
    }

    /// 3D cartesian point.
    pub fn cartesian_3d(x: f64, y: f64, z: f64) -> Self {
        Value::Point3D { srid: SRID_CARTESIAN_3D, x, y, z }
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::List(_) => "LIST",
            Value::Map(_) => "MAP",
            Value::Point2D { .. } => "POINT",
            Value::Point3D { .. } => "POINT",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
    pub fn is_numeric(&self) -> bool { matches!(self, Value::Int(_) | Value::Float(_)) }
    pub fn is_point(&self) -> bool { matches!(self, Value::Point2D { .. } | Value::Point3D { .. }) }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempt to extract as a list slice
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}
