//! Coordinates and the point-value decoder.

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::model::Value;
use crate::{Error, Result};

/// Ordinates of one position, 2 (x, y) or 3 (x, y, z) long, kept inline.
///
/// Serializes as a plain array. Deserializing checks the arity, so a
/// `Coordinate` always has an x and a y.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Coordinate(SmallVec<[f64; 3]>);

impl Coordinate {
    pub fn xy(x: f64, y: f64) -> Self {
        Self(smallvec![x, y])
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self(smallvec![x, y, z])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of ordinates (2 or 3).
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> Option<f64> {
        self.0.get(2).copied()
    }
}

impl TryFrom<SmallVec<[f64; 3]>> for Coordinate {
    type Error = Error;

    fn try_from(ordinates: SmallVec<[f64; 3]>) -> Result<Self> {
        match ordinates.len() {
            2 | 3 => Ok(Self(ordinates)),
            n => Err(Error::MalformedPoint { ordinates: n }),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ordinates = SmallVec::<[f64; 3]>::deserialize(deserializer)?;
        Coordinate::try_from(ordinates).map_err(serde::de::Error::custom)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::xy(x, y)
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::xyz(x, y, z)
    }
}

/// Decode a stored point value into a coordinate.
///
/// Accepts `Point2D`, `Point3D`, and a plain list of 2 or 3 numbers. The
/// SRID is carried by the value but not interpreted.
pub fn decode(value: &Value) -> Result<Coordinate> {
    decode_in(value, || "point value".to_string())
}

/// `decode` with a lazily built description of where the value came from,
/// used in `TypeMismatch` errors.
pub(crate) fn decode_in(value: &Value, context: impl FnOnce() -> String) -> Result<Coordinate> {
    match value {
        Value::Point2D { x, y, .. } => Ok(Coordinate::xy(*x, *y)),
        Value::Point3D { x, y, z, .. } => Ok(Coordinate::xyz(*x, *y, *z)),
        Value::List(items) => {
            let ordinates: SmallVec<[f64; 3]> = items
                .iter()
                .map(Value::as_float)
                .collect::<Option<_>>()
                .ok_or_else(|| Error::TypeMismatch {
                    context: context(),
                    expected: "POINT",
                    got: "LIST",
                })?;
            Coordinate::try_from(ordinates)
        }
        other => Err(Error::TypeMismatch {
            context: context(),
            expected: "POINT",
            got: other.type_name(),
        }),
    }
}
