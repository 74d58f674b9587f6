//! # Spatial extraction
//!
//! Reads points and simple polygon rings out of a [`GraphView`].
//!
//! ```text
//! ChainWalker (or array property) → Point adapter → decode → Ring (closed)
//! ```
//!
//! Everything here is synchronous and read-only. Callers take a snapshot
//! inside a transaction they own and pass it in; nothing in this module
//! opens, commits or outlives that transaction.
//!
//! [`GraphView`]: crate::storage::GraphView

pub mod config;
pub mod coordinate;
pub mod point;
pub mod polygon;
pub mod walk;

pub use config::PolygonConfig;
pub use coordinate::{Coordinate, decode};
pub use point::{ArrayPoint, CompositePoint, DirectPoint, Point};
pub use polygon::{Ring, Vertex, VertexSource};
pub use walk::ChainWalker;
