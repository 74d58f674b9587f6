//! # graph-spatial — points and simple polygons from a property graph
//!
//! Reads spatial geometry out of nodes stored in a property graph:
//! single points (a stored point value, or x/y[/z] numeric properties) and
//! simple polygon rings (a stored array of points, or a chain of nodes
//! linked by typed relationships).
//!
//! ## Design Principles
//!
//! 1. **Read-only core**: the spatial layer only sees a `GraphView` snapshot
//! 2. **Clean DTOs**: `Node`, `Relationship`, `Value` cross all boundaries
//! 3. **Closed rings**: every assembled ring ends on its first coordinate
//! 4. **Bounded walks**: chain traversal never runs unbounded on bad data
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graph_spatial::{MemoryBackend, PropertyMap, Ring, StorageBackend, TxMode, Value};
//!
//! # async fn example() -> graph_spatial::Result<()> {
//! let db = MemoryBackend::new();
//! let mut tx = db.begin_tx(TxMode::ReadWrite).await?;
//!
//! let mut props = PropertyMap::new();
//! props.insert("locations".into(), Value::List(vec![
//!     Value::cartesian(-10.0, -10.0),
//!     Value::cartesian(10.0, -10.0),
//!     Value::cartesian(10.0, 10.0),
//! ]));
//! let building = db.create_node(&mut tx, &["Building"], props).await?;
//!
//! let snapshot = db.snapshot(&tx)?;
//! let ring = Ring::from_array(&snapshot, building, "locations")?;
//! assert!(ring.is_closed());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod spatial;
pub mod storage;
pub mod tx;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Node, NodeId, PropertyMap, RelId, Relationship, Value};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{GraphView, MemoryBackend, MemorySnapshot, StorageBackend};

// ============================================================================
// Re-exports: Transactions
// ============================================================================

pub use tx::{Transaction, TxId, TxMode};

// ============================================================================
// Re-exports: Spatial
// ============================================================================

pub use spatial::{
    ChainWalker, CompositePoint, Coordinate, DirectPoint, Point, PolygonConfig, Ring, Vertex,
    VertexSource, decode,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing property `{property}` on node {node}")]
    MissingProperty { node: NodeId, property: String },

    #[error("Type mismatch in {context}: expected {expected}, got {got}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Malformed point: expected 2 or 3 ordinates, got {ordinates}")]
    MalformedPoint { ordinates: usize },

    #[error("Broken chain: node {node} has no outgoing `{rel_type}` relationship")]
    BrokenChain { node: NodeId, rel_type: String },

    #[error("Cycle detected at node {node} after {steps} steps")]
    CycleDetected { node: NodeId, steps: usize },

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
