//! # Storage Backend Trait
//!
//! Two contracts live here:
//!
//! - [`StorageBackend`]: the async write side of the host graph, enough to
//!   build nodes, properties and relationships inside a transaction.
//! - [`GraphView`]: the synchronous, read-only snapshot the spatial layer
//!   consumes. A backend hands one out per transaction via
//!   [`StorageBackend::snapshot`].
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory for testing/embedding |

pub mod memory;

use async_trait::async_trait;
use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::{Error, Result};

pub use memory::{MemoryBackend, MemorySnapshot, MemoryTx};

// ============================================================================
// GraphView — read-only snapshot
// ============================================================================

/// A consistent, read-only view of the host graph.
///
/// Implementors must return the same answers for the lifetime of the view.
/// `outgoing` must list relationships in creation order: chain walks pick
/// the first eligible edge, so the order is part of the contract.
pub trait GraphView {
    /// Look up a node by ID.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Outgoing relationships of `id` with the given type, in creation order.
    fn outgoing(&self, id: NodeId, rel_type: &str) -> Vec<&Relationship>;

    /// Look up a property that must be present.
    ///
    /// `NotFound` if the node is absent, `MissingProperty` if the key is
    /// absent or `Null`.
    fn require_property(&self, id: NodeId, key: &str) -> Result<&Value> {
        let node = self
            .node(id)
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.get(key).ok_or_else(|| Error::MissingProperty {
            node: id,
            property: key.to_string(),
        })
    }
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// The host graph contract.
///
/// Reads go through [`StorageBackend::snapshot`]. Writes require a
/// `ReadWrite` transaction; backends fail them with `Error::TxError`
/// otherwise.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// The transaction type for this backend.
    type Tx: Transaction;

    /// Read-only snapshot handed to the spatial layer.
    type Snapshot<'a>: GraphView
    where
        Self: 'a;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction.
    async fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    /// Commit a transaction.
    async fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Take a stable read-only view for the duration of a spatial call.
    ///
    /// Synchronous on purpose: the spatial layer never suspends.
    fn snapshot<'a>(&'a self, tx: &'a Self::Tx) -> Result<Self::Snapshot<'a>>;

    // ========================================================================
    // Node CRUD
    // ========================================================================

    /// Create a node with the given labels and properties.
    async fn create_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId>;

    /// Set a property on a node (upsert).
    async fn set_node_property(
        &self,
        tx: &mut Self::Tx,
        id: NodeId,
        key: &str,
        val: Value,
    ) -> Result<()>;

    /// Remove a property from a node.
    async fn remove_node_property(
        &self,
        tx: &mut Self::Tx,
        id: NodeId,
        key: &str,
    ) -> Result<()>;

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    /// Create a relationship between two nodes.
    async fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId>;
}
