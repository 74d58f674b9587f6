//! In-memory storage backend.
//!
//! This is the reference implementation of `StorageBackend` and
//! `GraphView`. It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No real transactions**: `commit_tx()` is a no-op. Writes are applied
//!   immediately.
//!   The transaction mode is still enforced: writes need `ReadWrite`.
//! - **Snapshots block writers**: a `MemorySnapshot` holds read locks on the
//!   node, relationship and adjacency tables until it is dropped. Drop it
//!   before writing again from the same task, or the write will deadlock.
//!
//! Use this backend for:
//! - Testing the spatial extraction layer
//! - Embedding graph-spatial in applications that don't need persistence

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::{RwLock, RwLockReadGuard};
use async_trait::async_trait;

use crate::model::*;
use crate::tx::{Transaction, TxMode, TxId};
use crate::{Error, Result};
use super::{GraphView, StorageBackend};

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory property graph storage.
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → outgoing relationship IDs, in creation order
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
    next_tx_id: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                nodes: RwLock::new(HashMap::new()),
                relationships: RwLock::new(HashMap::new()),
                adjacency: RwLock::new(HashMap::new()),
                next_node_id: AtomicU64::new(1),
                next_rel_id: AtomicU64::new(1),
                next_tx_id: AtomicU64::new(1),
            }),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

/// In-memory transaction (currently just a marker — no real MVCC).
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

// ============================================================================
// MemorySnapshot
// ============================================================================

/// Read-locked view over the in-memory tables.
pub struct MemorySnapshot<'a> {
    tx: TxId,
    nodes: RwLockReadGuard<'a, HashMap<NodeId, Node>>,
    relationships: RwLockReadGuard<'a, HashMap<RelId, Relationship>>,
    adjacency: RwLockReadGuard<'a, HashMap<NodeId, Vec<RelId>>>,
}

impl MemorySnapshot<'_> {
    /// The transaction this snapshot was taken in.
    pub fn tx_id(&self) -> TxId {
        self.tx
    }
}

impl GraphView for MemorySnapshot<'_> {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn outgoing(&self, id: NodeId, rel_type: &str) -> Vec<&Relationship> {
        let Some(rel_ids) = self.adjacency.get(&id) else {
            return Vec::new();
        };
        rel_ids
            .iter()
            .filter_map(|rid| self.relationships.get(rid))
            .filter(|rel| rel.rel_type == rel_type)
            .collect()
    }
}

// ============================================================================
// StorageBackend impl
// ============================================================================

#[async_trait]
impl StorageBackend for MemoryBackend {
    type Tx = MemoryTx;
    type Snapshot<'a> = MemorySnapshot<'a>;

    async fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed));
        Ok(MemoryTx { id, mode })
    }

    /// No-op: memory backend applies writes immediately, not on commit.
    async fn commit_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    fn snapshot<'a>(&'a self, tx: &'a MemoryTx) -> Result<MemorySnapshot<'a>> {
        // Same acquisition order everywhere: nodes, relationships, adjacency.
        Ok(MemorySnapshot {
            tx: tx.id(),
            nodes: self.inner.nodes.read(),
            relationships: self.inner.relationships.read(),
            adjacency: self.inner.adjacency.read(),
        })
    }

    // ========================================================================
    // Node CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        tx.ensure_writable()?;

        let id = NodeId(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };

        self.inner.nodes.write().insert(id, node);
        self.inner.adjacency.write().insert(id, Vec::new());

        Ok(id)
    }

    async fn set_node_property(
        &self,
        tx: &mut MemoryTx,
        id: NodeId,
        key: &str,
        val: Value,
    ) -> Result<()> {
        tx.ensure_writable()?;
        let mut nodes = self.inner.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.properties.insert(key.to_string(), val);
        Ok(())
    }

    async fn remove_node_property(
        &self,
        tx: &mut MemoryTx,
        id: NodeId,
        key: &str,
    ) -> Result<()> {
        tx.ensure_writable()?;
        let mut nodes = self.inner.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.properties.remove(key);
        Ok(())
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        tx.ensure_writable()?;

        // Verify both nodes exist
        {
            let nodes = self.inner.nodes.read();
            if !nodes.contains_key(&src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(&dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.inner.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let rel = Relationship {
            id,
            src,
            dst,
            rel_type: rel_type.to_string(),
            properties: props,
        };

        self.inner.relationships.write().insert(id, rel);

        self.inner.adjacency.write().entry(src).or_default().push(id);

        Ok(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
