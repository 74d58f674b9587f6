//! Transaction handles.
//!
//! A transaction scopes a unit of reads (and, for `ReadWrite`, writes)
//! against a backend. The spatial layer never opens one itself; callers
//! hand it a snapshot taken inside a transaction they already hold.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Opaque transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub u64);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction trait that all backends must implement.
pub trait Transaction: Send + Sync {
    fn mode(&self) -> TxMode;
    fn id(&self) -> TxId;

    /// Fails with `TxError` unless this transaction may write.
    fn ensure_writable(&self) -> Result<()> {
        match self.mode() {
            TxMode::ReadWrite => Ok(()),
            TxMode::ReadOnly => Err(Error::TxError(format!(
                "transaction {} is read-only",
                self.id()
            ))),
        }
    }
}
