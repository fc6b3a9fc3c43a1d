//! Canonical tree index handles
//!
//! Every node request is reduced to an [`IndexKey`]: row, column, parent
//! handle and the node it resolves to. Keys are interned in an append-only
//! arena, so asking for the same key twice yields the same [`TreeIndex`]
//! and a handle never changes meaning for the life of the model.

use core::fmt;
use std::collections::HashMap;

use crate::error::{Result, TreeError};

/// Stable handle to one interned node key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TreeIndex {
    bits: u32,
}

impl TreeIndex {
    #[inline]
    pub(crate) const fn new(slot: u32) -> Self {
        Self { bits: slot }
    }

    /// Handle for an arena slot, if the slot fits the handle's bits
    #[inline]
    pub(crate) fn from_slot(slot: usize) -> Option<Self> {
        u32::try_from(slot).ok().map(Self::new)
    }

    /// Arena slot of this handle
    #[inline]
    pub const fn slot(self) -> usize {
        self.bits as usize
    }

    /// Raw bits, e.g. for a view's opaque internal id
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.bits
    }

    /// Rebuild from raw bits. The model rejects bits it never issued.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }
}

impl fmt::Debug for TreeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeIndex({})", self.bits)
    }
}

/// Kind of node a handle refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Record,
    Variable,
    Value,
}

/// One step from a record down to a nested record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Variable index in the containing record
    pub var: usize,
    /// Element index in that variable
    pub element: usize,
}

/// Path from the root record to a record (empty for the root itself)
pub type RecordPath = Vec<Slot>;

/// Node identity: which part of the root record a handle addresses
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Record(RecordPath),
    Variable { record: RecordPath, var: usize },
    Value { record: RecordPath, var: usize, slot: usize },
}

impl NodeRef {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Record(_) => NodeKind::Record,
            NodeRef::Variable { .. } => NodeKind::Variable,
            NodeRef::Value { .. } => NodeKind::Value,
        }
    }

    /// Path of the record this node lives in (the record itself for records)
    pub fn record_path(&self) -> &[Slot] {
        match self {
            NodeRef::Record(path) => path,
            NodeRef::Variable { record, .. } | NodeRef::Value { record, .. } => record,
        }
    }
}

/// Everything that identifies a handle
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub row: usize,
    pub column: usize,
    pub parent: Option<TreeIndex>,
    pub node: NodeRef,
}

impl IndexKey {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
}

/// Append-only arena of interned keys
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: Vec<IndexKey>,
    lookup: HashMap<IndexKey, TreeIndex>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose first handle is `key`
    pub fn with_root(key: IndexKey) -> (Self, TreeIndex) {
        let root = TreeIndex::new(0);
        let mut cache = Self::default();
        cache.entries.push(key.clone());
        cache.lookup.insert(key, root);
        (cache, root)
    }

    /// Return the handle for `key`, creating it on first use
    pub fn intern(&mut self, key: IndexKey) -> Result<TreeIndex> {
        if let Some(&handle) = self.lookup.get(&key) {
            return Ok(handle);
        }
        let Some(handle) = TreeIndex::from_slot(self.entries.len()) else {
            log::error!("Tree index space exhausted after {} handles", self.entries.len());
            return Err(TreeError::HandlesExhausted);
        };
        log::debug!("New tree index {:?} for {:?}", handle, key);
        self.entries.push(key.clone());
        self.lookup.insert(key, handle);
        Ok(handle)
    }

    /// Key behind a handle
    #[inline]
    pub fn get(&self, handle: TreeIndex) -> Option<&IndexKey> {
        self.entries.get(handle.slot())
    }

    /// Number of handles issued
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
