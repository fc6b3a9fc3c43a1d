//! Tree model over a root record
//!
//! The record is exposed as a two-column tree:
//!
//! ```text
//! (implicit root)
//! └── Record          "Door"        "STATEDESC"
//!     ├── Variable    "open"        "BOOL[1]"
//!     │   └── Value   "True"        "BOOL"
//!     └── Variable    "locks"       "STATEDESC[]"
//!         └── Record  "Lock"        "STATEDESC"
//! ```
//!
//! Handles are created lazily on navigation and cached for the life of
//! the model (see [`IndexCache`]).

use core::cell::RefCell;

use void_sdl::{CreatableFactory, DescriptorRegistry, ReadContext, Record, SdlValue, Variable};

use crate::codec;
use crate::error::{EditError, Result, TreeError};
use crate::events::{ChangeObservers, RecordMutated, SubscriberId};
use crate::index::{IndexCache, IndexKey, NodeKind, NodeRef, Slot, TreeIndex};

/// Column holding names and values
pub const DATA_COLUMN: usize = 0;
/// Column holding type names
pub const TYPE_COLUMN: usize = 1;
/// Number of columns
pub const COLUMN_COUNT: usize = 2;

/// Cell text for a handle the model cannot resolve
pub const INVALID_INDEX_TEXT: &str = "Requested invalid index";

/// Navigation and editing interface for a generic tree-view consumer
pub trait ItemModel {
    /// Child `row`/`column` of `parent` (`None` is the implicit root)
    fn index(&self, row: usize, column: usize, parent: Option<TreeIndex>) -> Result<TreeIndex>;

    /// Parent recorded when `child` was created
    fn parent(&self, child: TreeIndex) -> Result<Option<TreeIndex>>;

    /// Number of children under `parent`
    fn row_count(&self, parent: Option<TreeIndex>) -> Result<usize>;

    fn column_count(&self) -> usize;

    /// Cell text, or a placeholder for an unknown handle
    fn data(&self, index: TreeIndex, column: usize) -> String;

    fn header_data(&self, section: usize) -> Option<&'static str>;

    fn is_editable(&self, index: TreeIndex, column: usize) -> bool;

    /// Apply a text edit to a cell
    fn set_data(&mut self, index: TreeIndex, column: usize, text: &str) -> core::result::Result<(), EditError>;
}

/// Tree view of one root record
#[derive(Debug)]
pub struct StateTreeModel {
    pub(crate) root: Record,
    root_index: TreeIndex,
    cache: RefCell<IndexCache>,
    pub(crate) observers: ChangeObservers,
}

impl StateTreeModel {
    /// Wrap an already decoded record
    pub fn new(root: Record) -> Self {
        let (cache, root_index) = IndexCache::with_root(root_key(0, DATA_COLUMN));
        Self {
            root,
            root_index,
            cache: RefCell::new(cache),
            observers: ChangeObservers::new(),
        }
    }

    /// Decode a blob (header, then body) and wrap the record
    pub fn load(
        blob: &[u8],
        registry: &DescriptorRegistry,
        factory: &CreatableFactory,
    ) -> void_sdl::Result<Self> {
        let record = Record::read_blob(blob, ReadContext::new(registry, factory))?;
        log::info!(
            "Loaded {} v{} with {} variables",
            record.name(),
            record.version(),
            record.num_vars()
        );
        Ok(Self::new(record))
    }

    /// The root record
    #[inline]
    pub fn record(&self) -> &Record {
        &self.root
    }

    /// Give up the model and keep the (possibly edited) record
    pub fn into_record(self) -> Record {
        self.root
    }

    /// Subscribe to committed edits
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: Fn(&RecordMutated<'_>) + Send + Sync + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of handles issued so far
    pub fn handle_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Handle of the root record (row 0 under the implicit root)
    #[inline]
    pub fn root_handle(&self) -> TreeIndex {
        self.root_index
    }

    /// Handle of child `row` in `column` under `parent`
    pub fn child_handle(&self, parent: Option<TreeIndex>, row: usize, column: usize) -> Result<TreeIndex> {
        let Some(parent_handle) = parent else {
            check_range(row, column, 1)?;
            return self.intern(root_key(row, column));
        };

        let key = self.key(parent_handle)?;
        let count = self.node_child_count(&key.node)?;
        let node = match key.node {
            NodeRef::Value { .. } => return Err(TreeError::NoChildren),
            NodeRef::Record(record) => {
                check_range(row, column, count)?;
                NodeRef::Variable { record, var: row }
            }
            NodeRef::Variable { record, var } => {
                check_range(row, column, count)?;
                let variable = self.variable(&record, var).ok_or(TreeError::InvalidHandle)?;
                if variable.descriptor().is_state_descriptor() {
                    let mut path = record;
                    path.push(Slot { var, element: row });
                    NodeRef::Record(path)
                } else {
                    NodeRef::Value { record, var, slot: row }
                }
            }
        };

        self.intern(IndexKey {
            row,
            column,
            parent,
            node,
        })
    }

    /// Follow data-column rows from the root record, e.g. `[0, 1]` is
    /// value 1 of variable 0
    pub fn handle_for_rows(&self, rows: &[usize]) -> Result<TreeIndex> {
        let mut handle = self.root_handle();
        for &row in rows {
            handle = self.child_handle(Some(handle), row, DATA_COLUMN)?;
        }
        Ok(handle)
    }

    /// Parent recorded at creation time
    pub fn parent_handle(&self, handle: TreeIndex) -> Result<Option<TreeIndex>> {
        Ok(self.key(handle)?.parent)
    }

    /// Number of children under `parent` (`None` is the implicit root)
    pub fn child_count(&self, parent: Option<TreeIndex>) -> Result<usize> {
        match parent {
            None => Ok(1),
            Some(handle) => self.node_child_count(&self.key(handle)?.node),
        }
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    /// Column titles
    pub fn header_data(&self, section: usize) -> Option<&'static str> {
        match section {
            DATA_COLUMN => Some("Data"),
            TYPE_COLUMN => Some("Type"),
            _ => None,
        }
    }

    /// Kind of node behind a handle
    pub fn node_kind(&self, handle: TreeIndex) -> Option<NodeKind> {
        self.cache.borrow().get(handle).map(IndexKey::kind)
    }

    /// Row and column a handle was created for
    pub fn position(&self, handle: TreeIndex) -> Option<(usize, usize)> {
        self.cache.borrow().get(handle).map(|key| (key.row, key.column))
    }

    /// Cell text
    pub fn cell_data(&self, handle: TreeIndex, column: usize) -> String {
        self.try_cell_data(handle, column)
            .unwrap_or_else(|| INVALID_INDEX_TEXT.to_string())
    }

    /// Only the data column of a value is editable
    pub fn is_editable(&self, handle: TreeIndex, column: usize) -> bool {
        column == DATA_COLUMN && self.node_kind(handle) == Some(NodeKind::Value)
    }

    /// Value behind a value handle
    pub fn value(&self, handle: TreeIndex) -> Option<&SdlValue> {
        let key = self.key(handle).ok()?;
        match &key.node {
            NodeRef::Value { record, var, slot } => self.variable(record, *var)?.value(*slot),
            _ => None,
        }
    }

    fn try_cell_data(&self, handle: TreeIndex, column: usize) -> Option<String> {
        let key = self.key(handle).ok()?;
        let text = match (column, &key.node) {
            (DATA_COLUMN, NodeRef::Record(path)) => self.record_at(path)?.name().to_string(),
            (DATA_COLUMN, NodeRef::Variable { record, var }) => self.variable(record, *var)?.name().to_string(),
            (DATA_COLUMN, NodeRef::Value { record, var, slot }) => {
                codec::render(self.variable(record, *var)?.value(*slot)?)
            }
            (TYPE_COLUMN, NodeRef::Record(path)) => {
                self.record_at(path)?;
                codec::RECORD_TYPE.to_string()
            }
            (TYPE_COLUMN, NodeRef::Variable { record, var }) => {
                codec::variable_type_text(self.variable(record, *var)?)
            }
            (TYPE_COLUMN, NodeRef::Value { record, var, .. }) => {
                self.variable(record, *var)?.descriptor().var_type.name().to_string()
            }
            _ => return None,
        };
        Some(text)
    }

    pub(crate) fn key(&self, handle: TreeIndex) -> Result<IndexKey> {
        self.cache
            .borrow()
            .get(handle)
            .cloned()
            .ok_or(TreeError::InvalidHandle)
    }

    fn intern(&self, key: IndexKey) -> Result<TreeIndex> {
        self.cache.borrow_mut().intern(key)
    }

    fn node_child_count(&self, node: &NodeRef) -> Result<usize> {
        match node {
            NodeRef::Record(path) => self
                .record_at(path)
                .map(Record::num_vars)
                .ok_or(TreeError::InvalidHandle),
            NodeRef::Variable { record, var } => self
                .variable(record, *var)
                .map(Variable::count)
                .ok_or(TreeError::InvalidHandle),
            NodeRef::Value { .. } => Ok(0),
        }
    }

    fn record_at(&self, path: &[Slot]) -> Option<&Record> {
        let mut record = &self.root;
        for slot in path {
            record = record.var(slot.var)?.record(slot.element)?;
        }
        Some(record)
    }

    fn variable(&self, path: &[Slot], var: usize) -> Option<&Variable> {
        self.record_at(path)?.var(var)
    }

    pub(crate) fn value_mut(&mut self, path: &[Slot], var: usize, slot: usize) -> Option<&mut SdlValue> {
        let mut record = &mut self.root;
        for step in path {
            record = record.var_mut(step.var)?.record_mut(step.element)?;
        }
        record.var_mut(var)?.value_mut(slot)
    }
}

impl ItemModel for StateTreeModel {
    fn index(&self, row: usize, column: usize, parent: Option<TreeIndex>) -> Result<TreeIndex> {
        self.child_handle(parent, row, column)
    }

    fn parent(&self, child: TreeIndex) -> Result<Option<TreeIndex>> {
        self.parent_handle(child)
    }

    fn row_count(&self, parent: Option<TreeIndex>) -> Result<usize> {
        self.child_count(parent)
    }

    fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    fn data(&self, index: TreeIndex, column: usize) -> String {
        self.cell_data(index, column)
    }

    fn header_data(&self, section: usize) -> Option<&'static str> {
        StateTreeModel::header_data(self, section)
    }

    fn is_editable(&self, index: TreeIndex, column: usize) -> bool {
        StateTreeModel::is_editable(self, index, column)
    }

    fn set_data(&mut self, index: TreeIndex, column: usize, text: &str) -> core::result::Result<(), EditError> {
        self.apply_edit(index, column, text)
    }
}

/// Key of the root record under the implicit root
fn root_key(row: usize, column: usize) -> IndexKey {
    IndexKey {
        row,
        column,
        parent: None,
        node: NodeRef::Record(Vec::new()),
    }
}

fn check_range(row: usize, column: usize, count: usize) -> Result<()> {
    if row >= count || column >= COLUMN_COUNT {
        return Err(TreeError::IndexOutOfRange { row, column, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use void_sdl::{StateDescriptor, VarDescriptor, VarType};

    fn door_model() -> StateTreeModel {
        let mut registry = DescriptorRegistry::new();
        registry
            .register(StateDescriptor::new("Lock", 1).with_var(VarDescriptor::new("code", VarType::Int, 1)))
            .unwrap();
        let door = StateDescriptor::new("Door", 1)
            .with_var(VarDescriptor::new("open", VarType::Bool, 1))
            .with_var(VarDescriptor::variable("names", VarType::String))
            .with_var(VarDescriptor::nested("locks", "Lock", Some(2)));
        let record = Record::new(Arc::new(door), &registry).unwrap();
        StateTreeModel::new(record)
    }

    #[test]
    fn test_implicit_root() {
        let model = door_model();
        assert_eq!(model.child_count(None).unwrap(), 1);
        let root = model.root_handle();
        assert_eq!(model.child_handle(None, 0, 0).unwrap(), root);
        assert_eq!(model.parent_handle(root).unwrap(), None);
        assert!(matches!(
            model.child_handle(None, 1, 0),
            Err(TreeError::IndexOutOfRange { row: 1, .. })
        ));
    }

    #[test]
    fn test_cells() {
        let model = door_model();
        let root = model.root_handle();
        assert_eq!(model.cell_data(root, DATA_COLUMN), "Door");
        assert_eq!(model.cell_data(root, TYPE_COLUMN), "STATEDESC");

        let open = model.child_handle(Some(root), 0, 0).unwrap();
        assert_eq!(model.cell_data(open, DATA_COLUMN), "open");
        assert_eq!(model.cell_data(open, TYPE_COLUMN), "BOOL[1]");

        let names = model.child_handle(Some(root), 1, 0).unwrap();
        assert_eq!(model.cell_data(names, TYPE_COLUMN), "STRING[]");
        assert_eq!(model.child_count(Some(names)).unwrap(), 0);

        let value = model.child_handle(Some(open), 0, 0).unwrap();
        assert_eq!(model.cell_data(value, DATA_COLUMN), "False");
        assert_eq!(model.cell_data(value, TYPE_COLUMN), "BOOL");
        assert_eq!(model.cell_data(value, 2), INVALID_INDEX_TEXT);
        assert_eq!(model.cell_data(TreeIndex::from_bits(999), 0), INVALID_INDEX_TEXT);
    }

    #[test]
    fn test_nested_records() {
        let model = door_model();
        let lock = model.handle_for_rows(&[2, 1]).unwrap();
        assert_eq!(model.node_kind(lock), Some(NodeKind::Record));
        assert_eq!(model.cell_data(lock, DATA_COLUMN), "Lock");

        let code = model.handle_for_rows(&[2, 1, 0, 0]).unwrap();
        assert_eq!(model.node_kind(code), Some(NodeKind::Value));
        assert_eq!(model.cell_data(code, DATA_COLUMN), "0");
        assert_eq!(model.cell_data(code, TYPE_COLUMN), "INT");

        // Sibling records resolve to distinct handles
        assert_ne!(model.handle_for_rows(&[2, 0]).unwrap(), lock);
    }

    #[test]
    fn test_columns_and_headers() {
        let model = door_model();
        let root = model.root_handle();
        let data = model.child_handle(Some(root), 0, 0).unwrap();
        let kind = model.child_handle(Some(root), 0, 1).unwrap();
        assert_ne!(data, kind);
        assert_eq!(model.position(kind), Some((0, 1)));
        assert!(matches!(
            model.child_handle(Some(root), 0, 2),
            Err(TreeError::IndexOutOfRange { column: 2, .. })
        ));

        assert_eq!(model.column_count(), 2);
        assert_eq!(model.header_data(0), Some("Data"));
        assert_eq!(model.header_data(1), Some("Type"));
        assert_eq!(model.header_data(2), None);
    }

    #[test]
    fn test_editable_flags() {
        let model = door_model();
        let root = model.root_handle();
        let value = model.handle_for_rows(&[0, 0]).unwrap();
        assert!(model.is_editable(value, DATA_COLUMN));
        assert!(!model.is_editable(value, TYPE_COLUMN));
        assert!(!model.is_editable(root, DATA_COLUMN));
        assert!(!model.is_editable(TreeIndex::from_bits(500), DATA_COLUMN));
    }

    #[test]
    fn test_unknown_handle_errors() {
        let model = door_model();
        let bogus = TreeIndex::from_bits(77);
        assert_eq!(model.parent_handle(bogus), Err(TreeError::InvalidHandle));
        assert_eq!(model.child_count(Some(bogus)), Err(TreeError::InvalidHandle));
        assert_eq!(model.child_handle(Some(bogus), 0, 0), Err(TreeError::InvalidHandle));
        assert!(model.value(bogus).is_none());
    }
}
