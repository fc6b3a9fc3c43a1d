//! Edit pipeline: text in, value mutated in place, observers told once

use crate::codec;
use crate::error::EditError;
use crate::events::RecordMutated;
use crate::index::{NodeRef, TreeIndex};
use crate::model::{StateTreeModel, DATA_COLUMN};

impl StateTreeModel {
    /// Parse `text` into the value behind `handle`.
    ///
    /// Only the data column of a value handle is editable. A rejected edit
    /// leaves the record untouched and notifies nobody; a committed edit
    /// notifies every observer exactly once.
    pub fn apply_edit(&mut self, handle: TreeIndex, column: usize, text: &str) -> Result<(), EditError> {
        let result = self.commit(handle, column, text);
        match &result {
            Ok(()) => {
                log::debug!("Edited {:?}: {:?}", handle, text);
                self.observers.notify(&RecordMutated {
                    record: &self.root,
                    handle,
                });
            }
            Err(e) => log::warn!("Rejected edit of {:?} ({:?} stage): {}", handle, e.stage(), e),
        }
        result
    }

    fn commit(&mut self, handle: TreeIndex, column: usize, text: &str) -> Result<(), EditError> {
        let key = self.key(handle)?;
        if column != DATA_COLUMN {
            return Err(EditError::NotEditable);
        }
        let NodeRef::Value { record, var, slot } = key.node else {
            return Err(EditError::NotEditable);
        };
        let value = self
            .value_mut(&record, var, slot)
            .ok_or(EditError::InvalidHandle)?;
        codec::parse_into(value, text)
    }
}
