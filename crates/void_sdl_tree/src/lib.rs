//! # void_sdl_tree - State Record Tree Model
//!
//! Exposes a [`void_sdl::Record`] as a navigable two-column tree
//! ("Data", "Type") for a generic tree-view consumer:
//! - Canonical, lazily created [`TreeIndex`] handles
//! - Text rendering of every leaf value, PRC markup for composites
//! - An edit pipeline that parses text back into the value in place
//! - Synchronous "record mutated" notifications after each committed edit
//!
//! ```ignore
//! let mut model = StateTreeModel::load(&blob, &registry, &factory)?;
//! model.subscribe(|event| save(event.record));
//!
//! let value = model.handle_for_rows(&[0, 1])?;
//! println!("{}", model.cell_data(value, 0));
//! model.apply_edit(value, 0, "99")?;
//! ```
//!
//! The model is single-threaded and owns its record exclusively.

pub mod codec;
pub mod edit;
pub mod error;
pub mod events;
pub mod index;
pub mod model;

pub use error::{EditError, EditStage, Result, TreeError};
pub use events::{ChangeObservers, RecordMutated, SubscriberId};
pub use index::{IndexCache, IndexKey, NodeKind, NodeRef, Slot, TreeIndex};
pub use model::{ItemModel, StateTreeModel, COLUMN_COUNT, DATA_COLUMN, INVALID_INDEX_TEXT, TYPE_COLUMN};

/// Prelude
pub mod prelude {
    pub use crate::{
        EditError, EditStage, ItemModel, NodeKind, RecordMutated, StateTreeModel, SubscriberId, TreeError,
        TreeIndex,
    };
}
