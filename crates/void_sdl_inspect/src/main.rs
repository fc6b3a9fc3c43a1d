//! # void_sdl_inspect - State Record Inspector
//!
//! Loads descriptors and a record blob, applies `--set` edits through the
//! tree model's edit pipeline, prints the tree and optionally saves the
//! edited blob.
//!
//! ```text
//! void_sdl_inspect door.bin --sdl ./sdl --set 0/0=True --out door.edited.bin
//! ```

mod config;
mod dump;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use void_sdl::{CreatableFactory, DescriptorRegistry, SdlError};
use void_sdl_tree::{EditError, StateTreeModel, TreeError, DATA_COLUMN};

use config::{CliArgs, ConfigError, InspectConfig, USAGE};
use dump::DumpNode;

/// Inspector errors
#[derive(Debug, Error)]
enum InspectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sdl(#[from] SdlError),

    #[error("No node at rows {rows:?}: {source}")]
    Path {
        rows: Vec<usize>,
        #[source]
        source: TreeError,
    },

    #[error("Edit of {rows:?} rejected: {source}")]
    Edit {
        rows: Vec<usize>,
        #[source]
        source: EditError,
    },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to dump tree: {0}")]
    Dump(String),
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), InspectError> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    let blob_path = args
        .blob
        .clone()
        .ok_or_else(|| ConfigError::Usage(format!("Missing <blob>\n\n{}", USAGE)))?;
    let config = InspectConfig::resolve(&args, |key| std::env::var_os(key))?;

    let mut registry = DescriptorRegistry::new();
    for dir in &config.sdl_dirs {
        registry.load_dir(dir)?;
    }
    if let Err(e) = registry.validate() {
        log::warn!("Descriptor set is incomplete: {}", e);
    }
    let factory = CreatableFactory::with_builtins();

    let blob = std::fs::read(&blob_path).map_err(|source| InspectError::Io {
        path: blob_path.clone(),
        source,
    })?;
    let mut model = StateTreeModel::load(&blob, &registry, &factory)?;

    let edits = Arc::new(AtomicUsize::new(0));
    let counter = edits.clone();
    model.subscribe(move |event| {
        counter.fetch_add(1, Ordering::SeqCst);
        log::debug!("Record {} changed at {:?}", event.record.name(), event.handle);
    });

    for edit in &args.edits {
        let handle = model
            .handle_for_rows(&edit.rows)
            .map_err(|source| InspectError::Path {
                rows: edit.rows.clone(),
                source,
            })?;
        model
            .apply_edit(handle, DATA_COLUMN, &edit.text)
            .map_err(|source| InspectError::Edit {
                rows: edit.rows.clone(),
                source,
            })?;
        log::info!("Set {:?} = {}", edit.rows, model.cell_data(handle, DATA_COLUMN));
    }

    let tree = DumpNode::build(&model, config.show_types).map_err(|source| InspectError::Path {
        rows: Vec::new(),
        source,
    })?;
    if config.json {
        let json = tree.to_json().map_err(|e| InspectError::Dump(e.to_string()))?;
        println!("{}", json);
    } else {
        let stdout = std::io::stdout();
        tree.write_text(&mut stdout.lock())
            .map_err(|e| InspectError::Dump(e.to_string()))?;
    }

    if let Some(output) = &config.output {
        let record = model.into_record();
        let bytes = record.write_blob()?;
        std::fs::write(output, &bytes).map_err(|source| InspectError::Io {
            path: output.clone(),
            source,
        })?;
        log::info!(
            "Saved {} v{} ({} bytes, {} edits) to {:?}",
            record.name(),
            record.version(),
            bytes.len(),
            edits.load(Ordering::SeqCst),
            output
        );
    }

    Ok(())
}
