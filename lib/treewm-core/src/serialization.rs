use crate::layouts::{
    deserialize_tree, serialize_tree, ContainerTree, LayoutError, SerializedContainerTree,
};
use crate::paths;
use crate::Config;
use log::{debug, trace};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Invalid layout YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to access layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Layout could not be built: {0}")]
    Layout(#[from] LayoutError),

    #[error("Could not determine layout file path")]
    NoLayoutPath,
}

pub type SerializationResult<T> = Result<T, SerializationError>;

pub fn layout_to_string(tree: &ContainerTree) -> SerializationResult<String> {
    Ok(serde_yaml::to_string(&serialize_tree(tree))?)
}

pub fn layout_from_str(contents: &str, config: &Config) -> SerializationResult<ContainerTree> {
    let serialized: SerializedContainerTree = serde_yaml::from_str(contents)?;
    deserialize_tree(&serialized, config)
}

/// Write `tree` to `path`, creating missing parent directories
pub fn save_layout(tree: &ContainerTree, path: &Path) -> SerializationResult<()> {
    let layout_yaml = layout_to_string(tree)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, layout_yaml)?;

    debug!("Saved layout to {}", path.display());
    Ok(())
}

pub fn load_layout(path: &Path, config: &Config) -> SerializationResult<ContainerTree> {
    let contents = fs::read_to_string(path)?;
    let tree = layout_from_str(&contents, config)?;

    debug!(
        "Loaded layout with {} containers from {}",
        tree.len(),
        path.display()
    );
    Ok(tree)
}

/// Save to the data directory when persistence is enabled. Returns whether anything was written.
pub fn save_persisted_layout(tree: &ContainerTree) -> SerializationResult<bool> {
    if !Config::persistence() {
        return Ok(false);
    }

    let path = paths::layout_file_path().ok_or(SerializationError::NoLayoutPath)?;
    save_layout(tree, &path)?;
    Ok(true)
}

/// Load the layout saved in the data directory, if persistence is enabled and one exists
pub fn load_persisted_layout(config: &Config) -> SerializationResult<Option<ContainerTree>> {
    if !config.persistence {
        return Ok(None);
    }

    match paths::layout_file_path() {
        Some(path) if path.exists() => load_layout(&path, config).map(Some),
        _ => Ok(None),
    }
}

/// Delete a saved layout. Returns whether a file was removed.
pub fn remove_layout(path: &Path) -> SerializationResult<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path)?;
    trace!("Removed saved layout at {}", path.display());
    Ok(true)
}

pub fn reset_layout() -> SerializationResult<bool> {
    let path = paths::layout_file_path().ok_or(SerializationError::NoLayoutPath)?;
    remove_layout(&path)
}
