use crate::config::ConfigError;
use crate::event_loop_wm::{LayoutEventLoop, LayoutOperationError};
use crate::layouts::LayoutError;
use crate::serialization::SerializationError;
use log::{info, trace};

pub mod config;
pub mod event_loop_wm;
pub mod layouts;
pub mod paths;
pub mod serialization;
pub mod shared_tree;
pub mod wm;

pub use config::Config;
pub use event_loop_wm::LayoutHandle;
pub use layouts::{ContainerId, ContainerKind, ContainerTree, Direction};
pub use shared_tree::SharedTree;
pub use wm::{ContainerSelector, LayoutAction, LayoutManager};

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

/// Delete the saved layout from the data directory. Returns whether one existed.
pub fn reset_layout() -> TreeWMResult<bool> {
    Ok(serialization::reset_layout()?)
}

/// Runs `actions` in order through a layout event loop on a fresh tokio runtime, stopping
/// at the first failure. Returns the manager once the loop has shut down.
pub fn start(manager: LayoutManager, actions: Vec<LayoutAction>) -> TreeWMResult<LayoutManager> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    runtime.block_on(async move {
        let (handle, task) = LayoutEventLoop::spawn(manager);

        trace!("Applying {} layout actions...", actions.len());
        let mut result = Ok(());
        for action in actions {
            result = handle.apply(action).await;
            if result.is_err() {
                break;
            }
        }

        handle.shutdown()?;
        let manager = task
            .await
            .map_err(|e| format!("Layout event loop panicked: {e}"))?;

        result?;
        info!("Applied layout actions");
        Ok::<_, TreeWMFatalError>(manager)
    })
}

#[derive(Debug)]
pub enum TreeWMFatalError {
    Error(String),
    LayoutError(LayoutError),
    ConfigError(ConfigError),
    SerializationError(SerializationError),
    OperationError(LayoutOperationError),
}

pub type TreeWMResult<T> = Result<T, TreeWMFatalError>;

impl std::fmt::Display for TreeWMFatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeWMFatalError::Error(message) => write!(f, "{message}"),
            TreeWMFatalError::LayoutError(error) => write!(f, "{error}"),
            TreeWMFatalError::ConfigError(error) => write!(f, "{error}"),
            TreeWMFatalError::SerializationError(error) => write!(f, "{error}"),
            TreeWMFatalError::OperationError(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for TreeWMFatalError {}

impl From<LayoutError> for TreeWMFatalError {
    fn from(error: LayoutError) -> Self {
        TreeWMFatalError::LayoutError(error)
    }
}

impl From<ConfigError> for TreeWMFatalError {
    fn from(error: ConfigError) -> Self {
        TreeWMFatalError::ConfigError(error)
    }
}

impl From<SerializationError> for TreeWMFatalError {
    fn from(error: SerializationError) -> Self {
        TreeWMFatalError::SerializationError(error)
    }
}

impl From<LayoutOperationError> for TreeWMFatalError {
    fn from(error: LayoutOperationError) -> Self {
        TreeWMFatalError::OperationError(error)
    }
}

impl From<&str> for TreeWMFatalError {
    fn from(value: &str) -> Self {
        TreeWMFatalError::Error(value.to_owned())
    }
}

impl From<String> for TreeWMFatalError {
    fn from(error: String) -> Self {
        TreeWMFatalError::Error(error)
    }
}
