pub use container_tree::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod container_tree;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Horizontal => write!(f, "horizontal"),
            Direction::Vertical => write!(f, "vertical"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    #[error("No container named '{0}'")]
    NameNotFound(String),

    #[error("Name '{0}' matches more than one container")]
    AmbiguousName(String),

    #[error("Container {0} is not attached to a parent")]
    NotAttached(ContainerId),

    #[error("Container {container} is already attached to {parent}")]
    AlreadyAttached {
        container: ContainerId,
        parent: ContainerId,
    },

    #[error("Containers {0} and {1} belong to different trees")]
    DifferentTrees(ContainerId, ContainerId),

    #[error("Container {0} cannot hold children")]
    NotSplitCapable(ContainerId),

    #[error("Cannot move {container} into its own subtree at {target}")]
    WouldCreateCycle {
        container: ContainerId,
        target: ContainerId,
    },

    #[error("{ancestor} is not an ancestor of {container}")]
    NotAnAncestor {
        ancestor: ContainerId,
        container: ContainerId,
    },

    #[error("Index {index} is out of range for {parent} with {len} children")]
    IndexOutOfRange {
        parent: ContainerId,
        index: usize,
        len: usize,
    },

    #[error("Layout tree is corrupted: {0}")]
    Corrupted(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
