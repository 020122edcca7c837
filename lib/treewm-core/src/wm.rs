use crate::config::Config;
use crate::layouts::{
    serialize_tree, ContainerId, ContainerTree, LayoutError, LayoutResult, SerializedContainerTree,
};
use log::{debug, info};
use std::fmt;

/// Refers to a container either by handle or by its name in the layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerSelector {
    Id(ContainerId),
    Name(String),
}

impl From<ContainerId> for ContainerSelector {
    fn from(id: ContainerId) -> Self {
        ContainerSelector::Id(id)
    }
}

impl From<&str> for ContainerSelector {
    fn from(name: &str) -> Self {
        ContainerSelector::Name(name.to_string())
    }
}

impl From<String> for ContainerSelector {
    fn from(name: String) -> Self {
        ContainerSelector::Name(name)
    }
}

impl fmt::Display for ContainerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerSelector::Id(id) => write!(f, "{id}"),
            ContainerSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutAction {
    Focus(ContainerSelector),
    Move {
        container: ContainerSelector,
        target_parent: ContainerSelector,
        target_index: usize,
    },
}

/// Owns the container tree and applies layout operations to it
#[derive(Debug)]
pub struct LayoutManager {
    tree: ContainerTree,
    validate_after_move: bool,
}

impl LayoutManager {
    pub fn new(tree: ContainerTree) -> Self {
        Self::with_config(tree, &Config::current())
    }

    pub fn with_config(tree: ContainerTree, config: &Config) -> Self {
        Self {
            tree,
            validate_after_move: config.validate_after_move,
        }
    }

    pub fn tree(&self) -> &ContainerTree {
        &self.tree
    }

    pub fn into_tree(self) -> ContainerTree {
        self.tree
    }

    /// Names must identify exactly one container
    pub fn resolve(&self, selector: &ContainerSelector) -> LayoutResult<ContainerId> {
        match selector {
            ContainerSelector::Id(id) => self.tree.get(*id).map(|c| c.id()),
            ContainerSelector::Name(name) => {
                let mut matches = self
                    .tree
                    .iter()
                    .filter(|c| c.name() == name.as_str())
                    .map(|c| c.id());
                match (matches.next(), matches.next()) {
                    (Some(id), None) => Ok(id),
                    (Some(_), Some(_)) => Err(LayoutError::AmbiguousName(name.clone())),
                    (None, _) => Err(LayoutError::NameNotFound(name.clone())),
                }
            }
        }
    }

    pub fn move_within_tree(
        &mut self,
        container: &ContainerSelector,
        target_parent: &ContainerSelector,
        target_index: usize,
    ) -> LayoutResult<()> {
        let container = self.resolve(container)?;
        let target_parent = self.resolve(target_parent)?;

        debug!("Moving {container} to {target_parent} at index {target_index}");
        self.tree
            .move_within_tree(container, target_parent, target_index)?;

        if self.validate_after_move {
            self.tree.validate()?;
        }

        Ok(())
    }

    pub fn focus(&mut self, container: &ContainerSelector) -> LayoutResult<()> {
        let id = self.resolve(container)?;
        self.tree.focus(id)?;
        info!("Focused {container}");
        Ok(())
    }

    pub fn apply(&mut self, action: &LayoutAction) -> LayoutResult<()> {
        match action {
            LayoutAction::Focus(container) => self.focus(container),
            LayoutAction::Move {
                container,
                target_parent,
                target_index,
            } => self.move_within_tree(container, target_parent, *target_index),
        }
    }

    pub fn serialize(&self) -> SerializedContainerTree {
        serialize_tree(&self.tree)
    }

    pub fn debug_layout(&self) -> String {
        self.tree.debug_layout()
    }
}
