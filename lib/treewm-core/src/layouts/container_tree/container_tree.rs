use crate::config::{Config, FocusPriority};
use crate::layouts::container_tree::container::{
    Container, ContainerId, ContainerKind, FocusOrder,
};
use crate::layouts::container_tree::container_tree_iterator::{Descendants, SelfAndAncestors};
use crate::layouts::{LayoutError, LayoutResult};
use log::error;
use std::collections::HashSet;
use std::fmt::Write;

/// Arena holding every container of one or more trees. Handles stay valid for the
/// lifetime of the arena since containers are never removed from it.
#[derive(Debug, Clone)]
pub struct ContainerTree {
    containers: Vec<Container>,
    new_child_focus: FocusPriority,
}

impl Default for ContainerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerTree {
    pub fn new() -> Self {
        Self::with_config(&Config::current())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            containers: Vec::new(),
            new_child_focus: config.new_child_focus,
        }
    }

    pub fn new_child_focus(&self) -> FocusPriority {
        self.new_child_focus
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Creates a container that starts its own tree.
    pub fn add_root(&mut self, kind: ContainerKind, name: impl Into<String>) -> ContainerId {
        let id = ContainerId::new(self.containers.len());
        self.containers.push(Container::new(id, kind, name.into()));
        id
    }

    /// Creates a container and attaches it as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: ContainerId,
        kind: ContainerKind,
        name: impl Into<String>,
    ) -> LayoutResult<ContainerId> {
        let parent_container = self.get(parent)?;
        if !parent_container.is_split_capable() {
            return Err(LayoutError::NotSplitCapable(parent));
        }

        let index = parent_container.child_count();
        let id = self.add_root(kind, name);
        self.attach(parent, id, index)?;
        Ok(id)
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        id.index() < self.containers.len()
    }

    pub fn get(&self, id: ContainerId) -> LayoutResult<&Container> {
        self.containers
            .get(id.index())
            .ok_or(LayoutError::ContainerNotFound(id))
    }

    pub(super) fn get_mut(&mut self, id: ContainerId) -> LayoutResult<&mut Container> {
        self.containers
            .get_mut(id.index())
            .ok_or(LayoutError::ContainerNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn kind(&self, id: ContainerId) -> Option<ContainerKind> {
        self.containers.get(id.index()).map(|c| c.kind())
    }

    pub fn name(&self, id: ContainerId) -> Option<&str> {
        self.containers.get(id.index()).map(|c| c.name())
    }

    pub fn parent(&self, id: ContainerId) -> Option<ContainerId> {
        self.containers.get(id.index()).and_then(|c| c.parent())
    }

    pub fn children(&self, id: ContainerId) -> &[ContainerId] {
        self.containers
            .get(id.index())
            .map(|c| c.children())
            .unwrap_or_default()
    }

    pub fn child_count(&self, id: ContainerId) -> usize {
        self.children(id).len()
    }

    /// Position of `id` among its siblings.
    pub fn index(&self, id: ContainerId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.get(parent).ok()?.index_of_child(id)
    }

    pub fn focus_order(&self, id: ContainerId) -> Option<&FocusOrder> {
        self.containers.get(id.index()).map(|c| c.focus_order())
    }

    /// Position of `id` in its parent's focus order, 0 being the most recent.
    pub fn focus_index(&self, id: ContainerId) -> Option<usize> {
        self.focus_order(self.parent(id)?)?.index_of(id)
    }

    pub fn last_focused_child(&self, id: ContainerId) -> Option<ContainerId> {
        self.containers.get(id.index())?.last_focused_child()
    }

    /// Follows the most recent focus entry at every level until reaching a leaf.
    /// `None` when `id` has no children.
    pub fn last_focused_descendant(&self, id: ContainerId) -> Option<ContainerId> {
        let mut current = self.last_focused_child(id)?;
        while let Some(next) = self.last_focused_child(current) {
            current = next;
        }
        Some(current)
    }

    pub fn self_and_ancestors(&self, id: ContainerId) -> SelfAndAncestors<'_> {
        SelfAndAncestors::new(self, id)
    }

    pub fn ancestors(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        self.self_and_ancestors(id).skip(1)
    }

    pub fn descendants(&self, id: ContainerId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    pub fn root_of(&self, id: ContainerId) -> Option<ContainerId> {
        self.self_and_ancestors(id).last()
    }

    pub fn roots(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers
            .iter()
            .filter(|c| c.parent().is_none())
            .map(|c| c.id())
    }

    /// Windows reachable from a root, in pre-order
    pub fn windows(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.roots()
            .flat_map(|root| std::iter::once(root).chain(self.descendants(root)))
            .filter(|id| self.kind(*id) == Some(ContainerKind::Window))
    }

    pub fn is_ancestor_of(&self, ancestor: ContainerId, id: ContainerId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.id())
    }

    /// Checks every structural invariant, reporting the first violation found.
    pub fn validate(&self) -> LayoutResult<()> {
        for container in &self.containers {
            let id = container.id();

            if !container.is_split_capable() && container.child_count() > 0 {
                return Err(corrupted(format!("{id} cannot hold children but has some")));
            }

            if let Some(parent) = container.parent() {
                let parent_container = self.get(parent).map_err(|_| {
                    corrupted(format!("{id} points at missing parent {parent}"))
                })?;
                if parent_container.index_of_child(id).is_none() {
                    return Err(corrupted(format!("{parent} does not list its child {id}")));
                }
            }

            let mut seen = HashSet::new();
            for child in container.children() {
                if !seen.insert(*child) {
                    return Err(corrupted(format!("{child} appears twice under {id}")));
                }
                if self.parent(*child) != Some(id) {
                    return Err(corrupted(format!("{child} does not point back at {id}")));
                }
            }

            let focus_order = container.focus_order();
            if focus_order.len() != container.child_count()
                || !container.children().iter().all(|c| focus_order.contains(*c))
            {
                return Err(corrupted(format!(
                    "focus order {:?} of {id} does not match children {:?}",
                    focus_order.to_vec(),
                    container.children()
                )));
            }

            if self.self_and_ancestors(id).nth(self.containers.len()).is_some() {
                return Err(corrupted(format!("{id} is part of a parent cycle")));
            }
        }

        Ok(())
    }

    /// Renders every tree as indented text, listing focus orders by name.
    pub fn debug_layout(&self) -> String {
        let mut output = String::new();
        for root in self.roots() {
            self.debug_container(root, 0, &mut output);
        }
        output
    }

    fn debug_container(&self, id: ContainerId, depth: usize, output: &mut String) {
        let Ok(container) = self.get(id) else {
            return;
        };

        let _ = write!(
            output,
            "{}{} \"{}\" {}",
            "  ".repeat(depth),
            container.kind(),
            container.name(),
            id
        );
        if !container.focus_order().is_empty() {
            let names: Vec<_> = container
                .focus_order()
                .iter()
                .filter_map(|c| self.name(c))
                .collect();
            let _ = write!(output, " [focus: {}]", names.join(", "));
        }
        output.push('\n');

        for child in container.children() {
            self.debug_container(*child, depth + 1, output);
        }
    }
}

pub(crate) fn corrupted(message: impl Into<String>) -> LayoutError {
    let message = message.into();
    error!("Layout tree corruption detected: {message}");
    LayoutError::Corrupted(message)
}
