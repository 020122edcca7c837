pub use focus_order::*;

use crate::layouts::Direction;
use std::fmt;

mod focus_order;

/// Stable handle of a container inside a [`ContainerTree`](super::ContainerTree).
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct ContainerId(usize);

impl ContainerId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ContainerKind {
    Monitor,
    Workspace,
    Split { direction: Direction },
    Window,
}

impl ContainerKind {
    pub fn split(direction: Direction) -> Self {
        ContainerKind::Split { direction }
    }

    /// Whether containers of this kind accept children.
    pub fn is_split_capable(&self) -> bool {
        !matches!(self, ContainerKind::Window)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Monitor => write!(f, "Monitor"),
            ContainerKind::Workspace => write!(f, "Workspace"),
            ContainerKind::Split { direction } => write!(f, "Split({direction})"),
            ContainerKind::Window => write!(f, "Window"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Container {
    id: ContainerId,
    kind: ContainerKind,
    name: String,
    parent: Option<ContainerId>,
    children: Vec<ContainerId>,
    child_focus_order: FocusOrder,
}

impl Container {
    pub(super) fn new(id: ContainerId, kind: ContainerKind, name: String) -> Self {
        Self {
            id,
            kind,
            name,
            parent: None,
            children: Vec::new(),
            child_focus_order: FocusOrder::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_split_capable(&self) -> bool {
        self.kind.is_split_capable()
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub(super) fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.parent = parent;
    }

    pub fn children(&self) -> &[ContainerId] {
        &self.children
    }

    pub(super) fn children_mut(&mut self) -> &mut Vec<ContainerId> {
        &mut self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn index_of_child(&self, child: ContainerId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    pub fn focus_order(&self) -> &FocusOrder {
        &self.child_focus_order
    }

    pub(super) fn focus_order_mut(&mut self) -> &mut FocusOrder {
        &mut self.child_focus_order
    }

    /// The child whose subtree held focus most recently.
    pub fn last_focused_child(&self) -> Option<ContainerId> {
        self.child_focus_order.most_recent()
    }
}
