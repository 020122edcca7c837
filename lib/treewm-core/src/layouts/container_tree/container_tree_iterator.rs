use crate::layouts::container_tree::container::ContainerId;
use crate::layouts::container_tree::ContainerTree;

/// Walks from a container up to its root, closest first. Cloning restarts the walk.
#[derive(Debug, Clone)]
pub struct SelfAndAncestors<'a> {
    tree: &'a ContainerTree,
    next: Option<ContainerId>,
}

impl<'a> SelfAndAncestors<'a> {
    pub fn new(tree: &'a ContainerTree, start: ContainerId) -> Self {
        let next = tree.contains(start).then_some(start);
        Self { tree, next }
    }
}

impl Iterator for SelfAndAncestors<'_> {
    type Item = ContainerId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Depth-first, pre-order walk over everything below a container.
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a ContainerTree,
    stack: Vec<ContainerId>,
}

impl<'a> Descendants<'a> {
    pub fn new(tree: &'a ContainerTree, root: ContainerId) -> Self {
        let stack = tree.children(root).iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = ContainerId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
