use crate::layouts::container_tree::container::ContainerId;
use crate::layouts::container_tree::ContainerTree;
use crate::layouts::{LayoutError, LayoutResult};
use std::collections::HashSet;

impl ContainerTree {
    /// The closest container that is `a`, `b`, or an ancestor of both.
    pub fn lowest_common_ancestor(&self, a: ContainerId, b: ContainerId) -> LayoutResult<ContainerId> {
        self.get(a)?;
        self.get(b)?;

        let ancestors_of_a: HashSet<ContainerId> = self.self_and_ancestors(a).collect();
        self.self_and_ancestors(b)
            .find(|ancestor| ancestors_of_a.contains(ancestor))
            .ok_or(LayoutError::DifferentTrees(a, b))
    }

    /// The direct child of `ancestor` on the path down to `descendant`. This is
    /// `descendant` itself when it is a direct child.
    pub fn lca_child_ancestor(
        &self,
        ancestor: ContainerId,
        descendant: ContainerId,
    ) -> LayoutResult<ContainerId> {
        self.self_and_ancestors(descendant)
            .find(|c| self.parent(*c) == Some(ancestor))
            .ok_or(LayoutError::NotAnAncestor {
                ancestor,
                container: descendant,
            })
    }
}
