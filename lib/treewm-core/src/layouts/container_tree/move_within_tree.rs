use super::container_tree::corrupted;
use crate::layouts::container_tree::container::ContainerId;
use crate::layouts::container_tree::ContainerTree;
use crate::layouts::{LayoutError, LayoutResult};
use log::debug;

impl ContainerTree {
    /// Moves `container` under `target_parent` at `target_index`, carrying focus recency
    /// along with it.
    ///
    /// Every precondition is checked before the tree is touched, so a rejected move
    /// leaves it exactly as it was.
    pub fn move_within_tree(
        &mut self,
        container: ContainerId,
        target_parent: ContainerId,
        target_index: usize,
    ) -> LayoutResult<()> {
        self.validate_move(container, target_parent, target_index)?;

        // This could be the target parent itself
        let lowest_common_ancestor = self
            .lowest_common_ancestor(container, target_parent)
            .map_err(|e| corrupted(format!("no common ancestor despite a shared root: {e}")))?;

        if target_parent == lowest_common_ancestor {
            return self.move_to_lowest_common_ancestor(
                container,
                lowest_common_ancestor,
                target_index,
            );
        }

        // Direct children of the LCA on the way down to each side. Either could be the
        // container or target parent itself.
        let container_ancestor = self.lca_child_ancestor(lowest_common_ancestor, container)?;
        let target_parent_ancestor =
            self.lca_child_ancestor(lowest_common_ancestor, target_parent)?;

        let is_focused_descendant = container == container_ancestor
            || self.last_focused_descendant(container_ancestor) == Some(container);

        let original_focus_index = self.branch_focus_index(container_ancestor)?;
        let is_subtree_focused =
            original_focus_index < self.branch_focus_index(target_parent_ancestor)?;

        debug!(
            "Moving {container} across subtrees to {target_parent} at {target_index} \
             (lca {lowest_common_ancestor}, focused descendant: {is_focused_descendant}, \
             focused subtree: {is_subtree_focused})"
        );

        self.detach(container)?;
        self.attach(target_parent, container, target_index)?;

        // The moved container becomes the focused descendant of the target subtree if its
        // own subtree was focused more recently, even if it was not the focused one there
        if is_subtree_focused {
            self.set_focused_descendant(container, target_parent_ancestor)?;
        }

        // If the focused descendant moved over, the target subtree takes the original
        // subtree's place in the LCA's focus order
        if is_focused_descendant && is_subtree_focused {
            self.get_mut(lowest_common_ancestor)?
                .focus_order_mut()
                .shift_to_index(original_focus_index, target_parent_ancestor);
        }

        Ok(())
    }

    fn move_to_lowest_common_ancestor(
        &mut self,
        container: ContainerId,
        lowest_common_ancestor: ContainerId,
        target_index: usize,
    ) -> LayoutResult<()> {
        let branch = self.lca_child_ancestor(lowest_common_ancestor, container)?;
        let original_focus_index = self.branch_focus_index(branch)?;

        let original_index = self
            .index(container)
            .ok_or(LayoutError::NotAttached(container))?;
        let original_lca_child_count = self.child_count(lowest_common_ancestor);

        self.detach(container)?;

        // Removing a direct child of the LCA shifts every later sibling left by one,
        // e.g. when moving a top-level container to the right within its workspace
        let new_lca_child_count = self.child_count(lowest_common_ancestor);
        let should_adjust_target_index =
            original_lca_child_count > new_lca_child_count && original_index < target_index;
        let adjusted_target_index = if should_adjust_target_index {
            target_index - 1
        } else {
            target_index
        };

        debug!(
            "Moving {container} within {lowest_common_ancestor} from {original_index} to \
             {adjusted_target_index} (requested {target_index}, focus slot {original_focus_index})"
        );

        self.attach(lowest_common_ancestor, container, adjusted_target_index)?;

        self.get_mut(lowest_common_ancestor)?
            .focus_order_mut()
            .shift_to_index(original_focus_index, container);

        Ok(())
    }

    fn validate_move(
        &self,
        container: ContainerId,
        target_parent: ContainerId,
        target_index: usize,
    ) -> LayoutResult<()> {
        if self.get(container)?.parent().is_none() {
            return Err(LayoutError::NotAttached(container));
        }

        let target = self.get(target_parent)?;
        if !target.is_split_capable() {
            return Err(LayoutError::NotSplitCapable(target_parent));
        }

        if self.root_of(container) != self.root_of(target_parent) {
            return Err(LayoutError::DifferentTrees(container, target_parent));
        }

        if container == target_parent || self.is_ancestor_of(container, target_parent) {
            return Err(LayoutError::WouldCreateCycle {
                container,
                target: target_parent,
            });
        }

        let len = target.child_count();
        if target_index > len {
            return Err(LayoutError::IndexOutOfRange {
                parent: target_parent,
                index: target_index,
                len,
            });
        }

        Ok(())
    }

    fn branch_focus_index(&self, branch: ContainerId) -> LayoutResult<usize> {
        self.focus_index(branch)
            .ok_or_else(|| corrupted(format!("{branch} is missing from its parent's focus order")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusPriority;
    use crate::layouts::container_tree::tests::{
        add_split, add_window, assert_children, assert_focus_order, assert_valid, new_tree,
        new_tree_with_priority, new_workspace, set_focus_order,
    };
    use crate::layouts::{ContainerKind, Direction};
    use proptest::prelude::*;

    type Snapshot = Vec<(Option<ContainerId>, Vec<ContainerId>, Vec<ContainerId>)>;

    fn snapshot(tree: &ContainerTree) -> Snapshot {
        tree.iter()
            .map(|c| (c.parent(), c.children().to_vec(), c.focus_order().to_vec()))
            .collect()
    }

    #[test]
    fn test_identity_move() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");
        set_focus_order(&mut tree, root, &[c, a, b]);
        let before = snapshot(&tree);

        tree.move_within_tree(b, root, 1).unwrap();
        assert_eq!(snapshot(&tree), before);
    }

    #[test]
    fn test_identity_move_nested() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let split = add_split(&mut tree, root, "split");
        let a = add_window(&mut tree, split, "a");
        let b = add_window(&mut tree, split, "b");
        set_focus_order(&mut tree, split, &[b, a]);
        let before = snapshot(&tree);

        tree.move_within_tree(a, split, 0).unwrap();
        assert_eq!(snapshot(&tree), before);
    }

    #[test]
    fn test_same_parent_shift_keeps_focus_slot() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");
        set_focus_order(&mut tree, root, &[b, a, c]);

        tree.move_within_tree(a, root, 2).unwrap();

        assert_children(&tree, root, &[b, a, c]);
        assert_focus_order(&tree, root, &[b, a, c]);
        assert_valid(&tree);
    }

    #[test]
    fn test_index_adjusted_on_shrink() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");

        tree.move_within_tree(a, root, 2).unwrap();

        assert_eq!(tree.index(a), Some(1));
        assert_children(&tree, root, &[b, a, c]);
        assert_valid(&tree);
    }

    #[test]
    fn test_move_to_end() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");

        tree.move_within_tree(a, root, 3).unwrap();
        assert_children(&tree, root, &[b, c, a]);
        assert_focus_order(&tree, root, &[a, b, c]);
    }

    #[test]
    fn test_move_left_is_not_adjusted() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");

        tree.move_within_tree(c, root, 0).unwrap();
        assert_children(&tree, root, &[c, a, b]);
        assert_focus_order(&tree, root, &[a, b, c]);
    }

    #[test]
    fn test_promote_to_ancestor_takes_branch_slot() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let split = add_split(&mut tree, root, "split");
        let b = add_window(&mut tree, split, "b");
        let c = add_window(&mut tree, split, "c");
        set_focus_order(&mut tree, root, &[split, a]);

        tree.move_within_tree(c, root, 0).unwrap();

        assert_children(&tree, root, &[c, a, split]);
        assert_children(&tree, split, &[b]);
        assert_focus_order(&tree, root, &[c, split, a]);
        assert_focus_order(&tree, split, &[b]);
        assert_valid(&tree);
    }

    #[test]
    fn test_promote_from_unfocused_branch() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let split = add_split(&mut tree, root, "split");
        let b = add_window(&mut tree, split, "b");
        set_focus_order(&mut tree, root, &[a, split]);

        tree.move_within_tree(b, root, 2).unwrap();

        assert_children(&tree, root, &[a, split, b]);
        assert_focus_order(&tree, root, &[a, b, split]);
        assert!(tree.children(split).is_empty());
        assert_valid(&tree);
    }

    #[test]
    fn test_cross_subtree_focus_promotion() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let x = add_split(&mut tree, root, "x");
        let y = add_split(&mut tree, root, "y");
        let x_inner = add_split(&mut tree, x, "x_inner");
        let other = add_window(&mut tree, x, "other");
        let n = add_window(&mut tree, x_inner, "n");
        let m = add_window(&mut tree, x_inner, "m");
        let y_window = add_window(&mut tree, y, "y_window");
        set_focus_order(&mut tree, root, &[x, y]);
        set_focus_order(&mut tree, x, &[x_inner, other]);
        set_focus_order(&mut tree, x_inner, &[n, m]);
        assert_eq!(tree.last_focused_descendant(x), Some(n));

        tree.move_within_tree(n, y, 1).unwrap();

        assert_children(&tree, y, &[y_window, n]);
        assert_focus_order(&tree, y, &[n, y_window]);
        assert_eq!(tree.last_focused_descendant(y), Some(n));
        assert_focus_order(&tree, root, &[y, x]);
        assert_eq!(tree.last_focused_descendant(root), Some(n));
        assert_valid(&tree);
    }

    #[test]
    fn test_cross_subtree_focused_subtree_but_not_focused_descendant() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let x = add_split(&mut tree, root, "x");
        let y = add_split(&mut tree, root, "y");
        let a = add_window(&mut tree, x, "a");
        let b = add_window(&mut tree, x, "b");
        let c = add_window(&mut tree, y, "c");
        set_focus_order(&mut tree, root, &[x, y]);
        set_focus_order(&mut tree, x, &[a, b]);

        tree.move_within_tree(b, y, 0).unwrap();

        assert_children(&tree, y, &[b, c]);
        assert_focus_order(&tree, y, &[b, c]);
        assert_focus_order(&tree, root, &[x, y]);
        assert_eq!(tree.last_focused_descendant(root), Some(a));
        assert_valid(&tree);
    }

    #[test]
    fn test_cross_subtree_from_less_recent_subtree() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let x = add_split(&mut tree, root, "x");
        let y = add_split(&mut tree, root, "y");
        let a = add_window(&mut tree, x, "a");
        let c = add_window(&mut tree, y, "c");
        set_focus_order(&mut tree, root, &[y, x]);

        tree.move_within_tree(a, y, 0).unwrap();

        assert_children(&tree, y, &[a, c]);
        assert_focus_order(&tree, y, &[c, a]);
        assert_focus_order(&tree, root, &[y, x]);
        assert_valid(&tree);
    }

    #[test]
    fn test_cross_subtree_direct_child_of_lca() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let z = add_window(&mut tree, root, "z");
        let a = add_window(&mut tree, root, "a");
        let y = add_split(&mut tree, root, "y");
        let c = add_window(&mut tree, y, "c");
        set_focus_order(&mut tree, root, &[z, a, y]);

        tree.move_within_tree(a, y, 1).unwrap();

        assert_children(&tree, root, &[z, y]);
        assert_children(&tree, y, &[c, a]);
        assert_focus_order(&tree, y, &[a, c]);
        assert_focus_order(&tree, root, &[z, y]);
        assert_valid(&tree);
    }

    #[test]
    fn test_cross_subtree_deep_target() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let y = add_split(&mut tree, root, "y");
        let b = add_window(&mut tree, y, "b");
        let y_inner = add_split(&mut tree, y, "y_inner");
        let c = add_window(&mut tree, y_inner, "c");
        set_focus_order(&mut tree, root, &[a, y]);
        set_focus_order(&mut tree, y, &[b, y_inner]);

        tree.move_within_tree(a, y_inner, 0).unwrap();

        assert_children(&tree, root, &[y]);
        assert_children(&tree, y_inner, &[a, c]);
        assert_focus_order(&tree, y_inner, &[a, c]);
        assert_focus_order(&tree, y, &[y_inner, b]);
        assert_focus_order(&tree, root, &[y]);
        assert_eq!(tree.last_focused_descendant(root), Some(a));
        assert_valid(&tree);
    }

    #[test]
    fn test_move_into_empty_split() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let empty = add_split(&mut tree, root, "empty");

        tree.move_within_tree(a, empty, 0).unwrap();

        assert_children(&tree, empty, &[a]);
        assert_children(&tree, root, &[empty]);
        assert_focus_order(&tree, empty, &[a]);
        assert_valid(&tree);
    }

    #[test]
    fn test_move_with_highest_priority_policy() {
        let mut tree = new_tree_with_priority(FocusPriority::Highest);
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");
        set_focus_order(&mut tree, root, &[b, a, c]);

        tree.move_within_tree(a, root, 2).unwrap();

        assert_children(&tree, root, &[b, a, c]);
        assert_focus_order(&tree, root, &[b, a, c]);
    }

    #[test]
    fn test_cross_tree_move_rejected() {
        let mut tree = new_tree();
        let first = new_workspace(&mut tree);
        let second = new_workspace(&mut tree);
        let a = add_window(&mut tree, first, "a");
        add_window(&mut tree, second, "b");
        let before = snapshot(&tree);

        assert_eq!(
            tree.move_within_tree(a, second, 0),
            Err(LayoutError::DifferentTrees(a, second))
        );
        assert_eq!(snapshot(&tree), before);
    }

    #[test]
    fn test_rejected_moves_leave_tree_untouched() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let split = add_split(&mut tree, root, "split");
        let inner = add_split(&mut tree, split, "inner");
        let before = snapshot(&tree);

        assert_eq!(
            tree.move_within_tree(root, split, 0),
            Err(LayoutError::NotAttached(root))
        );
        assert_eq!(
            tree.move_within_tree(split, a, 0),
            Err(LayoutError::NotSplitCapable(a))
        );
        assert_eq!(
            tree.move_within_tree(split, inner, 0),
            Err(LayoutError::WouldCreateCycle {
                container: split,
                target: inner
            })
        );
        assert_eq!(
            tree.move_within_tree(split, split, 0),
            Err(LayoutError::WouldCreateCycle {
                container: split,
                target: split
            })
        );
        assert_eq!(
            tree.move_within_tree(a, split, 2),
            Err(LayoutError::IndexOutOfRange {
                parent: split,
                index: 2,
                len: 1
            })
        );
        assert_eq!(
            tree.move_within_tree(ContainerId::new(99), root, 0),
            Err(LayoutError::ContainerNotFound(ContainerId::new(99)))
        );
        assert_eq!(snapshot(&tree), before);
    }

    fn build_tree(shape: &[(usize, bool)]) -> ContainerTree {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let mut splits = vec![root];
        for (i, (parent, is_window)) in shape.iter().enumerate() {
            let parent = splits[parent % splits.len()];
            let kind = if *is_window {
                ContainerKind::Window
            } else {
                ContainerKind::split(Direction::Horizontal)
            };
            let id = tree.add_child(parent, kind, format!("c{i}")).unwrap();
            if !*is_window {
                splits.push(id);
            }
        }
        tree
    }

    proptest! {
        #[test]
        fn random_moves_keep_tree_consistent(
            shape in prop::collection::vec((0..16usize, any::<bool>()), 1..24),
            focus in prop::collection::vec(0..64usize, 0..8),
            moves in prop::collection::vec((0..64usize, 0..64usize, 0..8usize), 1..32),
        ) {
            let mut tree = build_tree(&shape);
            let len = tree.len();
            for target in focus {
                tree.focus(ContainerId::new(target % len)).unwrap();
            }

            for (container, target_parent, index) in moves {
                let container = ContainerId::new(container % len);
                let target_parent = ContainerId::new(target_parent % len);
                let before = snapshot(&tree);

                match tree.move_within_tree(container, target_parent, index) {
                    Ok(()) => {
                        prop_assert_eq!(tree.parent(container), Some(target_parent));
                        prop_assert!(tree.validate().is_ok(), "{}", tree.debug_layout());
                    }
                    Err(_) => {
                        prop_assert_eq!(snapshot(&tree), before);
                    }
                }
            }
        }
    }
}
