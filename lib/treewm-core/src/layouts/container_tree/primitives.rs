use crate::config::FocusPriority;
use crate::layouts::container_tree::container::ContainerId;
use crate::layouts::container_tree::ContainerTree;
use crate::layouts::{LayoutError, LayoutResult};
use log::trace;

impl ContainerTree {
    /// Removes `id` from its parent, along with its entry in the parent's focus order.
    /// Returns the former parent.
    pub fn detach(&mut self, id: ContainerId) -> LayoutResult<ContainerId> {
        let parent = self.get(id)?.parent().ok_or(LayoutError::NotAttached(id))?;

        let parent_container = self.get_mut(parent)?;
        parent_container.children_mut().retain(|c| *c != id);
        parent_container.focus_order_mut().remove(id);
        self.get_mut(id)?.set_parent(None);

        trace!("Detached {id} from {parent}");
        Ok(parent)
    }

    /// Inserts the detached container `id` as the child of `parent` at `index`. Later
    /// siblings shift right. The focus entry is placed according to the configured
    /// [`FocusPriority`].
    pub fn attach(&mut self, parent: ContainerId, id: ContainerId, index: usize) -> LayoutResult<()> {
        let parent_container = self.get(parent)?;
        if !parent_container.is_split_capable() {
            return Err(LayoutError::NotSplitCapable(parent));
        }

        let len = parent_container.child_count();
        if index > len {
            return Err(LayoutError::IndexOutOfRange { parent, index, len });
        }

        if let Some(current_parent) = self.get(id)?.parent() {
            return Err(LayoutError::AlreadyAttached {
                container: id,
                parent: current_parent,
            });
        }

        if id == parent || self.is_ancestor_of(id, parent) {
            return Err(LayoutError::WouldCreateCycle {
                container: id,
                target: parent,
            });
        }

        let priority = self.new_child_focus();
        let parent_container = self.get_mut(parent)?;
        parent_container.children_mut().insert(index, id);
        match priority {
            FocusPriority::Lowest => {
                parent_container.focus_order_mut().push_back(id);
            }
            FocusPriority::Highest => parent_container.focus_order_mut().push_front(id),
        }
        self.get_mut(id)?.set_parent(Some(parent));

        trace!("Attached {id} to {parent} at index {index}");
        Ok(())
    }

    /// Makes `id` the most recently focused child at every level from `id` up to and
    /// including `end_ancestor`. The focus order of `end_ancestor`'s parent is left alone.
    pub fn set_focused_descendant(
        &mut self,
        id: ContainerId,
        end_ancestor: ContainerId,
    ) -> LayoutResult<()> {
        self.get(id)?;
        if id != end_ancestor && !self.is_ancestor_of(end_ancestor, id) {
            return Err(LayoutError::NotAnAncestor {
                ancestor: end_ancestor,
                container: id,
            });
        }

        let mut target = id;
        while target != end_ancestor {
            let parent = self.parent(target).ok_or(LayoutError::NotAttached(target))?;
            self.get_mut(parent)?
                .focus_order_mut()
                .shift_to_index(0, target);
            target = parent;
        }

        trace!("Set {id} as focused descendant up to {end_ancestor}");
        Ok(())
    }

    /// Marks `id` as focused all the way up to its root.
    pub fn focus(&mut self, id: ContainerId) -> LayoutResult<()> {
        let root = self.root_of(id).ok_or(LayoutError::ContainerNotFound(id))?;
        self.set_focused_descendant(id, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::container_tree::tests::{
        add_split, add_window, assert_children, assert_focus_order, assert_valid, new_tree,
        new_tree_with_priority, new_workspace, set_focus_order,
    };
    use crate::layouts::ContainerKind;

    #[test]
    fn test_detach_reindexes_siblings() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = add_window(&mut tree, root, "c");

        assert_eq!(tree.detach(a), Ok(root));
        assert_children(&tree, root, &[b, c]);
        assert_focus_order(&tree, root, &[b, c]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.index(a), None);
    }

    #[test]
    fn test_detach_root() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        assert_eq!(tree.detach(root), Err(LayoutError::NotAttached(root)));
    }

    #[test]
    fn test_attach_shifts_later_siblings() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");
        let c = tree.add_root(ContainerKind::Window, "c");

        tree.attach(root, c, 1).unwrap();
        assert_children(&tree, root, &[a, c, b]);
        assert_focus_order(&tree, root, &[a, b, c]);
        assert_valid(&tree);
    }

    #[test]
    fn test_attach_highest_priority() {
        let mut tree = new_tree_with_priority(FocusPriority::Highest);
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");

        assert_children(&tree, root, &[a, b]);
        assert_focus_order(&tree, root, &[b, a]);
    }

    #[test]
    fn test_attach_to_empty_parent() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = tree.add_root(ContainerKind::Window, "a");

        tree.attach(root, a, 0).unwrap();
        assert_children(&tree, root, &[a]);
        assert_focus_order(&tree, root, &[a]);
    }

    #[test]
    fn test_attach_errors() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let split = add_split(&mut tree, root, "split");
        let loose = tree.add_root(ContainerKind::Window, "loose");

        assert_eq!(
            tree.attach(a, loose, 0),
            Err(LayoutError::NotSplitCapable(a))
        );
        assert_eq!(
            tree.attach(root, loose, 3),
            Err(LayoutError::IndexOutOfRange {
                parent: root,
                index: 3,
                len: 2
            })
        );
        assert_eq!(
            tree.attach(split, a, 0),
            Err(LayoutError::AlreadyAttached {
                container: a,
                parent: root
            })
        );
        assert_valid(&tree);
    }

    #[test]
    fn test_attach_into_own_subtree() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let split = add_split(&mut tree, root, "split");
        let inner = add_split(&mut tree, split, "inner");
        tree.detach(split).unwrap();

        assert_eq!(
            tree.attach(inner, split, 0),
            Err(LayoutError::WouldCreateCycle {
                container: split,
                target: inner
            })
        );
        assert_eq!(
            tree.attach(split, split, 0),
            Err(LayoutError::WouldCreateCycle {
                container: split,
                target: split
            })
        );
    }

    #[test]
    fn test_set_focused_descendant_stops_at_end_ancestor() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let x = add_split(&mut tree, root, "x");
        let y = add_split(&mut tree, root, "y");
        let inner = add_split(&mut tree, y, "inner");
        let a = add_window(&mut tree, inner, "a");
        let b = add_window(&mut tree, inner, "b");
        let c = add_window(&mut tree, y, "c");
        set_focus_order(&mut tree, y, &[c, inner]);
        set_focus_order(&mut tree, inner, &[a, b]);

        tree.set_focused_descendant(b, y).unwrap();
        assert_focus_order(&tree, inner, &[b, a]);
        assert_focus_order(&tree, y, &[inner, c]);
        assert_focus_order(&tree, root, &[x, y]);
        assert_eq!(tree.last_focused_descendant(y), Some(b));
    }

    #[test]
    fn test_set_focused_descendant_not_an_ancestor() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let b = add_window(&mut tree, root, "b");

        assert_eq!(
            tree.set_focused_descendant(a, b),
            Err(LayoutError::NotAnAncestor {
                ancestor: b,
                container: a
            })
        );
        assert_eq!(tree.set_focused_descendant(a, a), Ok(()));
        assert_eq!(tree.set_focused_descendant(a, root), Ok(()));
        assert_eq!(tree.last_focused_descendant(root), Some(a));
    }

    #[test]
    fn test_focus_updates_every_level() {
        let mut tree = new_tree();
        let root = new_workspace(&mut tree);
        let a = add_window(&mut tree, root, "a");
        let split = add_split(&mut tree, root, "split");
        let b = add_window(&mut tree, split, "b");
        let c = add_window(&mut tree, split, "c");

        tree.focus(c).unwrap();
        assert_focus_order(&tree, root, &[split, a]);
        assert_focus_order(&tree, split, &[c, b]);
        assert_eq!(tree.last_focused_descendant(root), Some(c));
    }
}
