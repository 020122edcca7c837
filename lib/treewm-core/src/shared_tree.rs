use crate::layouts::{ContainerId, ContainerTree, LayoutError, LayoutResult};
use std::sync::{Arc, RwLock};

/// A container tree that can be read from many threads while moves hold the write lock
/// for their whole duration.
#[derive(Debug, Clone, Default)]
pub struct SharedTree {
    inner: Arc<RwLock<ContainerTree>>,
}

impl SharedTree {
    pub fn new(tree: ContainerTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn read<F, R>(&self, accessor: F) -> LayoutResult<R>
    where
        F: FnOnce(&ContainerTree) -> R,
    {
        let tree = self.inner.read().map_err(|_| poisoned())?;
        Ok(accessor(&tree))
    }

    pub fn access_mut<F, R>(&self, accessor: F) -> LayoutResult<R>
    where
        F: FnOnce(&mut ContainerTree) -> LayoutResult<R>,
    {
        let mut tree = self.inner.write().map_err(|_| poisoned())?;
        accessor(&mut tree)
    }

    pub fn move_within_tree(
        &self,
        container: ContainerId,
        target_parent: ContainerId,
        target_index: usize,
    ) -> LayoutResult<()> {
        self.access_mut(|tree| tree.move_within_tree(container, target_parent, target_index))
    }
}

fn poisoned() -> LayoutError {
    LayoutError::Corrupted("tree lock poisoned by a panicking writer".to_string())
}
