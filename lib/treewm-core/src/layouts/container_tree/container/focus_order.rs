use crate::layouts::container_tree::container::ContainerId;
use indexmap::IndexSet;

/// The direct children of a container, most recently focused first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusOrder {
    entries: IndexSet<ContainerId>,
}

impl FocusOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.entries.contains(&id)
    }

    /// Position of `id` in this order, 0 being the most recent.
    pub fn index_of(&self, id: ContainerId) -> Option<usize> {
        self.entries.get_index_of(&id)
    }

    pub fn most_recent(&self) -> Option<ContainerId> {
        self.entries.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ContainerId> {
        self.iter().collect()
    }

    /// Adds `id` with the lowest priority. Returns false if it was already present.
    pub fn push_back(&mut self, id: ContainerId) -> bool {
        self.entries.insert(id)
    }

    /// Adds `id` with the highest priority, moving it to the front if it was already present.
    pub fn push_front(&mut self, id: ContainerId) {
        let (index, _) = self.entries.insert_full(id);
        self.entries.move_index(index, 0);
    }

    pub fn remove(&mut self, id: ContainerId) -> bool {
        self.entries.shift_remove(&id)
    }

    /// Takes `id` out of its current slot and puts it back at `index`, shifting the
    /// entries in between. An index past the end places it last.
    pub fn shift_to_index(&mut self, index: usize, id: ContainerId) -> bool {
        let Some(current) = self.entries.get_index_of(&id) else {
            return false;
        };

        let index = index.min(self.entries.len() - 1);
        self.entries.move_index(current, index);
        true
    }
}
