pub use container::{Container, ContainerId, ContainerKind, FocusOrder};
pub use container_tree::*;
pub use container_tree_iterator::{Descendants, SelfAndAncestors};
pub use serialize::*;

mod container;
mod container_tree;
mod container_tree_iterator;
mod lca;
mod move_within_tree;
mod primitives;
mod serialize;
