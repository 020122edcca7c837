use crate::config::Config;
use crate::layouts::container_tree::container::{ContainerId, ContainerKind};
use crate::layouts::container_tree::ContainerTree;
use crate::layouts::Direction;
use crate::serialization::SerializationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedContainerTree {
    pub roots: Vec<SerializedContainer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedContainer {
    pub kind: SerializedKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedContainer>,
    /// Positions in `children`, most recently focused first. Omitted when it matches
    /// sibling order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_order: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializedKind {
    Monitor,
    Workspace,
    Split,
    Window,
}

pub fn serialize_tree(tree: &ContainerTree) -> SerializedContainerTree {
    SerializedContainerTree {
        roots: tree
            .roots()
            .map(|root| serialize_container(tree, root))
            .collect(),
    }
}

pub fn serialize_tree_value(tree: &ContainerTree) -> Result<serde_yaml::Value, SerializationError> {
    Ok(serde_yaml::to_value(serialize_tree(tree))?)
}

fn serialize_container(tree: &ContainerTree, id: ContainerId) -> SerializedContainer {
    let (kind, direction) = match tree.kind(id) {
        Some(ContainerKind::Monitor) => (SerializedKind::Monitor, None),
        Some(ContainerKind::Workspace) => (SerializedKind::Workspace, None),
        Some(ContainerKind::Split { direction }) => (SerializedKind::Split, Some(direction)),
        Some(ContainerKind::Window) | None => (SerializedKind::Window, None),
    };

    let children = tree.children(id);
    let focus_order = tree
        .focus_order(id)
        .filter(|order| !order.iter().eq(children.iter().copied()))
        .map(|order| {
            order
                .iter()
                .filter_map(|c| children.iter().position(|child| *child == c))
                .collect()
        });

    SerializedContainer {
        kind,
        name: tree.name(id).unwrap_or_default().to_string(),
        direction,
        children: children
            .iter()
            .map(|child| serialize_container(tree, *child))
            .collect(),
        focus_order,
    }
}

pub fn deserialize_tree(
    serialized: &SerializedContainerTree,
    config: &Config,
) -> Result<ContainerTree, SerializationError> {
    let mut tree = ContainerTree::with_config(config);
    for root in &serialized.roots {
        let id = tree.add_root(container_kind(root), root.name.clone());
        deserialize_children(&mut tree, id, root)?;
    }
    Ok(tree)
}

pub fn deserialize_tree_value(
    value: &serde_yaml::Value,
    config: &Config,
) -> Result<ContainerTree, SerializationError> {
    let serialized: SerializedContainerTree = serde_yaml::from_value(value.clone())?;
    deserialize_tree(&serialized, config)
}

fn container_kind(serialized: &SerializedContainer) -> ContainerKind {
    match serialized.kind {
        SerializedKind::Monitor => ContainerKind::Monitor,
        SerializedKind::Workspace => ContainerKind::Workspace,
        SerializedKind::Split => ContainerKind::split(serialized.direction.unwrap_or_default()),
        SerializedKind::Window => ContainerKind::Window,
    }
}

fn deserialize_children(
    tree: &mut ContainerTree,
    parent: ContainerId,
    serialized: &SerializedContainer,
) -> Result<(), SerializationError> {
    let mut children = Vec::with_capacity(serialized.children.len());
    for child in &serialized.children {
        let id = tree.add_child(parent, container_kind(child), child.name.clone())?;
        deserialize_children(tree, id, child)?;
        children.push(id);
    }

    // Listed positions come first, anything left keeps its sibling order
    let mut listed = vec![false; children.len()];
    let mut ordered = Vec::with_capacity(children.len());
    for position in serialized.focus_order.iter().flatten().copied() {
        match listed.get_mut(position) {
            Some(seen) if !*seen => *seen = true,
            Some(_) => {
                return Err(SerializationError::InvalidLayout(format!(
                    "position {position} appears twice in the focus order of '{}'",
                    serialized.name
                )))
            }
            None => {
                return Err(SerializationError::InvalidLayout(format!(
                    "position {position} in the focus order of '{}' is out of range for {} children",
                    serialized.name,
                    children.len()
                )))
            }
        }
        ordered.push(children[position]);
    }
    ordered.extend(
        children
            .iter()
            .zip(&listed)
            .filter(|(_, seen)| !**seen)
            .map(|(child, _)| *child),
    );

    let focus_order = tree.get_mut(parent)?.focus_order_mut();
    for id in ordered.iter().rev() {
        focus_order.shift_to_index(0, *id);
    }

    Ok(())
}
