use crate::catalog::{Catalog, ComponentId, ComponentKind};
use crate::error::{PlaceError, Result};
use crate::grid::Cell;

/// Arena index of a node; the root is always index 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a node sits. `Shared` aliases a cell owned by another node of the same component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Owned(Cell),
    Shared(Cell),
}

impl Slot {
    pub fn cell(self) -> Cell {
        match self {
            Slot::Owned(c) | Slot::Shared(c) => c,
        }
    }

    pub fn is_shared(self) -> bool {
        matches!(self, Slot::Shared(_))
    }
}

/// One instance of a component within a request
#[derive(Debug, Clone)]
pub struct Node {
    pub component: ComponentId,
    pub kind: ComponentKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    slot: Option<Slot>,
}

impl Node {
    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }
}

/// Fully expanded dependency tree. Shape is fixed after `expand`; only slots change.
#[derive(Debug, Clone)]
pub struct PlacementTree {
    nodes: Vec<Node>,
}

impl PlacementTree {
    /// Eagerly create one child per dependency entry, all the way down
    pub fn expand(catalog: &Catalog, root: &ComponentId) -> Result<Self> {
        let def = catalog
            .get(root)
            .ok_or_else(|| PlaceError::UnknownComponent(root.clone()))?;
        let mut nodes = vec![Node {
            component: def.id.clone(),
            kind: def.kind.clone(),
            parent: None,
            children: Vec::new(),
            slot: None,
        }];

        let mut pending = vec![NodeId(0)];
        while let Some(id) = pending.pop() {
            let def = catalog
                .get(&nodes[id.0].component)
                .ok_or_else(|| PlaceError::UnknownComponent(nodes[id.0].component.clone()))?;

            let mut children = Vec::with_capacity(def.dependencies.len());
            for dep in &def.dependencies {
                let child = catalog
                    .get(dep)
                    .ok_or_else(|| PlaceError::UnknownComponent(dep.clone()))?;
                let child_id = NodeId(nodes.len());
                nodes.push(Node {
                    component: child.id.clone(),
                    kind: child.kind.clone(),
                    parent: Some(id),
                    children: Vec::new(),
                    slot: None,
                });
                children.push(child_id);
            }
            pending.extend(children.iter().rev());
            nodes[id.0].children = children;
        }

        Ok(Self { nodes })
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn position(&self, id: NodeId) -> Option<Cell> {
        self.nodes[id.0].slot.map(Slot::cell)
    }

    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(|n| n.slot.is_some())
    }

    pub(crate) fn set_slot(&mut self, id: NodeId, slot: Option<Slot>) {
        self.nodes[id.0].slot = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentDef;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ComponentDef::resource("ore"),
            ComponentDef::assembler("plate", "smelt", &["ore"]),
            ComponentDef::assembler("frame", "frame", &["plate", "plate", "ore"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_expand_duplicates_become_separate_nodes() {
        let tree = PlacementTree::expand(&catalog(), &"frame".into()).unwrap();
        // frame + 2 * (plate + ore) + ore
        assert_eq!(tree.len(), 6);

        let root = tree.node(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.children.len(), 3);
        let names: Vec<&str> = root
            .children
            .iter()
            .map(|c| tree.node(*c).component.as_str())
            .collect();
        assert_eq!(names, vec!["plate", "plate", "ore"]);
        assert_ne!(root.children[0], root.children[1]);
    }

    #[test]
    fn test_parent_links() {
        let tree = PlacementTree::expand(&catalog(), &"frame".into()).unwrap();
        for (id, node) in tree.iter() {
            for child in &node.children {
                assert_eq!(tree.node(*child).parent, Some(id));
            }
        }
    }

    #[test]
    fn test_expand_unknown_root() {
        let err = PlacementTree::expand(&catalog(), &"engine".into()).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownComponent(id) if id.as_str() == "engine"));
    }

    #[test]
    fn test_new_tree_is_unplaced() {
        let mut tree = PlacementTree::expand(&catalog(), &"plate".into()).unwrap();
        assert!(!tree.is_complete());
        assert_eq!(tree.position(tree.root()), None);

        let root = tree.root();
        tree.set_slot(root, Some(Slot::Shared(Cell::new(-1, 2))));
        let child = tree.node(root).children[0];
        tree.set_slot(child, Some(Slot::Owned(Cell::ORIGIN)));
        assert!(tree.is_complete());
        assert_eq!(tree.position(root), Some(Cell::new(-1, 2)));
        assert!(tree.node(root).slot().unwrap().is_shared());
    }
}
