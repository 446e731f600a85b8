use std::collections::BTreeMap;

use log::trace;

use super::types::{Bounds, Cell};
use crate::catalog::ComponentId;
use crate::constants::{DEFAULT_BASE, NO_FREE_NEIGHBOURS};
use crate::tree::{NodeId, PlacementTree, Slot};

/// What physically holds a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub node: NodeId,
    pub component: ComponentId,
    pub resource: bool,
}

/// Exclusive cell -> node occupancy plus bounds over the occupied cells.
///
/// Reuse aliases never appear here; they only carry a `Slot::Shared` in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<Cell, Occupant>,
    bounds: Option<Bounds>,
    base: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
            bounds: None,
            base: DEFAULT_BASE,
        }
    }

    /// Largest x any node may occupy
    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.cells.contains_key(&cell)
    }

    pub fn occupant(&self, cell: Cell) -> Option<&Occupant> {
        self.cells.get(&cell)
    }

    /// Occupied cells in ascending cell order
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, &Occupant)> {
        self.cells.iter().map(|(c, o)| (*c, o))
    }

    /// Vertical footprint in cells (0 when empty)
    pub fn height(&self) -> i32 {
        self.bounds.map_or(0, |b| b.height())
    }

    pub fn width(&self) -> i32 {
        self.bounds.map_or(0, |b| b.width())
    }

    /// Caller guarantees `cell` is free
    pub fn place(&mut self, tree: &mut PlacementTree, node: NodeId, cell: Cell) {
        debug_assert!(self.is_free(cell), "cell {cell:?} is already occupied");

        let n = tree.node(node);
        let occupant = Occupant {
            node,
            component: n.component.clone(),
            resource: n.kind.is_resource(),
        };
        trace!("place {} at ({}, {})", occupant.component, cell.x, cell.y);

        self.cells.insert(cell, occupant);
        tree.set_slot(node, Some(Slot::Owned(cell)));
        self.recompute_bounds();
    }

    /// Caller guarantees `node` owns a cell
    pub fn unplace(&mut self, tree: &mut PlacementTree, node: NodeId) {
        let slot = tree.node(node).slot();
        debug_assert!(
            matches!(slot, Some(Slot::Owned(_))),
            "unplace on node without an owned cell: {slot:?}"
        );
        if let Some(Slot::Owned(cell)) = slot {
            trace!("unplace {} from ({}, {})", tree.node(node).component, cell.x, cell.y);
            self.cells.remove(&cell);
            self.recompute_bounds();
        }
        tree.set_slot(node, None);
    }

    /// Unoccupied neighbours of the node's parent
    pub fn free_neighbours(&self, tree: &PlacementTree, node: NodeId) -> Vec<Cell> {
        match parent_cell(tree, node) {
            Some(origin) => origin.neighbours().filter(|c| self.is_free(*c)).collect(),
            None => Vec::new(),
        }
    }

    /// Occupied neighbours of the node's parent with the component holding each
    pub fn surrounding_instances(
        &self,
        tree: &PlacementTree,
        node: NodeId,
    ) -> Vec<(ComponentId, Cell)> {
        let Some(origin) = parent_cell(tree, node) else {
            return Vec::new();
        };
        origin
            .neighbours()
            .filter_map(|c| self.cells.get(&c).map(|o| (o.component.clone(), c)))
            .collect()
    }

    /// How far placing at `cell` would stretch the vertical bounds
    pub fn expansion_factor(&self, cell: Cell) -> i32 {
        match self.bounds {
            Some(b) if b.contains_y(cell.y) => 0,
            Some(b) if cell.y > b.max_y => cell.y - b.max_y,
            Some(b) => b.min_y - cell.y,
            None => 0,
        }
    }

    /// Sort key for sibling candidates; crowded parents go last
    pub fn candidate_order(&self, tree: &PlacementTree, node: NodeId) -> i32 {
        self.free_neighbours(tree, node)
            .into_iter()
            .map(|c| self.expansion_factor(c))
            .min()
            .unwrap_or(NO_FREE_NEIGHBOURS)
    }

    fn recompute_bounds(&mut self) {
        self.bounds = Bounds::from_cells(self.cells.iter().map(|(c, o)| (*c, o.resource)));
    }
}

fn parent_cell(tree: &PlacementTree, node: NodeId) -> Option<Cell> {
    tree.node(node).parent.and_then(|p| tree.position(p))
}
