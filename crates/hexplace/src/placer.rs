use itertools::Itertools;
use log::{debug, trace};

use crate::catalog::{Catalog, ComponentId, ComponentKind};
use crate::constants::DEFAULT_STEP_BUDGET;
use crate::error::{PlaceError, Result};
use crate::grid::{Cell, Grid, HexDirection};
use crate::tree::{NodeId, PlacementTree, Slot};

/// Search settings
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Max number of place_one attempts. None searches without limit, which can
    /// blow up combinatorially on deep or wide catalogs.
    pub step_budget: Option<u64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            step_budget: Some(DEFAULT_STEP_BUDGET),
        }
    }
}

/// A solved request
#[derive(Debug, Clone)]
pub struct Layout {
    pub tree: PlacementTree,
    pub grid: Grid,
    /// place_one attempts spent
    pub steps: u64,
}

/// One node of a solved layout, with its offset from the parent that required it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub node: NodeId,
    pub component: ComponentId,
    pub kind: ComponentKind,
    pub cell: Cell,
    pub shared: bool,
    pub parent: Option<NodeId>,
    /// None only for the root
    pub direction: Option<HexDirection>,
}

impl Layout {
    pub fn root(&self) -> &ComponentId {
        &self.tree.node(self.tree.root()).component
    }

    /// Nodes that alias another node's cell
    pub fn shared_count(&self) -> usize {
        self.tree
            .iter()
            .filter(|(_, n)| n.slot().is_some_and(Slot::is_shared))
            .count()
    }

    /// Every placed node in node order. Fails if a node is not a neighbour of its parent.
    pub fn placements(&self) -> Result<Vec<Placement>> {
        let mut out = Vec::with_capacity(self.tree.len());
        for (id, node) in self.tree.iter() {
            let Some(slot) = node.slot() else { continue };
            let cell = slot.cell();

            let direction = match node.parent.and_then(|p| self.tree.position(p)) {
                Some(parent_cell) => {
                    let (dx, dy) = cell.offset_from(parent_cell);
                    let dir = HexDirection::from_offset(dx, dy).ok_or(PlaceError::InvalidOffset {
                        node: id.index(),
                        dx,
                        dy,
                    })?;
                    Some(dir)
                }
                None => None,
            };

            out.push(Placement {
                node: id,
                component: node.component.clone(),
                kind: node.kind.clone(),
                cell,
                shared: slot.is_shared(),
                parent: node.parent,
                direction,
            });
        }
        Ok(out)
    }
}

/// Backtracking placer
#[derive(Debug, Clone, Default)]
pub struct Placer {
    opts: SolveOptions,
}

impl Placer {
    pub fn new(opts: SolveOptions) -> Self {
        Self { opts }
    }

    /// Expand the tree for `root`, anchor it at the origin and search for a full assignment
    pub fn place(&self, catalog: &Catalog, root: &ComponentId) -> Result<Layout> {
        let mut tree = PlacementTree::expand(catalog, root)?;
        let mut grid = Grid::new();
        let root_id = tree.root();
        grid.place(&mut tree, root_id, Cell::ORIGIN);
        debug!("Placing '{}': {} nodes", root, tree.len());

        let candidates = tree.node(root_id).children.clone();
        let mut search = Search {
            grid,
            tree,
            steps: 0,
            budget: self.opts.step_budget,
        };

        match search.place_set(&candidates) {
            Ok(true) => {
                debug!(
                    "Placed '{}' in {} steps: {} cells, {} shared",
                    root,
                    search.steps,
                    search.grid.len(),
                    search.tree.len() - search.grid.len()
                );
                Ok(Layout {
                    tree: search.tree,
                    grid: search.grid,
                    steps: search.steps,
                })
            }
            Ok(false) => Err(PlaceError::Unsatisfiable {
                root: root.clone(),
                steps: search.steps,
            }),
            Err(OutOfBudget(budget)) => Err(PlaceError::BudgetExhausted {
                root: root.clone(),
                budget,
            }),
        }
    }
}

/// Budget hit; unwinds the whole search
struct OutOfBudget(u64);

type Step = std::result::Result<bool, OutOfBudget>;

struct Search {
    grid: Grid,
    tree: PlacementTree,
    steps: u64,
    budget: Option<u64>,
}

impl Search {
    fn place_set(&mut self, candidates: &[NodeId]) -> Step {
        if candidates.is_empty() {
            return Ok(true);
        }

        let (grid, tree) = (&self.grid, &self.tree);
        let ordered: Vec<NodeId> = candidates
            .iter()
            .copied()
            .sorted_by_cached_key(|&id| grid.candidate_order(tree, id))
            .collect();

        for node in ordered {
            let rest: Vec<NodeId> = candidates.iter().copied().filter(|&c| c != node).collect();
            if self.place_one(node, rest)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn place_one(&mut self, node: NodeId, rest: Vec<NodeId>) -> Step {
        self.steps += 1;
        if let Some(budget) = self.budget
            && self.steps > budget
        {
            return Err(OutOfBudget(budget));
        }

        let component = self.tree.node(node).component.clone();
        let next: Vec<NodeId> = rest
            .into_iter()
            .chain(self.tree.node(node).children.iter().copied())
            .collect();

        // 既存の同種インスタンスを共有できるか
        for (kind, cell) in self.grid.surrounding_instances(&self.tree, node) {
            if kind != component {
                continue;
            }
            trace!("share {} at ({}, {})", component, cell.x, cell.y);
            self.tree.set_slot(node, Some(Slot::Shared(cell)));
            if self.place_set(&next)? {
                return Ok(true);
            }
            self.tree.set_slot(node, None);
        }

        let mut free = self.grid.free_neighbours(&self.tree, node);
        free.sort_by_key(|&c| self.grid.expansion_factor(c));
        for cell in free {
            if cell.x > self.grid.base() {
                continue;
            }
            self.grid.place(&mut self.tree, node, cell);
            if self.place_set(&next)? {
                return Ok(true);
            }
            self.grid.unplace(&mut self.tree, node);
        }

        trace!("backtrack {}", component);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentDef;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ComponentDef::resource("ore"),
            ComponentDef::resource("coal"),
            ComponentDef::assembler("plate", "plate", &["ore"]),
            ComponentDef::assembler("gear", "gear", &["plate", "plate"]),
            ComponentDef::assembler("pair", "pair", &["ore", "ore"]),
            ComponentDef::assembler("mixed", "mixed", &["ore", "coal"]),
        ])
        .unwrap()
    }

    fn solve(root: &str) -> Layout {
        Placer::default().place(&catalog(), &root.into()).unwrap()
    }

    #[test]
    fn test_single_dependency_goes_west() {
        let layout = solve("plate");
        assert_eq!(layout.tree.len(), 2);
        assert_eq!(layout.grid.len(), 2);
        assert_eq!(
            layout.grid.occupant(Cell::ORIGIN).unwrap().component,
            ComponentId::new("plate")
        );
        // west keeps the y-bounds unchanged
        assert_eq!(
            layout.grid.occupant(Cell::new(-1, 0)).unwrap().component,
            ComponentId::new("ore")
        );
    }

    #[test]
    fn test_distinct_siblings_get_distinct_cells() {
        let layout = solve("mixed");
        assert_eq!(layout.grid.len(), 3);
        assert_eq!(layout.shared_count(), 0);
    }

    #[test]
    fn test_identical_resources_share() {
        let layout = solve("pair");
        assert_eq!(layout.tree.len(), 3);
        assert_eq!(layout.grid.len(), 2);
        assert_eq!(layout.shared_count(), 1);

        let children = &layout.tree.node(layout.tree.root()).children;
        let a = layout.tree.position(children[0]);
        let b = layout.tree.position(children[1]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_assemblers_still_place_their_children() {
        let layout = solve("gear");
        // gear, plate, ore physically; second plate and its ore are aliases
        assert_eq!(layout.tree.len(), 5);
        assert_eq!(layout.grid.len(), 3);
        assert_eq!(layout.shared_count(), 2);
        assert!(layout.tree.is_complete());
    }

    #[test]
    fn test_placements_report_directions() {
        let layout = solve("plate");
        let placements = layout.placements().unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].direction, None);
        assert_eq!(placements[1].direction, Some(HexDirection::West));
        assert_eq!(placements[1].parent, Some(layout.tree.root()));
    }

    #[test]
    fn test_non_adjacent_child_is_rejected() {
        let mut tree = PlacementTree::expand(&catalog(), &"plate".into()).unwrap();
        let mut grid = Grid::new();
        let root = tree.root();
        grid.place(&mut tree, root, Cell::ORIGIN);
        let ore = tree.node(root).children[0];
        tree.set_slot(ore, Some(Slot::Owned(Cell::new(-2, 0))));
        let layout = Layout {
            tree,
            grid,
            steps: 0,
        };

        let err = layout.placements().unwrap_err();
        assert!(
            matches!(err, PlaceError::InvalidOffset { node: 1, dx: -2, dy: 0 }),
            "{err}"
        );
        let err = crate::blueprint::build_blueprint(&layout).unwrap_err();
        assert!(matches!(err, PlaceError::InvalidOffset { dx: -2, dy: 0, .. }));
    }

    #[test]
    fn test_unknown_root() {
        let err = Placer::default()
            .place(&catalog(), &"steel".into())
            .unwrap_err();
        assert!(matches!(err, PlaceError::UnknownComponent(_)));
    }

    #[test]
    fn test_budget_exhaustion_is_unsatisfiable() {
        let placer = Placer::new(SolveOptions {
            step_budget: Some(0),
        });
        let err = placer.place(&catalog(), &"plate".into()).unwrap_err();
        assert!(matches!(err, PlaceError::BudgetExhausted { budget: 0, .. }));
        assert!(err.is_unsatisfiable());
    }

    #[test]
    fn test_leaf_root_needs_no_steps() {
        let layout = solve("ore");
        assert_eq!(layout.steps, 0);
        assert_eq!(layout.grid.len(), 1);
    }
}
