use itertools::{Itertools, MinMaxResult};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Integer cell coordinate on the hexagonal-offset grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: HexDirection) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The six neighbour cells, in HexDirection order
    pub fn neighbours(self) -> impl Iterator<Item = Cell> {
        HexDirection::iter().map(move |d| self.step(d))
    }

    /// (dx, dy) from `origin` to `self`
    pub fn offset_from(self, origin: Cell) -> (i32, i32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// The six neighbour offsets. The order is fixed and drives search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum HexDirection {
    West,      // (-1,  0)
    NorthWest, // (-1, -1)
    North,     // ( 0, -1)
    NorthEast, // ( 1, -1)
    East,      // ( 1,  0)
    South,     // ( 0,  1)
}

impl HexDirection {
    pub fn offset(self) -> (i32, i32) {
        use HexDirection::*;
        match self {
            West => (-1, 0),
            NorthWest => (-1, -1),
            North => (0, -1),
            NorthEast => (1, -1),
            East => (1, 0),
            South => (0, 1),
        }
    }

    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        HexDirection::iter().find(|d| d.offset() == (dx, dy))
    }
}

/// Running bounds over placed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    /// None while only resources are placed
    pub non_resource_min_x: Option<i32>,
}

impl Bounds {
    /// Recompute from scratch; None for an empty set.
    pub fn from_cells<I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Cell, bool)> + Clone,
    {
        let (min_x, max_x) = min_max(cells.clone().into_iter().map(|(c, _)| c.x))?;
        let (min_y, max_y) = min_max(cells.clone().into_iter().map(|(c, _)| c.y))?;
        let non_resource_min_x = cells
            .into_iter()
            .filter(|(_, resource)| !resource)
            .map(|(c, _)| c.x)
            .min();

        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            non_resource_min_x,
        })
    }

    pub fn contains_y(&self, y: i32) -> bool {
        (self.min_y..=self.max_y).contains(&y)
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

fn min_max(values: impl Iterator<Item = i32>) -> Option<(i32, i32)> {
    match values.minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbour_order() {
        let n: Vec<Cell> = Cell::new(2, 3).neighbours().collect();
        assert_eq!(
            n,
            vec![
                Cell::new(1, 3),
                Cell::new(1, 2),
                Cell::new(2, 2),
                Cell::new(3, 2),
                Cell::new(3, 3),
                Cell::new(2, 4),
            ]
        );
    }

    #[test]
    fn test_from_offset() {
        for dir in HexDirection::iter() {
            let (dx, dy) = dir.offset();
            assert_eq!(HexDirection::from_offset(dx, dy), Some(dir));
        }
        assert_eq!(HexDirection::from_offset(1, 1), None);
        assert_eq!(HexDirection::from_offset(0, 0), None);
    }

    #[test]
    fn test_bounds_from_cells() {
        let cells = vec![
            (Cell::new(0, 0), false),
            (Cell::new(-2, 1), true),
            (Cell::new(-1, -3), false),
        ];
        let b = Bounds::from_cells(cells).unwrap();
        assert_eq!((b.min_x, b.max_x), (-2, 0));
        assert_eq!((b.min_y, b.max_y), (-3, 1));
        assert_eq!(b.non_resource_min_x, Some(-1));
        assert_eq!(b.height(), 5);
        assert_eq!(b.width(), 3);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_cells(Vec::<(Cell, bool)>::new()).is_none());
    }

    #[test]
    fn test_bounds_only_resources() {
        let b = Bounds::from_cells(vec![(Cell::new(-1, 0), true)]).unwrap();
        assert_eq!(b.non_resource_min_x, None);
        assert!(b.contains_y(0));
        assert!(!b.contains_y(1));
    }
}
