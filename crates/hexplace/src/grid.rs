pub mod occupancy;
pub mod types;

pub use occupancy::{Grid, Occupant};
pub use types::{Bounds, Cell, HexDirection};
