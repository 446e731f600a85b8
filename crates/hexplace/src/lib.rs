pub mod blueprint;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod grid;
pub mod placer;
pub mod render;
pub mod tree;

pub use blueprint::{Blueprint, blueprint_string, decode_blueprint};
pub use catalog::{Catalog, ComponentDef, ComponentId, ComponentKind};
pub use config::Config;
pub use error::{PlaceError, Result};
pub use grid::{Cell, Grid, HexDirection};
pub use placer::{Layout, Placement, Placer, SolveOptions};
pub use render::{RenderOptions, save_svg};
pub use tree::{NodeId, PlacementTree, Slot};
