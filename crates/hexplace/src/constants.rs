/// Column the root is anchored at; no node may sit to the right of it
pub const DEFAULT_BASE: i32 = 0;

/// candidate_order value for a node whose parent has no free neighbour left
pub const NO_FREE_NEIGHBOURS: i32 = 10_000;

/// Default cap on place_one invocations per request
pub const DEFAULT_STEP_BUDGET: u64 = 1_000_000;

/// Built-in root used when neither config nor CLI names one
pub const DEFAULT_ROOT: &str = "fast-inserter";

/// Blueprint encoding
pub const BLUEPRINT_VERSION_PREFIX: char = '0';
pub const BLUEPRINT_ITEM: &str = "blueprint";
pub const BLUEPRINT_GAME_VERSION: u64 = 281_479_276_199_938;
pub const ASSEMBLER_ENTITY: &str = "assembling-machine-1";
pub const CONNECTOR_ENTITY: &str = "inserter";

/// One grid cell spans this many tiles in blueprint space
pub const CELL_TILES: i32 = 4;

/// Expected header of the placement listing
pub const PLACEMENT_CSV_HEADER: [&str; 6] = ["Node", "Component", "X", "Y", "Shared", "Parent"];
