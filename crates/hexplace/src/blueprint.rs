use std::io::{Read, Write};

use base64::{Engine, engine::general_purpose::STANDARD};
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ASSEMBLER_ENTITY, BLUEPRINT_GAME_VERSION, BLUEPRINT_ITEM, BLUEPRINT_VERSION_PREFIX, CELL_TILES,
    CONNECTOR_ENTITY,
};
use crate::error::{PlaceError, Result};
use crate::grid::{Cell, HexDirection};
use crate::placer::Layout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_number: usize,
    pub name: String,
    pub position: EntityPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub entities: Vec<Entity>,
    pub item: String,
    pub version: u64,
}

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDocument {
    pub blueprint: Blueprint,
}

/// Connector tile and facing for a node, given where its parent sits.
/// The root feeds out of the grid and uses the default facing.
fn connector_anchor(cell: Cell, dir: Option<HexDirection>) -> ((i32, i32), u8) {
    use HexDirection::*;
    let (x, y) = (cell.x * CELL_TILES, cell.y * CELL_TILES);
    match dir {
        None => ((x + 2, y), 6),
        Some(East) => ((x - 2, y + 1), 2),
        Some(South) => ((x, y - 2), 4),
        Some(West) => ((x + 2, y - 1), 6),
        Some(NorthWest) => ((x + 2, y + 1), 6),
        Some(North) => ((x, y + 2), 0),
        Some(NorthEast) => ((x - 2, y - 1), 2),
    }
}

// 列ごとに半セル分ずらす
fn column_shift(cell: Cell) -> i32 {
    -cell.x * 2
}

/// One assembler per owned non-resource cell, one connector per non-resource node
pub fn build_blueprint(layout: &Layout) -> Result<Blueprint> {
    let mut entities = Vec::new();
    let mut next_number = 1;

    for p in layout.placements()? {
        let Some(recipe) = p.kind.recipe() else {
            continue;
        };
        let shift = column_shift(p.cell) as f64;

        if !p.shared {
            entities.push(Entity {
                entity_number: next_number,
                name: ASSEMBLER_ENTITY.to_string(),
                position: EntityPosition {
                    x: (p.cell.x * CELL_TILES) as f64 + 0.5,
                    y: (p.cell.y * CELL_TILES) as f64 + 0.5 + shift,
                },
                recipe: Some(recipe.to_string()),
                direction: None,
            });
            next_number += 1;
        }

        let ((cx, cy), facing) = connector_anchor(p.cell, p.direction);
        entities.push(Entity {
            entity_number: next_number,
            name: CONNECTOR_ENTITY.to_string(),
            position: EntityPosition {
                x: cx as f64 + 0.5,
                y: cy as f64 + 0.5 + shift,
            },
            recipe: None,
            direction: Some(facing),
        });
        next_number += 1;
    }

    debug!("Blueprint for '{}': {} entities", layout.root(), entities.len());
    Ok(Blueprint {
        entities,
        item: BLUEPRINT_ITEM.to_string(),
        version: BLUEPRINT_GAME_VERSION,
    })
}

/// JSON -> zlib -> base64, prefixed with the format version
pub fn encode_blueprint(blueprint: &Blueprint) -> Result<String> {
    let doc = BlueprintDocument {
        blueprint: blueprint.clone(),
    };
    pack(&serde_json::to_vec(&doc)?)
}

fn pack(json: &[u8]) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json)?;
    let compressed = encoder.finish()?;

    let mut out = String::with_capacity(compressed.len() * 4 / 3 + 2);
    out.push(BLUEPRINT_VERSION_PREFIX);
    out.push_str(&STANDARD.encode(compressed));
    Ok(out)
}

pub fn blueprint_string(layout: &Layout) -> Result<String> {
    encode_blueprint(&build_blueprint(layout)?)
}

/// Reverse of [`encode_blueprint`]. Returns the raw JSON so that fields this
/// crate never writes (icons, labels, tiles) survive.
pub fn decode_blueprint(encoded: &str) -> Result<serde_json::Value> {
    let body = encoded
        .trim()
        .strip_prefix(BLUEPRINT_VERSION_PREFIX)
        .ok_or_else(|| {
            PlaceError::Decode(format!(
                "expected version prefix '{}'",
                BLUEPRINT_VERSION_PREFIX
            ))
        })?;
    let compressed = STANDARD.decode(body)?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}
