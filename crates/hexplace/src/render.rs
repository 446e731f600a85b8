use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::grid::Cell;
use crate::placer::Layout;
use crate::tree::Slot;

const RESOURCE_FILL: &str = "#7d7d7d";
const ASSEMBLER_STROKE: &str = "#222";
const ROOT_STROKE: &str = "#d33";

/// SVG描画オプション
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Side length of one cell
    pub scale_px: f32,
    pub margin_px: f32,
    pub show_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale_px: 100.0,
            margin_px: 24.0,
            show_labels: true,
        }
    }
}

/// HTMLエンコード（SVGテキスト用）
pub fn html_encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

struct Square<'a> {
    cell: Cell,
    x: f32,
    y: f32,
    label: &'a str,
    resource: bool,
}

/// Draw each occupied cell as a square. Columns are skewed by half a cell per step
/// to the right, mirroring the offset rows of the hex grid.
pub fn render_svg<W: Write>(layout: &Layout, opt: &RenderOptions, w: &mut W) -> Result<()> {
    let s = opt.scale_px;
    let m = opt.margin_px;

    // 共有ノードの数（セルごと）
    let mut aliases: HashMap<Cell, usize> = HashMap::new();
    for (_, node) in layout.tree.iter() {
        if let Some(Slot::Shared(cell)) = node.slot() {
            *aliases.entry(cell).or_default() += 1;
        }
    }

    let (min_x, min_y) = layout
        .grid
        .bounds()
        .map_or((0, 0), |b| (b.min_x, b.min_y));

    let mut squares: Vec<Square<'_>> = layout
        .grid
        .occupied()
        .map(|(cell, occ)| {
            let col = (cell.x - min_x) as f32;
            let row = (cell.y - min_y) as f32;
            Square {
                cell,
                x: col * s,
                y: row * s - col * s * 0.5,
                label: occ.component.as_str(),
                resource: occ.resource,
            }
        })
        .collect();

    // 左上をマージン位置に揃える
    let top = squares.iter().map(|q| q.y).fold(f32::INFINITY, f32::min);
    let top = if top.is_finite() { top } else { 0.0 };
    for q in &mut squares {
        q.x += m;
        q.y += m - top;
    }

    let width = squares.iter().map(|q| q.x + s).fold(0.0, f32::max) + m;
    let height = squares.iter().map(|q| q.y + s).fold(0.0, f32::max) + m;
    let (w_px, h_px) = (width.ceil() as u32, height.ceil() as u32);

    writeln!(
        w,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"##,
        w_px, h_px, w_px, h_px
    )?;
    writeln!(
        w,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"##,
        w_px, h_px
    )?;

    for q in &squares {
        let (fill, stroke) = if q.resource {
            (RESOURCE_FILL, ASSEMBLER_STROKE)
        } else if q.cell == Cell::ORIGIN {
            ("none", ROOT_STROKE)
        } else {
            ("none", ASSEMBLER_STROKE)
        };
        writeln!(
            w,
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="1.5"/>"##,
            q.x,
            q.y,
            s - 1.0,
            s - 1.0,
            fill,
            stroke
        )?;

        if opt.show_labels {
            let label = match aliases.get(&q.cell) {
                Some(n) => format!("{} x{}", q.label, n + 1),
                None => q.label.to_string(),
            };
            writeln!(
                w,
                r##"<text x="{:.2}" y="{:.2}" font-family="monospace" font-size="{:.1}" fill="#000">{}</text>"##,
                q.x + 4.0,
                q.y + s * 0.2,
                (s * 0.12).max(8.0),
                html_encode(&label)
            )?;
        }
    }

    writeln!(w, "</svg>")?;
    Ok(())
}

pub fn save_svg<P: AsRef<Path>>(layout: &Layout, opt: &RenderOptions, output_path: P) -> Result<()> {
    let file = File::create(output_path.as_ref())?;
    let mut f = BufWriter::new(file);
    render_svg(layout, opt, &mut f)?;
    f.flush()?;
    info!("Wrote layout SVG: {}", output_path.as_ref().display());
    Ok(())
}
