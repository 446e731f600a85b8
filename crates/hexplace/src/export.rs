use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use csv::WriterBuilder;

use crate::constants::PLACEMENT_CSV_HEADER;
use crate::error::{PlaceError, Result};
use crate::placer::Layout;

/// One row per node, in node order
pub fn export_placements_csv<W: Write>(layout: &Layout, writer: W) -> Result<()> {
    #[allow(unused_mut)]
    let mut builder = WriterBuilder::new();
    #[cfg(windows)]
    {
        use csv::Terminator;
        builder = builder.terminator(Terminator::CRLF);
    }
    let mut wtr = builder.from_writer(writer);

    wtr.write_record(PLACEMENT_CSV_HEADER)?;
    for p in layout.placements()? {
        let parent = p.parent.map(|id| id.index().to_string()).unwrap_or_default();
        wtr.write_record([
            p.node.index().to_string().as_str(),
            p.component.as_str(),
            p.cell.x.to_string().as_str(),
            p.cell.y.to_string().as_str(),
            if p.shared { "true" } else { "false" },
            parent.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `layout_<root>_<timestamp>.csv` into `output_dir` (created if missing)
pub fn export_to_csv_with_path(layout: &Layout, output_dir: Option<&Path>) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let filename = format!("layout_{}_{timestamp}.csv", layout.root());

    let file_path = if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            PlaceError::Config(format!(
                "Failed to create output directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        dir.join(&filename)
    } else {
        filename.into()
    };

    let file = File::create(&file_path)?;
    export_placements_csv(layout, BufWriter::new(file))?;
    Ok(file_path)
}
