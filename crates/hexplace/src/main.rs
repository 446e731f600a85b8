use anyhow::{Context, Result};
use clap::Parser;
use hexplace::{
    ComponentId, Config, Placer, blueprint::blueprint_string, export::export_to_csv_with_path,
    render::save_svg,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Pack a component dependency tree onto a hex grid", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Component to place (overrides solver.root)
    #[arg(short = 'r', long = "root")]
    root: Option<String>,

    /// Catalog TOML (overrides solver.catalog)
    #[arg(long = "catalog")]
    catalog: Option<PathBuf>,

    /// Step budget, 0 = unlimited (overrides solver.step_budget)
    #[arg(short = 'b', long = "budget")]
    budget: Option<u64>,

    /// Write an SVG of the layout to this path
    #[arg(long = "svg")]
    svg: Option<PathBuf>,

    /// Write the placement listing as CSV into solver.output_dir
    #[arg(long = "csv")]
    csv: bool,
}

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let mut config = if args.config.exists() {
        Config::load_from_file(&args.config)?
    } else {
        warn!(
            "Config file not found: {}, using default settings",
            args.config.display()
        );
        Config::default()
    };

    if let Some(root) = args.root {
        config.solver.root = root;
    }
    if let Some(catalog) = args.catalog {
        config.solver.catalog = Some(catalog);
    }
    if let Some(budget) = args.budget {
        config.solver.step_budget = budget;
    }
    config.validate()?;

    let catalog = config.load_catalog().context("failed to load component catalog")?;
    let root: ComponentId = config.root();
    info!("Catalog: {} component types", catalog.len());
    info!(
        "Root: {} ({} instances)",
        root,
        catalog.instance_count(&root)?
    );

    let layout = Placer::new(config.to_solve_options())
        .place(&catalog, &root)
        .with_context(|| format!("placement of '{root}' failed"))?;

    info!("=== Placement Result ===");
    info!("Search steps: {}", layout.steps);
    info!("Nodes: {}", layout.tree.len());
    info!("Cells used: {}", layout.grid.len());
    info!("Shared instances: {}", layout.shared_count());
    info!(
        "Footprint: {} x {} cells",
        layout.grid.width(),
        layout.grid.height()
    );

    let encoded = blueprint_string(&layout)?;
    println!("{encoded}");

    if let Some(path) = args.svg {
        save_svg(&layout, &config.to_render_options(), &path)?;
    }

    if args.csv {
        let dir = PathBuf::from(&config.solver.output_dir);
        let path = export_to_csv_with_path(&layout, Some(&dir))?;
        info!("Placement listing saved to: {}", path.display());
    }

    Ok(())
}
