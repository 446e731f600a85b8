use clap::Parser;
use hexplace::{Catalog, ComponentKind};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Validate a component catalog and list its types", long_about = None)]
struct Args {
    /// Catalog TOML; the built-in catalog when omitted
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let catalog = match &args.file {
        Some(path) => {
            info!("Loading catalog: {}", path.display());
            Catalog::load_from_file(path)?
        }
        None => Catalog::builtin(),
    };

    println!("{:<24} {:<10} {:<22} {:>9}", "component", "kind", "recipe", "instances");
    for def in catalog.iter() {
        let (kind, recipe) = match &def.kind {
            ComponentKind::Resource => ("resource", "-"),
            ComponentKind::Assembler { recipe } => ("assembler", recipe.as_str()),
        };
        println!(
            "{:<24} {:<10} {:<22} {:>9}",
            def.id.as_str(),
            kind,
            recipe,
            catalog.instance_count(&def.id)?
        );
    }

    info!("{} component types OK", catalog.len());
    Ok(())
}
