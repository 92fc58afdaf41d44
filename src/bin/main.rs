//! Block Icon Renderer CLI
//!
//! Render Minecraft block states into icons and icon atlases.

use block_icon_renderer::types::with_namespace;
use block_icon_renderer::{
    load_resource_pack, render_block, AtlasBuilder, InputBlock, RenderError, ResourcePack,
    SheetLayout, StateFilter, Tint, TintSource,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "block-icon-renderer")]
#[command(author, version, about = "Render Minecraft block states into icons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single block state to a PNG icon
    Block {
        /// Block name (e.g., "minecraft:stone" or "stone")
        #[arg(short, long)]
        block: String,

        /// Block properties as key=value pairs (e.g., "facing=north")
        #[arg(short, long, value_parser = parse_property)]
        property: Vec<(String, String)>,

        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Tint for tinted faces: RRGGBB, RRGGBBAA, "foliage", "redstone:<power>",
        /// or "redstone" to follow the block's power property
        #[arg(short, long, value_parser = parse_tint)]
        tint: Option<TintSource>,
    },

    /// Render every state of several blocks into one atlas.
    ///
    /// Several blocks get one row each. A single block with two or more keys
    /// gets the first key's values as columns and the other keys as rows.
    Atlas {
        /// Block names; each gets its own row
        #[arg(short, long, required = true)]
        block: Vec<String>,

        /// Properties to vary, in order (last varies fastest)
        #[arg(short, long)]
        key: Vec<String>,

        /// Values to use for a key instead of those in the blockstate (e.g., "north=none,low,tall")
        #[arg(long, value_parser = parse_values)]
        values: Vec<(String, Vec<String>)>,

        /// Leave out states where a key has one of the values (e.g., "shape=inner_right|outer_right")
        #[arg(long, value_parser = parse_filter)]
        exclude: Vec<StateFilter>,

        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Tint for tinted faces: RRGGBB, RRGGBBAA, "foliage", "redstone:<power>",
        /// or "redstone" to follow each state's power property
        #[arg(short, long, value_parser = parse_tint)]
        tint: Option<TintSource>,

        /// Leave a cell empty when no variant matches its state
        #[arg(long)]
        skip_unmatched: bool,
    },

    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,
    },
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("Invalid property format: '{}'. Use key=value", s)),
    }
}

fn parse_values(s: &str) -> Result<(String, Vec<String>), String> {
    match s.split_once('=') {
        Some((key, values)) if !values.is_empty() => Ok((
            key.to_string(),
            values.split(',').map(String::from).collect(),
        )),
        _ => Err(format!("Invalid values format: '{}'. Use key=a,b,c", s)),
    }
}

fn parse_filter(s: &str) -> Result<StateFilter, String> {
    StateFilter::parse(s).map_err(|e| e.to_string())
}

fn parse_tint(s: &str) -> Result<TintSource, String> {
    match s {
        "foliage" => return Ok(Tint::FOLIAGE.into()),
        "redstone" => return Ok(TintSource::RedstonePower),
        _ => {}
    }
    if let Some(power) = s.strip_prefix("redstone:") {
        return power
            .parse::<u8>()
            .map(|p| TintSource::Fixed(Tint::redstone(p)))
            .map_err(|e| format!("Invalid redstone power '{}': {}", power, e));
    }
    Tint::from_hex(s)
        .map(TintSource::from)
        .ok_or_else(|| format!("Invalid tint '{}'. Use RRGGBB or RRGGBBAA", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().without_time().compact().init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Block {
            block,
            property,
            resource_pack,
            output,
            tint,
        } => {
            render_single_block(&block, property, &resource_pack, &output, tint)?;
        }
        Commands::Atlas {
            block,
            key,
            values,
            exclude,
            resource_pack,
            output,
            tint,
            skip_unmatched,
        } => {
            let mut layout = SheetLayout::new(key);
            for (key, overridden) in values {
                layout = layout.with_values(key, overridden);
            }
            for filter in exclude {
                layout = layout.with_filter(filter);
            }
            render_atlas(&block, &layout, &resource_pack, &output, tint, skip_unmatched)?;
        }
        Commands::Info { resource_pack } => {
            show_pack_info(&resource_pack)?;
        }
    }

    Ok(())
}

fn load_pack(path: &Path) -> Result<ResourcePack, RenderError> {
    info!("Loading resource pack from {:?}", path);
    let pack = load_resource_pack(path)?;
    info!("Found {} blockstates", pack.summary().blockstates);
    Ok(pack)
}

fn render_single_block(
    block_name: &str,
    properties: Vec<(String, String)>,
    resource_pack_path: &Path,
    output_path: &Path,
    tint: Option<TintSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load_pack(resource_pack_path)?;

    let mut block = InputBlock::new(with_namespace(block_name));
    block.properties.extend(properties);

    info!("Rendering block: {} {:?}", block.name, block.properties);
    let tint = tint.map(|t| t.tint_for(&block.properties)).transpose()?;
    let canvas = render_block(&pack, &block, tint)?;
    canvas.save(output_path)?;

    info!(
        "Wrote {:?} ({} covered pixels)",
        output_path,
        canvas.covered_pixels()
    );
    Ok(())
}

fn render_atlas(
    blocks: &[String],
    layout: &SheetLayout,
    resource_pack_path: &Path,
    output_path: &Path,
    tint: Option<TintSource>,
    skip_unmatched: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load_pack(resource_pack_path)?;

    let mut definitions = Vec::with_capacity(blocks.len());
    for name in blocks {
        let name = with_namespace(name);
        let definition = pack
            .blockstate(&name)
            .ok_or_else(|| RenderError::ResourceNotFound(format!("blockstate {}", name)))?;
        definitions.push((name, definition));
    }

    let plan = layout.plan(&definitions)?;
    debug!("Planned {} cells in {} columns", plan.cells.len(), plan.columns);
    let mut atlas = AtlasBuilder::new(plan.columns);

    for cell in plan.cells {
        let Some(cell) = cell else {
            atlas.skip();
            continue;
        };
        let block = InputBlock {
            name: cell.block,
            properties: cell.state,
        };
        let tint = tint.map(|t| t.tint_for(&block.properties)).transpose()?;

        match render_block(&pack, &block, tint) {
            Ok(canvas) => atlas.push(canvas),
            Err(RenderError::InvalidStateSpec(reason)) if skip_unmatched => {
                warn!("Skipping {} {:?}: {}", block.name, block.properties, reason);
                atlas.skip();
            }
            Err(e) => return Err(e.into()),
        }
    }

    atlas.save(output_path)?;
    info!(
        "Wrote {}x{} atlas to {:?}",
        atlas.columns(),
        atlas.rows(),
        output_path
    );
    Ok(())
}

fn show_pack_info(resource_pack_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load_pack(resource_pack_path)?;
    let summary = pack.summary();

    println!("\nResource Pack Info:");
    println!("  Namespaces: {}", summary.namespaces.join(", "));
    println!("  Blockstates: {}", summary.blockstates);
    println!("  Models: {}", summary.models);
    println!("  Textures: {}", summary.textures);

    Ok(())
}
