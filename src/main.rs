//! hgtex - TEX texture container converter
//!
//! Exports every texture in a TEX container to an indexed BMP plus its
//! decoded CLUT, and rebuilds a container from edited BMPs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hgtex::container::header_address;
use hgtex::IndexedRaster;

#[derive(Parser)]
#[command(name = "hgtex")]
#[command(about = "TEX texture container converter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every texture in a container to BMP
    Export {
        /// Input TEX container
        input: PathBuf,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a PNG of each texture with alpha
        #[arg(long)]
        rgba: bool,
    },

    /// Build a container from BMP files
    Import {
        /// Input BMP files or glob patterns, ordered by the number in each name
        #[arg(required = true)]
        images: Vec<String>,

        /// Container supplying each slot's format flag and header bytes
        #[arg(short, long)]
        reference: PathBuf,

        /// Output TEX container
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the header of every texture in a container
    Info {
        /// Input TEX container
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            rgba,
        } => {
            let raw = std::fs::read(&input).with_context(|| format!("Reading {:?}", input))?;
            let exports =
                hgtex::export_textures(&raw).with_context(|| format!("Parsing {:?}", input))?;
            tracing::info!("Found {} texture(s) in {:?}", exports.len(), input);
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "texture".to_string());
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            hgtex::write_exports(&exports, &output, &stem, rgba)?;
            tracing::info!("Done!");
        }

        Commands::Import {
            images,
            reference,
            output,
        } => {
            let paths = expand_patterns(&images)?;
            let mut rasters: Vec<(String, IndexedRaster)> = Vec::new();
            for path in paths {
                let raster = IndexedRaster::read_bmp(&path)
                    .with_context(|| format!("Reading {:?}", path))?;
                rasters.push((file_name(&path), raster));
            }
            let rasters = hgtex::order_rasters(rasters);
            for (index, (name, raster)) in rasters.iter().enumerate() {
                tracing::info!(
                    "Slot {}: {} ({}x{})",
                    index + 1,
                    name,
                    raster.width,
                    raster.height
                );
            }
            let rasters: Vec<IndexedRaster> = rasters.into_iter().map(|(_, r)| r).collect();

            let reference_raw = std::fs::read(&reference)
                .with_context(|| format!("Reading {:?}", reference))?;
            let records = hgtex::import_textures(&rasters, &reference_raw)?;
            let container = hgtex::write_container(&records)?;
            std::fs::write(&output, container)
                .with_context(|| format!("Writing {:?}", output))?;
            tracing::info!("Wrote {} texture(s) to {:?}", records.len(), output);
        }

        Commands::Info { input } => {
            let raw = std::fs::read(&input).with_context(|| format!("Reading {:?}", input))?;
            print_info(&raw).with_context(|| format!("Parsing {:?}", input))?;
        }
    }

    Ok(())
}

fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern).with_context(|| format!("Bad pattern {:?}", pattern))? {
            paths.push(entry?);
        }
        if paths.len() == before {
            anyhow::bail!("No files match {:?}", pattern);
        }
    }
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn print_info(raw: &[u8]) -> Result<()> {
    let descriptors = hgtex::read_descriptors(raw)?;
    println!("{} texture(s)", descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        println!(
            "#{} @0x{:x}: flag 0x{:x} ({}), {}x{}, unknown {:02x?}",
            index + 1,
            header_address(index),
            descriptor.format.flag(),
            descriptor.format,
            descriptor.width,
            descriptor.height,
            descriptor.unknown
        );
        println!(
            "    relative offset 0x{:x}, data 0x{:x} ({} bytes), CLUT 0x{:x}, {} colors",
            descriptor.relative_data_offset,
            descriptor.data_offset,
            descriptor.pixel_data_size,
            descriptor.clut_offset(),
            descriptor.format.logical_palette_size()
        );
    }
    Ok(())
}
