use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aspect_oxide::core::model_part::ModelPart;
use aspect_oxide::prelude::*;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

#[derive(Parser)]
#[command(name = "aspect-cli")]
#[command(about = "Imports avatar bundles into aspect containers and inspects them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a bundle folder and write it as a container
    Import {
        /// Bundle folder holding the manifest
        bundle: PathBuf,

        /// Output container path
        #[arg(short, long)]
        output: PathBuf,

        /// Write every field, including the ones equal to their default
        #[arg(long)]
        verbose_container: bool,

        /// Keep folder entries in file system order instead of sorting them
        #[arg(long)]
        unsorted: bool,
    },
    /// Decode a container and print a summary of its content
    Inspect {
        input: PathBuf,
    },
    /// Print the JSON schema of the bundle manifest
    Schema,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Import { bundle, output, verbose_container, unsorted } => {
            import_bundle(&bundle, &output, verbose_container, unsorted)
        }
        Command::Inspect { input } => inspect(&input),
        Command::Schema => {
            println!("{}", aspect_oxide::io::manifest::schema()?);
            Ok(())
        }
    }
}

fn import_bundle(bundle: &Path, output: &Path, verbose_container: bool, unsorted: bool) -> Result<()> {
    let mut cfg = bundle::Config::default();
    cfg.sort_entries = !unsorted;
    let aspect = import(bundle, cfg)
        .map_err(|e| anyhow::anyhow!("Failed to import bundle ({:?}): {}", e.kind(), e))?;

    let mut buffer = Vec::new();
    encode(&aspect, &mut buffer, encode::Config { omit_defaults: !verbose_container })
        .context("Failed to encode aspect")?;

    std::fs::write(output, &buffer)
        .with_context(|| format!("Failed to write output file '{}'", output.display()))?;
    log::info!("Wrote {} bytes to '{}'", buffer.len(), output.display());
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let aspect = decode(&mut data.as_slice(), decode::Config::default())
        .context("Failed to decode container")?;

    let meta = aspect.get_metadata();
    println!("name:     {}", meta.name);
    println!("author:   {}", meta.author);
    println!("version:  {}", meta.version);
    println!("textures: {}", aspect.get_textures().len());
    for (idx, texture) in aspect.get_textures().iter().enumerate() {
        println!("  [{}] {} ({} bytes)", idx, texture.get_name(), texture.get_bytes().len());
    }
    println!("scripts:  {}", aspect.get_scripts().len());
    for script in aspect.get_scripts() {
        println!("  {}", script.get_name());
    }
    print_tree(aspect.get_entity(), 0);
    for root in aspect.get_world() {
        print_tree(root, 0);
    }
    print_tree(aspect.get_hud(), 0);
    Ok(())
}

fn print_tree(part: &ModelPart, depth: usize) {
    let hidden = if part.visible { "" } else { " (hidden)" };
    println!("{:indent$}{} [{}]{}", "", part.name, part.kind().name(), hidden, indent = depth * 2);
    for child in &part.children {
        print_tree(child, depth + 1);
    }
}
