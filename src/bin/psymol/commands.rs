use std::fs;

use anyhow::{Context, Result};
use image::RgbImage;
use psymol::{RenderStyle, Renderer, Resolver, ResolverConfig};
use tracing::info;

use crate::cli::{Command, ImageOptions, MolfileArgs, ResolveArgs, SmilesArgs};

pub async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::Smiles(args) => run_smiles(args),
        Command::Molfile(args) => run_molfile(args),
    }
}

async fn run_resolve(args: ResolveArgs) -> Result<()> {
    let mut config = ResolverConfig::default();
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    let resolver = Resolver::new(config).context("failed to set up resolver")?;
    let molfile = resolver
        .try_resolve(&args.identifier)
        .await
        .with_context(|| format!("no structure found for '{}'", args.identifier))?;
    if let Some(path) = &args.molfile {
        fs::write(path, &molfile).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "molfile written");
    }
    let image = renderer()
        .try_render_molfile(&molfile, args.image.background)
        .context("resolved molfile produced no image")?;
    save(&image, &args.image)
}

fn run_smiles(args: SmilesArgs) -> Result<()> {
    let image = renderer()
        .try_render_smiles(&args.smiles, args.image.background)
        .with_context(|| format!("cannot draw '{}'", args.smiles))?;
    save(&image, &args.image)
}

fn run_molfile(args: MolfileArgs) -> Result<()> {
    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let image = renderer()
        .try_render_molfile(&text, args.image.background)
        .with_context(|| format!("cannot draw {}", args.path.display()))?;
    save(&image, &args.image)
}

fn renderer() -> Renderer {
    Renderer::new(RenderStyle::default())
}

fn save(image: &RgbImage, options: &ImageOptions) -> Result<()> {
    image
        .save(&options.output)
        .with_context(|| format!("failed to write {}", options.output.display()))?;
    info!(
        path = %options.output.display(),
        width = image.width(),
        height = image.height(),
        "image written"
    );
    Ok(())
}
