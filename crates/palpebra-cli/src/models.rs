//! `palpebra verify-models` — check cascade files against a manifest.

use anyhow::{Context, Result};
use clap::Args;
use palpebra_models::{default_cascade_dir, CascadeManifest};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct VerifyModelsArgs {
    /// Manifest file listing expected cascades (TOML).
    #[arg(long)]
    pub manifest: PathBuf,

    /// Directory containing the cascade files. Defaults to
    /// $PALPEBRA_CASCADE_DIR or the XDG data directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

pub fn run(args: &VerifyModelsArgs) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(default_cascade_dir);
    let manifest = CascadeManifest::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;

    println!("Cascade directory: {}", dir.display());

    manifest
        .verify_dir(&dir)
        .context("cascade verification failed")?;

    for cascade in &manifest.cascades {
        match cascade.kind.as_deref() {
            Some(kind) => println!("  {} ({kind}): ok", cascade.name),
            None => println!("  {}: ok", cascade.name),
        }
    }
    println!(
        "All {} cascade file(s) verified.",
        manifest.cascades.len()
    );
    Ok(())
}
