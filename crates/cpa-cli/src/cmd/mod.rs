pub mod actions;
pub mod config;
pub mod events;
pub mod fire;
pub mod show;
pub mod validate;

use crate::actions::{builtin_registry, Ctx};
use anyhow::Context;
use cpa_core::{Config, Engine, EventCatalog, EventKind, Manifest};
use std::path::{Path, PathBuf};

/// Point `config` at a manifest given on the command line.
///
/// Relative paths are taken from the working directory, not the project root.
pub fn override_manifest(config: &Config, manifest: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = config.clone();
    if let Some(path) = manifest {
        let path: PathBuf = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .context("failed to read working directory")?
                .join(path)
        };
        config.manifest = Some(path);
    }
    Ok(config)
}

pub fn load_manifest(root: &Path, config: &Config) -> anyhow::Result<Manifest> {
    match config.manifest_path(root) {
        Some(path) => Manifest::load(&path)
            .with_context(|| format!("parse manifest err: {}", path.display())),
        None => Manifest::default_manifest().context("parse manifest err: built-in manifest"),
    }
}

pub fn build_engine(root: &Path, config: &Config) -> anyhow::Result<Engine<Ctx, EventKind>> {
    let registry = builtin_registry().context("failed to register built-in actions")?;
    let engine = Engine::from_config(root, config, EventCatalog::standard(), registry)?;
    Ok(engine)
}
