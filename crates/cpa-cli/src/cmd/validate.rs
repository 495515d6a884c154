use crate::actions::builtin_registry;
use crate::output::print_json;
use anyhow::Context;
use cpa_core::{Config, EventCatalog};
use std::path::Path;

pub fn run(root: &Path, config: &Config, manifest: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::override_manifest(config, manifest)?;
    let manifest = super::load_manifest(root, &config)?;
    let registry = builtin_registry().context("failed to register built-in actions")?;
    let warnings = manifest.lint(&EventCatalog::standard(), &registry);

    if json {
        let value = serde_json::json!({
            "events": manifest.events.len(),
            "nodes": manifest.node_count(),
            "warnings": warnings,
        });
        print_json(&value)?;
        return Ok(());
    }

    println!(
        "Manifest OK: {} event rule(s), {} action node(s).",
        manifest.events.len(),
        manifest.node_count()
    );
    for w in &warnings {
        println!("[warning] {w}");
    }
    Ok(())
}
