use crate::output::print_json;
use clap::Subcommand;
use cpa_core::config::WarnLevel;
use cpa_core::Config;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, config: &Config, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, config, json),
        ConfigSubcommand::Validate => validate(root, config, json),
    }
}

fn show(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }
    let manifest = config
        .manifest_path(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(built-in)".to_string());
    println!("Root:          {}", root.display());
    println!("Manifest:      {manifest}");
    println!("Log level:     {}", config.log_level);
    println!("Trace actions: {}", config.trace_actions);
    Ok(())
}

fn validate(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate(root);

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
