use crate::output::print_json;
use cpa_core::{ActionNode, Config};
use std::path::Path;

pub fn run(root: &Path, config: &Config, manifest: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::override_manifest(config, manifest)?;
    let manifest = super::load_manifest(root, &config)?;

    if json {
        return print_json(&manifest);
    }

    for rule in &manifest.events {
        println!("{}", rule.name);
        print!("{}", render(&rule.actions, 1));
    }
    Ok(())
}

/// Render a node sequence as an indented tree, branch lists labelled.
pub fn render(nodes: &[ActionNode], depth: usize) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&format!("{}{}\n", "  ".repeat(depth), node.label()));
        for (branch, children) in node.branches() {
            if children.is_empty() {
                continue;
            }
            out.push_str(&format!("{}{branch}:\n", "  ".repeat(depth + 1)));
            out.push_str(&render(children, depth + 2));
        }
    }
    out
}
