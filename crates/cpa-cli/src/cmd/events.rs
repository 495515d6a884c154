use crate::output::{print_json, print_table};
use cpa_core::{EventCatalog, Manifest};

pub fn run(json: bool) -> anyhow::Result<()> {
    let catalog = EventCatalog::standard();
    let manifest = Manifest::default_manifest()?;

    if json {
        return print_json(&catalog.names());
    }

    let rows = catalog
        .names()
        .into_iter()
        .map(|name| {
            let rules = manifest.rules_for(name).count();
            vec![name.to_string(), rules.to_string()]
        })
        .collect();
    print_table(&["EVENT", "DEFAULT RULES"], rows);
    Ok(())
}
