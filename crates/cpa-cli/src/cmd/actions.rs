use crate::actions::builtin_registry;
use crate::output::print_json;

pub fn run(json: bool) -> anyhow::Result<()> {
    let registry = builtin_registry()?;
    if json {
        return print_json(&registry.names());
    }
    for name in registry.names() {
        println!("{name}");
    }
    Ok(())
}
