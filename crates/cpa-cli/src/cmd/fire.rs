use crate::output::print_json;
use anyhow::Context;
use cpa_core::event::parse_param;
use cpa_core::{Config, Event, EventKind, Recorder, Step};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

pub struct FireArgs<'a> {
    pub event: &'a str,
    pub params: &'a [String],
    pub ctx: Option<&'a str>,
    pub manifest: Option<&'a Path>,
    pub trace: bool,
}

pub fn run(root: &Path, config: &Config, args: FireArgs<'_>, json: bool) -> anyhow::Result<()> {
    let kind: EventKind = args.event.parse()?;

    let mut event = Event::new(kind);
    for raw in args.params {
        let (key, value) = parse_param(raw)?;
        event.params.insert(key, value);
    }

    let ctx: Value = match args.ctx {
        Some(raw) => serde_json::from_str(raw).context("--ctx must be valid JSON")?,
        None => Value::Object(Default::default()),
    };

    let config = super::override_manifest(config, args.manifest)?;
    let mut engine = super::build_engine(root, &config)?;

    let recorder = Arc::new(Recorder::new());
    if args.trace {
        engine = engine.with_observer(recorder.clone());
    }

    let ctx = engine.handle_event(ctx, &event).into_result()?;
    let steps = recorder.steps();

    if json {
        let value = if args.trace {
            serde_json::json!({ "event": kind, "ctx": ctx, "steps": steps })
        } else {
            serde_json::json!({ "event": kind, "ctx": ctx })
        };
        return print_json(&value);
    }

    if args.trace {
        for step in &steps {
            println!("{}", describe(step));
        }
    }
    println!("{}", serde_json::to_string_pretty(&ctx)?);
    Ok(())
}

fn describe(step: &Step) -> String {
    match step {
        Step::Started { action } => format!("[ACT] {action}"),
        Step::Finished {
            action,
            error: Some(e),
            ..
        } => format!("[ACT] {action} error: {e}"),
        Step::Finished {
            action, success, ..
        } => format!(
            "[ACT] {action} (={})",
            if *success { "Success/True" } else { "Error/False" }
        ),
        Step::Branch { action, branch } => format!("[ACT] {action} (--> {branch} branch)"),
    }
}
