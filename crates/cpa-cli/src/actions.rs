//! Built-in actions over a JSON object context.
//!
//! These are enough to drive the default manifest from the command line.
//! Malformed modifiers produce a false outcome with an error, never a panic.

use anyhow::anyhow;
use cpa_core::event::parse_param;
use cpa_core::{ActionRegistry, Outcome, Params};
use serde_json::{Map, Value};

pub type Ctx = Value;

pub fn builtin_registry() -> cpa_core::Result<ActionRegistry<Ctx>> {
    let mut r = ActionRegistry::new();
    r.register_fn("ctx-set", ctx_set)?;
    r.register_fn("ctx-has", ctx_has)?;
    r.register_fn("param-present", param_present)?;
    r.register_fn("param-equals", param_equals)?;
    r.register_fn("param-copy", param_copy)?;
    r.register_fn("log", log)?;
    r.register_fn("fail", fail)?;
    Ok(r)
}

fn object(ctx: Ctx) -> Map<String, Value> {
    match ctx {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

fn ctx_set(ctx: Ctx, modifier: &str, _: &Params) -> Outcome<Ctx> {
    match parse_param(modifier) {
        Ok((key, value)) => {
            let mut map = object(ctx);
            map.insert(key, value);
            Outcome::success(Value::Object(map))
        }
        Err(e) => Outcome::failure(ctx).with_error(e),
    }
}

fn ctx_has(ctx: Ctx, modifier: &str, _: &Params) -> Outcome<Ctx> {
    let found = ctx.get(modifier).is_some();
    Outcome::new(ctx, found)
}

fn param_present(ctx: Ctx, modifier: &str, params: &Params) -> Outcome<Ctx> {
    let found = params.contains_key(modifier);
    Outcome::new(ctx, found)
}

fn param_equals(ctx: Ctx, modifier: &str, params: &Params) -> Outcome<Ctx> {
    let Some((key, expected)) = modifier.split_once('=') else {
        return Outcome::failure(ctx).with_error(anyhow!(
            "param-equals expects key=value, got '{modifier}'"
        ));
    };
    let matches = match params.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    };
    Outcome::new(ctx, matches)
}

fn param_copy(ctx: Ctx, modifier: &str, params: &Params) -> Outcome<Ctx> {
    match params.get(modifier) {
        Some(value) => {
            let mut map = object(ctx);
            map.insert(modifier.to_string(), value.clone());
            Outcome::success(Value::Object(map))
        }
        None => Outcome::failure(ctx).with_error(anyhow!("param '{modifier}' not present")),
    }
}

fn log(ctx: Ctx, modifier: &str, _: &Params) -> Outcome<Ctx> {
    tracing::info!("{modifier}");
    Outcome::success(ctx)
}

fn fail(ctx: Ctx, modifier: &str, _: &Params) -> Outcome<Ctx> {
    let message = if modifier.is_empty() {
        "failed".to_string()
    } else {
        modifier.to_string()
    };
    Outcome::failure(ctx).with_error(anyhow!(message))
}
