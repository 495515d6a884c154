//! Action capability and the name → action registry.
//!
//! An action is a unit of work the manifest refers to by name. It receives
//! the current context, the node's modifier and the event params, and hands
//! back a (possibly new) context plus a boolean outcome. The outcome alone
//! drives branching; an error is reported but does not change it.

use crate::error::{LogicError, Result};
use crate::event::Params;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What an action hands back to the engine.
#[derive(Debug)]
pub struct Outcome<C> {
    pub ctx: C,
    pub success: bool,
    pub error: Option<anyhow::Error>,
}

impl<C> Outcome<C> {
    pub fn new(ctx: C, success: bool) -> Self {
        Self {
            ctx,
            success,
            error: None,
        }
    }

    pub fn success(ctx: C) -> Self {
        Self::new(ctx, true)
    }

    pub fn failure(ctx: C) -> Self {
        Self::new(ctx, false)
    }

    /// Attach an error without touching the outcome flag.
    pub fn with_error(mut self, error: impl Into<anyhow::Error>) -> Self {
        self.error = Some(error.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

pub trait Action<C>: Send + Sync {
    fn perform(&self, ctx: C, modifier: &str, params: &Params) -> Outcome<C>;
}

/// Adapts a plain function or closure into an [`Action`].
pub struct FnAction<F>(pub F);

impl<C, F> Action<C> for FnAction<F>
where
    F: Fn(C, &str, &Params) -> Outcome<C> + Send + Sync,
{
    fn perform(&self, ctx: C, modifier: &str, params: &Params) -> Outcome<C> {
        (self.0)(ctx, modifier, params)
    }
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

/// Explicit name → action table, built once at startup.
///
/// Lookup is exact and case-sensitive.
pub struct ActionRegistry<C> {
    actions: HashMap<String, Arc<dyn Action<C>>>,
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<C> Clone for ActionRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `name`. Names are unique.
    pub fn register<A>(&mut self, name: impl Into<String>, action: A) -> Result<()>
    where
        A: Action<C> + 'static,
    {
        let name = name.into();
        if self.actions.contains_key(&name) {
            return Err(LogicError::DuplicateAction(name));
        }
        self.actions.insert(name, Arc::new(action));
        Ok(())
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> Result<()>
    where
        F: Fn(C, &str, &Params) -> Outcome<C> + Send + Sync + 'static,
        C: 'static,
    {
        self.register(name, FnAction(f))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action<C>> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;

    impl Action<i64> for Double {
        fn perform(&self, ctx: i64, _modifier: &str, _params: &Params) -> Outcome<i64> {
            Outcome::success(ctx * 2)
        }
    }

    #[test]
    fn registered_action_is_found_by_exact_name() {
        let mut registry = ActionRegistry::new();
        registry.register("double", Double).unwrap();

        let action = registry.get("double").unwrap();
        let out = action.perform(21, "", &Params::new());
        assert_eq!(out.ctx, 42);
        assert!(out.success);

        assert!(registry.get("Double").is_none());
        assert!(registry.get("double ").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ActionRegistry::<i64>::new();
        registry.register("double", Double).unwrap();
        let err = registry.register("double", Double).unwrap_err();
        assert!(matches!(err, LogicError::DuplicateAction(ref n) if n == "double"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn closures_receive_modifier_and_params() {
        let mut registry = ActionRegistry::<String>::new();
        registry
            .register_fn("echo", |ctx: String, modifier, params| {
                let extra = params.get("x").and_then(|v| v.as_str()).unwrap_or("");
                Outcome::success(format!("{ctx}{modifier}{extra}"))
            })
            .unwrap();

        let mut params = Params::new();
        params.insert("x".into(), serde_json::json!("!"));
        let out = registry.get("echo").unwrap().perform("a".into(), "b", &params);
        assert_eq!(out.ctx, "ab!");
    }

    #[test]
    fn with_error_keeps_outcome_flag() {
        let out = Outcome::success(1).with_error(anyhow::anyhow!("degraded"));
        assert!(out.success);
        assert_eq!(out.error.unwrap().to_string(), "degraded");
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = ActionRegistry::<i64>::new();
        registry.register("b", Double).unwrap();
        registry.register("a", Double).unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
