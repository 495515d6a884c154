//! The event → action execution engine.
//!
//! `handle_event` scans the manifest in order. Every rule whose event name
//! resolves to the incoming event's kind runs its action tree, starting from
//! the caller's context. The last matching rule's resulting context is the
//! one returned.
//!
//! Within a tree the context threads forward through the flattened traversal:
//! each node receives what the previous node (including that node's whole
//! entered branch) produced.

use crate::action::ActionRegistry;
use crate::catalog::EventCatalog;
use crate::config::Config;
use crate::error::{LogicError, Result};
use crate::event::{Event, Params, Reply};
use crate::manifest::{ActionNode, Manifest};
use crate::observe::{NoopObserver, Observer, TracingObserver};
use std::path::Path;

pub struct Engine<C, K> {
    manifest: Manifest,
    catalog: EventCatalog<K>,
    registry: ActionRegistry<C>,
    observer: Box<dyn Observer>,
}

impl<C, K> Engine<C, K>
where
    C: Clone,
    K: PartialEq,
{
    /// Wire the catalog and registry and load the built-in manifest.
    ///
    /// This is the only fallible step: a malformed manifest keeps the engine
    /// from starting.
    pub fn init(catalog: EventCatalog<K>, registry: ActionRegistry<C>) -> Result<Self> {
        let manifest = Manifest::default_manifest().map_err(LogicError::manifest)?;
        Ok(Self::with_manifest(catalog, registry, manifest))
    }

    /// Like [`Engine::init`] but honoring `cpa.yaml`: the configured manifest
    /// replaces the built-in one and `trace_actions: false` silences the
    /// observer.
    pub fn from_config(
        root: &Path,
        config: &Config,
        catalog: EventCatalog<K>,
        registry: ActionRegistry<C>,
    ) -> Result<Self> {
        let manifest = match config.manifest_path(root) {
            Some(path) => Manifest::load(&path),
            None => Manifest::default_manifest(),
        }
        .map_err(LogicError::manifest)?;

        let engine = Self::with_manifest(catalog, registry, manifest);
        Ok(if config.trace_actions {
            engine
        } else {
            engine.with_observer(NoopObserver)
        })
    }

    pub fn with_manifest(
        catalog: EventCatalog<K>,
        registry: ActionRegistry<C>,
        manifest: Manifest,
    ) -> Self {
        Self {
            manifest,
            catalog,
            registry,
            observer: Box::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn catalog(&self) -> &EventCatalog<K> {
        &self.catalog
    }

    pub fn registry(&self) -> &ActionRegistry<C> {
        &self.registry
    }

    /// Run every rule bound to the event's kind.
    ///
    /// Action errors go to the observer only; the reply never carries one.
    pub fn handle_event(&self, ctx: C, event: &Event<K>) -> Reply<C> {
        let span = tracing::info_span!("handle_event", run = %uuid::Uuid::new_v4());
        let _enter = span.enter();

        let mut result = None;
        for rule in &self.manifest.events {
            let matched = self
                .catalog
                .resolve(&rule.name)
                .is_some_and(|kind| *kind == event.kind);
            if matched {
                tracing::debug!(event = %rule.name, "rule matched");
                result = Some(self.perform(ctx.clone(), &rule.actions, &event.params));
            }
        }

        Reply::ok(result.unwrap_or(ctx))
    }

    fn perform(&self, mut ctx: C, nodes: &[ActionNode], params: &Params) -> C {
        for node in nodes {
            // Unregistered names are skipped without a trace.
            let Some(action) = self.registry.get(&node.name) else {
                continue;
            };

            self.observer.action_started(node);
            let outcome = action.perform(ctx, &node.modifier, params);
            self.observer
                .action_finished(node, outcome.success, outcome.error.as_ref());

            ctx = match node.branch(outcome.success) {
                Some((branch, children)) => {
                    self.observer.branch_taken(node, branch);
                    self.perform(outcome.ctx, children, params)
                }
                None => outcome.ctx,
            };
        }
        ctx
    }
}
