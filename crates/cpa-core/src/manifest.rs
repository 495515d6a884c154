//! Manifest model: event rules, each an ordered tree of action nodes.
//!
//! The manifest is parsed once and never mutated. Names are not checked
//! against the catalog or the registry at parse time; resolution happens when
//! an event is handled. [`Manifest::lint`] reports names that would not
//! resolve without changing that behavior.

use crate::action::ActionRegistry;
use crate::catalog::EventCatalog;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Manifest used by [`crate::engine::Engine::init`].
pub const DEFAULT_MANIFEST: &str = include_str!("default_manifest.yaml");

// ---------------------------------------------------------------------------
// ActionNode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub modifier: String,
    #[serde(
        default,
        rename = "resultSuccessActions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub on_success: Vec<ActionNode>,
    #[serde(
        default,
        rename = "resultTrueActions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub on_true: Vec<ActionNode>,
    #[serde(
        default,
        rename = "resultErrorActions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub on_error: Vec<ActionNode>,
    #[serde(
        default,
        rename = "resultFalseActions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub on_false: Vec<ActionNode>,
}

impl ActionNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier: String::new(),
            on_success: Vec::new(),
            on_true: Vec::new(),
            on_error: Vec::new(),
            on_false: Vec::new(),
        }
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = modifier.into();
        self
    }

    pub fn on_success(mut self, nodes: Vec<ActionNode>) -> Self {
        self.on_success = nodes;
        self
    }

    pub fn on_true(mut self, nodes: Vec<ActionNode>) -> Self {
        self.on_true = nodes;
        self
    }

    pub fn on_error(mut self, nodes: Vec<ActionNode>) -> Self {
        self.on_error = nodes;
        self
    }

    pub fn on_false(mut self, nodes: Vec<ActionNode>) -> Self {
        self.on_false = nodes;
        self
    }

    /// `name` or `name(modifier)`.
    pub fn label(&self) -> String {
        if self.modifier.is_empty() {
            self.name.clone()
        } else {
            format!("{}({})", self.name, self.modifier)
        }
    }

    /// The branch entered for an outcome, if any.
    ///
    /// Success wins over True, Error wins over False. An empty list is never
    /// selected.
    pub fn branch(&self, success: bool) -> Option<(Branch, &[ActionNode])> {
        let candidates = if success {
            [
                (Branch::Success, &self.on_success),
                (Branch::True, &self.on_true),
            ]
        } else {
            [
                (Branch::Error, &self.on_error),
                (Branch::False, &self.on_false),
            ]
        };
        candidates
            .into_iter()
            .find(|(_, nodes)| !nodes.is_empty())
            .map(|(branch, nodes)| (branch, nodes.as_slice()))
    }

    /// All four branch lists in declaration order.
    pub fn branches(&self) -> [(Branch, &[ActionNode]); 4] {
        [
            (Branch::Success, self.on_success.as_slice()),
            (Branch::True, self.on_true.as_slice()),
            (Branch::Error, self.on_error.as_slice()),
            (Branch::False, self.on_false.as_slice()),
        ]
    }

    fn count(&self) -> usize {
        1 + self
            .branches()
            .iter()
            .map(|(_, nodes)| nodes.iter().map(ActionNode::count).sum::<usize>())
            .sum::<usize>()
    }
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Success,
    True,
    Error,
    False,
}

impl Branch {
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Success => "SUCCESS",
            Branch::True => "TRUE",
            Branch::Error => "ERROR",
            Branch::False => "FALSE",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventRule / Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRule {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub events: Vec<EventRule>,
}

impl Manifest {
    /// Parse manifest YAML. Either the whole document parses or nothing does.
    pub fn parse(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(text)?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn default_manifest() -> Result<Self> {
        Self::parse(DEFAULT_MANIFEST)
    }

    /// Rules bound to `name`, in manifest order.
    pub fn rules_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EventRule> + 'a {
        self.events.iter().filter(move |r| r.name == name)
    }

    pub fn node_count(&self) -> usize {
        self.events
            .iter()
            .flat_map(|r| r.actions.iter())
            .map(ActionNode::count)
            .sum()
    }

    // -----------------------------------------------------------------------
    // Lint
    // -----------------------------------------------------------------------

    /// Report names that will not resolve at runtime.
    ///
    /// Unknown actions are skipped silently and unknown events never match,
    /// so these only show up here.
    pub fn lint<K, C>(
        &self,
        catalog: &EventCatalog<K>,
        registry: &ActionRegistry<C>,
    ) -> Vec<ManifestWarning> {
        let mut warnings = Vec::new();

        for (i, rule) in self.events.iter().enumerate() {
            let rule_path = format!("events[{i}]");
            if !catalog.contains(&rule.name) {
                warnings.push(ManifestWarning {
                    kind: WarningKind::UnknownEvent,
                    path: rule_path.clone(),
                    message: format!("event '{}' is not in the catalog", rule.name),
                });
            }
            if rule.actions.is_empty() {
                warnings.push(ManifestWarning {
                    kind: WarningKind::EmptyRule,
                    path: rule_path.clone(),
                    message: format!("event '{}' has no actions", rule.name),
                });
            }
            lint_nodes(
                &rule.actions,
                &format!("{rule_path}.actions"),
                registry,
                &mut warnings,
            );
        }

        warnings
    }
}

fn lint_nodes<C>(
    nodes: &[ActionNode],
    prefix: &str,
    registry: &ActionRegistry<C>,
    warnings: &mut Vec<ManifestWarning>,
) {
    for (i, node) in nodes.iter().enumerate() {
        let path = format!("{prefix}[{i}]");
        if !registry.contains(&node.name) {
            warnings.push(ManifestWarning {
                kind: WarningKind::UnknownAction,
                path: path.clone(),
                message: format!("action '{}' is not registered and will be skipped", node.name),
            });
        }
        for (branch, children) in node.branches() {
            let field = match branch {
                Branch::Success => "resultSuccessActions",
                Branch::True => "resultTrueActions",
                Branch::Error => "resultErrorActions",
                Branch::False => "resultFalseActions",
            };
            lint_nodes(children, &format!("{path}.{field}"), registry, warnings);
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestWarning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnknownEvent,
    UnknownAction,
    EmptyRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestWarning {
    pub kind: WarningKind,
    pub path: String,
    pub message: String,
}

impl fmt::Display for ManifestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
