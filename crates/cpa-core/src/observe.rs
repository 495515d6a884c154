//! Observation points of the engine's tree walk.
//!
//! The engine reports three things per node: the action starting, its
//! outcome, and the branch it entered. What happens with those reports is up
//! to the [`Observer`]; the walk itself does not log.

use crate::manifest::{ActionNode, Branch};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub trait Observer: Send + Sync {
    fn action_started(&self, _node: &ActionNode) {}

    fn action_finished(&self, _node: &ActionNode, _success: bool, _error: Option<&anyhow::Error>) {}

    fn branch_taken(&self, _node: &ActionNode, _branch: Branch) {}
}

impl<O: Observer + ?Sized> Observer for Arc<O> {
    fn action_started(&self, node: &ActionNode) {
        (**self).action_started(node)
    }

    fn action_finished(&self, node: &ActionNode, success: bool, error: Option<&anyhow::Error>) {
        (**self).action_finished(node, success, error)
    }

    fn branch_taken(&self, node: &ActionNode, branch: Branch) {
        (**self).branch_taken(node, branch)
    }
}

// ---------------------------------------------------------------------------
// TracingObserver
// ---------------------------------------------------------------------------

/// Logs every observation point through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

fn outcome_str(success: bool) -> &'static str {
    if success {
        "Success/True"
    } else {
        "Error/False"
    }
}

impl Observer for TracingObserver {
    fn action_started(&self, node: &ActionNode) {
        tracing::info!(action = %node.name, "[ACT] {}", node.label());
    }

    fn action_finished(&self, node: &ActionNode, success: bool, error: Option<&anyhow::Error>) {
        match error {
            Some(e) => {
                tracing::error!(action = %node.name, success, "action err ({}): {e:#}", node.label())
            }
            None => tracing::info!(
                action = %node.name,
                success,
                "[ACT] {} (={})",
                node.label(),
                outcome_str(success)
            ),
        }
    }

    fn branch_taken(&self, node: &ActionNode, branch: Branch) {
        tracing::info!(action = %node.name, %branch, "[ACT] {} (--> {branch} branch)", node.label());
    }
}

// ---------------------------------------------------------------------------
// NoopObserver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Started {
        action: String,
    },
    Finished {
        action: String,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Branch {
        action: String,
        branch: Branch,
    },
}

/// Keeps every observation in memory, in the order it happened.
#[derive(Debug, Default)]
pub struct Recorder {
    steps: Mutex<Vec<Step>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, step: Step) {
        // A poisoned lock only means another recording thread panicked.
        let mut steps = self.steps.lock().unwrap_or_else(|e| e.into_inner());
        steps.push(step);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.steps.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Labels of the actions that were performed, in order.
    pub fn performed(&self) -> Vec<String> {
        self.steps()
            .into_iter()
            .filter_map(|s| match s {
                Step::Started { action } => Some(action),
                _ => None,
            })
            .collect()
    }

    /// Error messages reported by actions, in order.
    pub fn errors(&self) -> Vec<String> {
        self.steps()
            .into_iter()
            .filter_map(|s| match s {
                Step::Finished { error, .. } => error,
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.steps.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Observer for Recorder {
    fn action_started(&self, node: &ActionNode) {
        self.push(Step::Started {
            action: node.label(),
        });
    }

    fn action_finished(&self, node: &ActionNode, success: bool, error: Option<&anyhow::Error>) {
        self.push(Step::Finished {
            action: node.label(),
            success,
            error: error.map(|e| format!("{e:#}")),
        });
    }

    fn branch_taken(&self, node: &ActionNode, branch: Branch) {
        self.push(Step::Branch {
            action: node.label(),
            branch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let rec = Recorder::new();
        let node = ActionNode::new("probe").modifier("x");
        rec.action_started(&node);
        rec.action_finished(&node, false, Some(&anyhow::anyhow!("boom")));
        rec.branch_taken(&node, Branch::False);

        assert_eq!(
            rec.steps(),
            vec![
                Step::Started {
                    action: "probe(x)".into()
                },
                Step::Finished {
                    action: "probe(x)".into(),
                    success: false,
                    error: Some("boom".into())
                },
                Step::Branch {
                    action: "probe(x)".into(),
                    branch: Branch::False
                },
            ]
        );
        assert_eq!(rec.performed(), vec!["probe(x)"]);
        assert_eq!(rec.errors(), vec!["boom"]);

        rec.clear();
        assert!(rec.steps().is_empty());
    }

    #[test]
    fn shared_recorder_observes_through_arc() {
        let rec = Arc::new(Recorder::new());
        let as_observer: Box<dyn Observer> = Box::new(rec.clone());
        as_observer.action_started(&ActionNode::new("a"));
        assert_eq!(rec.performed(), vec!["a"]);
    }

    #[test]
    fn step_serializes_tagged() {
        let json = serde_json::to_value(Step::Branch {
            action: "a".into(),
            branch: Branch::Success,
        })
        .unwrap();
        assert_eq!(json["type"], "branch");
        assert_eq!(json["branch"], "success");
    }
}
