//! `cpa-core` — manifest-driven event handling for the control-plane agent.
//!
//! ```text
//! Event ──► Engine::handle_event
//!              │  for each manifest rule whose name resolves (EventCatalog)
//!              │  to the event's kind
//!              ▼
//!           action tree walk ──► ActionRegistry lookup ──► Action::perform
//!              │                                              │
//!              │   outcome picks the branch, context threads  │
//!              ◄──────────────────────────────────────────────┘
//!              ▼
//!           Reply { ctx, err: None }
//! ```

pub mod action;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod manifest;
pub mod observe;

pub use action::{Action, ActionRegistry, FnAction, Outcome};
pub use catalog::{EventCatalog, EventKind};
pub use config::Config;
pub use engine::Engine;
pub use error::{LogicError, Result};
pub use event::{Event, Params, Reply};
pub use manifest::{ActionNode, Branch, EventRule, Manifest, ManifestWarning};
pub use observe::{NoopObserver, Observer, Recorder, Step, TracingObserver};
