use crate::error::LogicError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// EventCatalog
// ---------------------------------------------------------------------------

/// Symbolic event name → event identifier.
///
/// Manifests refer to events by name; the engine resolves the name through
/// the catalog and compares the identifier with the incoming event's kind.
#[derive(Debug, Clone)]
pub struct EventCatalog<K> {
    events: HashMap<String, K>,
}

impl<K> Default for EventCatalog<K> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
        }
    }
}

impl<K> EventCatalog<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, kind: K) -> Self {
        self.insert(name, kind);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: K) {
        self.events.insert(name.into(), kind);
    }

    pub fn resolve(&self, name: &str) -> Option<&K> {
        self.events.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.events.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventCatalog<EventKind> {
    /// The control-plane agent's own events.
    pub fn standard() -> Self {
        EventKind::all()
            .iter()
            .fold(Self::new(), |catalog, kind| catalog.with(kind.as_str(), *kind))
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    RegisterMediaProxy,
    UnregisterMediaProxy,
    RegisterConnection,
    UnregisterConnection,
    ConnectionReady,
    ConnectionFailed,
    ProxyHeartbeat,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::RegisterMediaProxy,
            EventKind::UnregisterMediaProxy,
            EventKind::RegisterConnection,
            EventKind::UnregisterConnection,
            EventKind::ConnectionReady,
            EventKind::ConnectionFailed,
            EventKind::ProxyHeartbeat,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::RegisterMediaProxy => "register-media-proxy",
            EventKind::UnregisterMediaProxy => "unregister-media-proxy",
            EventKind::RegisterConnection => "register-connection",
            EventKind::UnregisterConnection => "unregister-connection",
            EventKind::ConnectionReady => "connection-ready",
            EventKind::ConnectionFailed => "connection-failed",
            EventKind::ProxyHeartbeat => "proxy-heartbeat",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LogicError::UnknownEvent(s.to_string()))
    }
}
