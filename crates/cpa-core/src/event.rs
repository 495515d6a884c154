//! Events handed to the engine and the reply it produces.

use crate::error::{LogicError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Event parameters, passed read-only to every action performed for the event.
pub type Params = HashMap<String, Value>;

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An event produced by the ingestion layer.
///
/// `K` is the identifier type of the event catalog the engine was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<K> {
    pub kind: K,
    #[serde(default)]
    pub params: Params,
}

impl<K> Event<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Split a `key=value` pair into a parameter entry.
///
/// The value is read as JSON when it parses as JSON (`42`, `true`, `{"a":1}`)
/// and kept as a plain string otherwise.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(LogicError::InvalidParam(raw.to_string()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(LogicError::InvalidParam(raw.to_string()));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Result of handling one event.
///
/// `err` is reserved: action failures are reported through the observer and
/// never surface here, so it is always `None` today.
#[derive(Debug)]
pub struct Reply<C> {
    pub ctx: C,
    pub err: Option<anyhow::Error>,
}

impl<C> Reply<C> {
    pub fn ok(ctx: C) -> Self {
        Self { ctx, err: None }
    }

    pub fn into_result(self) -> anyhow::Result<C> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(self.ctx),
        }
    }
}
