//! Resolution outcomes and their wire form
//!
//! The resolver answers every request with a value, never an error, because a
//! remote-execution boundary can only carry return values. On the wire that
//! value is one of:
//!
//! - an element reference - exactly one element matched,
//! - `true` - absence confirmed under want-zero, or scroll-mode success,
//! - a string - the reason resolution failed.
//!
//! [`ResolutionOutcome`] is the typed form of that triple. Hosts that return
//! raw JSON decode it with [`decode_wire`]; the tagged serde representation is
//! used when both sides are Rust.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ResolutionOutcome<H> {
    /// Exactly one element satisfied the chain
    Found(H),
    /// Wire `true`: no element under want-zero, or scroll mode succeeded
    ConfirmedAbsent,
    /// Human-readable reason the chain did not resolve
    Failed(String),
}

impl<H> ResolutionOutcome<H> {
    pub fn is_success(&self) -> bool {
        !matches!(self, ResolutionOutcome::Failed(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(H) -> T) -> ResolutionOutcome<T> {
        match self {
            ResolutionOutcome::Found(h) => ResolutionOutcome::Found(f(h)),
            ResolutionOutcome::ConfirmedAbsent => ResolutionOutcome::ConfirmedAbsent,
            ResolutionOutcome::Failed(reason) => ResolutionOutcome::Failed(reason),
        }
    }

    /// Encodes into the raw `element | true | string` wire value
    pub fn to_wire(self, encode_handle: impl FnOnce(H) -> Value) -> Value {
        match self {
            ResolutionOutcome::Found(h) => encode_handle(h),
            ResolutionOutcome::ConfirmedAbsent => Value::Bool(true),
            ResolutionOutcome::Failed(reason) => Value::String(reason),
        }
    }
}

/// Decodes a raw wire value returned by a remote-execution host.
///
/// Strings are failures and `true` is confirmed absence; anything else is
/// handed to `decode_handle` as an element reference. `false` and `null` are
/// never produced by the resolver and are reported as unexpected.
///
/// # Example
///
/// ```ignore
/// use spotter::outcome::{decode_wire, ResolutionOutcome};
/// use serde_json::json;
///
/// let outcome = decode_wire(json!({"element-6066": "abc"}), |v| {
///     Ok(v["element-6066"].as_str().unwrap_or_default().to_string())
/// })?;
/// assert_eq!(outcome, ResolutionOutcome::Found("abc".to_string()));
/// ```
pub fn decode_wire<H>(
    value: Value,
    decode_handle: impl FnOnce(Value) -> Result<H>,
) -> Result<ResolutionOutcome<H>> {
    match value {
        Value::String(reason) => Ok(ResolutionOutcome::Failed(reason)),
        Value::Bool(true) => Ok(ResolutionOutcome::ConfirmedAbsent),
        Value::Bool(false) | Value::Null => Err(Error::UnexpectedOutcome(format!(
            "resolver returned {}",
            value
        ))),
        other => Ok(ResolutionOutcome::Found(decode_handle(other)?)),
    }
}

/// Accepted, stable result of polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<H> {
    /// The single element the chain resolved to
    Element(H),
    /// Absence (want-zero) or scroll success held for the dwell time
    Confirmed,
}

impl<H> Resolved<H> {
    pub fn into_element(self) -> Option<H> {
        match self {
            Resolved::Element(h) => Some(h),
            Resolved::Confirmed => None,
        }
    }
}
