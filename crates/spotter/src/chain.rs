// Positional constraint chains
//
// A chain is an ordered list of locators where every element after the first
// is found relative to the element resolved by its predecessor (the anchor).
//
// Chains are persistent: extending a chain returns a new value that shares the
// existing prefix, so partially built chains can be reused freely, e.g. one
// `under("Cheese")` prefix feeding several `see(...)` calls.

use crate::locator::{Locator, Strategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Relation of a constraint to the element resolved before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    /// No anchor; only valid for the first constraint
    Global,
    /// Below the anchor and horizontally overlapping it
    Under,
    /// Below the anchor, regardless of horizontal alignment
    Below,
    /// Left of the anchor and vertically overlapping it
    LeftOf,
    /// Right of the anchor and vertically overlapping it
    RightOf,
    /// Overlapping the anchor on both axes
    Inside,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Global => "global",
            Position::Under => "under",
            Position::Below => "below",
            Position::LeftOf => "leftOf",
            Position::RightOf => "rightOf",
            Position::Inside => "inside",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locator together with its relation to the previous anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireConstraint", into = "WireConstraint")]
pub struct PositionalConstraint {
    pub locator: Locator,
    pub position: Position,
}

impl PositionalConstraint {
    pub fn new(position: Position, locator: impl Into<Locator>) -> Self {
        Self {
            locator: locator.into(),
            position,
        }
    }

    pub fn global(locator: impl Into<Locator>) -> Self {
        Self::new(Position::Global, locator)
    }
}

/// Wire form of a constraint: `{ "using", "value", "position" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireConstraint {
    using: Strategy,
    value: String,
    position: Position,
}

impl From<WireConstraint> for PositionalConstraint {
    fn from(wire: WireConstraint) -> Self {
        Self {
            locator: Locator::from_parts(wire.using, wire.value),
            position: wire.position,
        }
    }
}

impl From<PositionalConstraint> for WireConstraint {
    fn from(constraint: PositionalConstraint) -> Self {
        Self {
            using: constraint.locator.strategy(),
            value: constraint.locator.value().to_string(),
            position: constraint.position,
        }
    }
}

#[derive(Debug)]
struct Link {
    constraint: PositionalConstraint,
    prev: Option<Arc<Link>>,
}

/// Persistent, copy-on-extend sequence of positional constraints.
///
/// `push` never mutates the receiver; the new chain points at the receiver's
/// last link, so every prefix is shared rather than copied.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    last: Option<Arc<Link>>,
    len: usize,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a chain with a single global constraint
    pub fn global(locator: impl Into<Locator>) -> Self {
        Self::new().push(PositionalConstraint::global(locator))
    }

    /// Returns a new chain with `constraint` appended.
    pub fn push(&self, constraint: PositionalConstraint) -> Chain {
        Chain {
            last: Some(Arc::new(Link {
                constraint,
                prev: self.last.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Returns a new chain with `locator` appended at `position`.
    pub fn then(&self, position: Position, locator: impl Into<Locator>) -> Chain {
        self.push(PositionalConstraint::new(position, locator))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last(&self) -> Option<&PositionalConstraint> {
        self.last.as_deref().map(|link| &link.constraint)
    }

    /// Constraints in chain order (first to last)
    pub fn to_vec(&self) -> Vec<PositionalConstraint> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.last.as_deref();
        while let Some(link) = cursor {
            out.push(link.constraint.clone());
            cursor = link.prev.as_deref();
        }
        out.reverse();
        out
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.to_vec() == other.to_vec()
    }
}

impl FromIterator<PositionalConstraint> for Chain {
    fn from_iter<I: IntoIterator<Item = PositionalConstraint>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Chain::new(), |chain, constraint| chain.push(constraint))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .to_vec()
            .iter()
            .map(|c| format!("{}({})", c.position, c.locator.pretty()))
            .collect();
        f.write_str(&parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::by;

    #[test]
    fn test_push_does_not_mutate_receiver() {
        let base = Chain::global("Cheese");
        let a = base.then(Position::Under, "Provolone");
        let b = base.then(Position::Under, "American");

        assert_eq!(base.len(), 1);
        assert_eq!(a.len(), 2);
        assert_eq!(b.to_vec()[1].locator, Locator::from("American"));
        assert_eq!(a.to_vec()[0], b.to_vec()[0]);
    }

    #[test]
    fn test_prefix_is_shared() {
        let base = Chain::global("Form");
        let extended = base.then(Position::Inside, "Submit");
        let base_link = base.last.as_ref().unwrap();
        let shared = extended.last.as_ref().unwrap().prev.as_ref().unwrap();
        assert!(Arc::ptr_eq(base_link, shared));
    }

    #[test]
    fn test_wire_form() {
        let constraint = PositionalConstraint::new(Position::LeftOf, by::css("input"));
        let json = serde_json::to_value(&constraint).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"using": "css selector", "value": "input", "position": "leftOf"})
        );
        let back: PositionalConstraint = serde_json::from_value(json).unwrap();
        assert_eq!(back, constraint);
    }

    #[test]
    fn test_display() {
        let chain = Chain::global("Form").then(Position::Inside, "Submit");
        assert_eq!(chain.to_string(), "global(\"Form\").inside(\"Submit\")");
    }

    #[test]
    fn test_collect() {
        let chain: Chain = vec![
            PositionalConstraint::global("a"),
            PositionalConstraint::new(Position::Below, "b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.last().unwrap().position, Position::Below);
    }
}
