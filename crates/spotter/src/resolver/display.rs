// Display status classification
//
// An element is a match candidate only when it is VISIBLE: it has a box, is
// not hidden by style, and at least one of five sample points (centre plus
// the corners inset by 1px) hit-tests to the element or a descendant.

use crate::dom::{Document, Rect};
use crate::options::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an element presents on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayStatus {
    /// Zero width or height
    Empty,
    /// Hidden by `visibility`, `display` or `opacity`
    Invisible,
    /// Rendered but occluded at every sample point
    Covered,
    /// Passes every check
    Visible,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Empty => "EMPTY",
            DisplayStatus::Invisible => "INVISIBLE",
            DisplayStatus::Covered => "COVERED",
            DisplayStatus::Visible => "VISIBLE",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Centre, then the four corners inset by one pixel.
pub fn sample_points(rect: &Rect) -> [(f64, f64); 5] {
    let (cx, cy) = rect.center();
    [
        (cx, cy),
        (rect.left + 1.0, rect.top + 1.0),
        (rect.left + 1.0, rect.bottom - 1.0),
        (rect.right - 1.0, rect.top + 1.0),
        (rect.right - 1.0, rect.bottom - 1.0),
    ]
}

/// Classifies `node`, honouring `allow_unseen` and `allow_covered`.
pub fn display_status<D: Document>(doc: &D, node: &D::Node, options: &ResolveOptions) -> DisplayStatus {
    let rect = doc.bounding_rect(node);
    if rect.is_empty() {
        return DisplayStatus::Empty;
    }
    let (x, y) = rect.center();
    if hits_ancestor_button(doc, node, x, y) {
        return DisplayStatus::Visible;
    }

    // Hit-testing skips pointer-events: none, so test through the first
    // ancestor that receives pointer events.
    let mut target = node.clone();
    let mut style = doc.computed_style(&target);
    while !style.receives_pointer_events() {
        if style.is_unseen() {
            return DisplayStatus::Invisible;
        }
        match doc.parent(&target) {
            Some(parent) => {
                style = doc.computed_style(&parent);
                target = parent;
            }
            None => break,
        }
    }
    if style.is_unseen() && !options.allow_unseen {
        return DisplayStatus::Invisible;
    }
    if options.allow_covered {
        return DisplayStatus::Visible;
    }

    if sample_points(&rect)
        .iter()
        .any(|&(x, y)| hits_element(doc, x, y, &target))
    {
        DisplayStatus::Visible
    } else {
        DisplayStatus::Covered
    }
}

/// True when the topmost element at `(x, y)` is `node` or inside it.
pub fn hits_element<D: Document>(doc: &D, x: f64, y: f64, node: &D::Node) -> bool {
    doc.element_from_point(x, y)
        .is_some_and(|top| doc.is_self_or_ancestor(node, &top))
}

// Native buttons swallow hit-tests aimed at their content: a hit on a BUTTON
// that contains the element counts as a hit on the element.
fn hits_ancestor_button<D: Document>(doc: &D, node: &D::Node, x: f64, y: f64) -> bool {
    let Some(top) = doc.element_from_point(x, y) else {
        return false;
    };
    if doc.tag_name(&top) != "BUTTON" {
        return false;
    }
    doc.parent(node)
        .is_some_and(|parent| doc.is_self_or_ancestor(&top, &parent))
}

/// Elements on top of `node` at the sample points, without `node` itself.
///
/// `None` entries are sample points with nothing hit-testable underneath
/// (typically outside the viewport).
pub fn covering_elements<D: Document>(doc: &D, node: &D::Node) -> Vec<Option<D::Node>> {
    let rect = doc.bounding_rect(node);
    if rect.is_empty() {
        return Vec::new();
    }
    let mut covering: Vec<Option<D::Node>> = Vec::new();
    for (x, y) in sample_points(&rect) {
        let hit = doc.element_from_point(x, y);
        if hit.as_ref() == Some(node) || covering.contains(&hit) {
            continue;
        }
        covering.push(hit);
    }
    covering
}
