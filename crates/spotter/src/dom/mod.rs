// Document abstraction
//
// The resolver runs against whatever implements `Document`: a live page bound
// through a scripting bridge, a wasm build talking to web-sys, or the
// `SnapshotDocument` captured page used offline and in tests.
//
// Every method is a read of page state except `scroll_into_view`, the one
// mutation the resolver is allowed to perform.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod selector;
pub mod snapshot;
mod xpath;

pub use snapshot::{SnapshotDocument, SnapshotNode};

/// Axis-aligned box in viewport coordinates, as `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Zero width or zero height
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// The subset of computed style the resolver inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub visibility: String,
    pub display: String,
    pub opacity: f64,
    pub pointer_events: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            visibility: "visible".to_string(),
            display: "block".to_string(),
            opacity: 1.0,
            pointer_events: "auto".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Hidden through `visibility`, `display` or full transparency
    pub fn is_unseen(&self) -> bool {
        self.visibility == "hidden" || self.display == "none" || self.opacity == 0.0
    }

    /// False for `pointer-events: none`, which hit-testing skips
    pub fn receives_pointer_events(&self) -> bool {
        self.pointer_events != "none"
    }
}

/// A rendered page the resolver can query.
pub trait Document {
    /// Handle to one element; equality is element identity.
    type Node: Clone + PartialEq + Debug;

    /// Root of all searches (`document.body`)
    fn body(&self) -> Self::Node;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Upper-case tag name, e.g. `BUTTON`
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn class_list(&self, node: &Self::Node) -> Vec<String> {
        self.attribute(node, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Concatenated text of the element and all descendants
    fn text_content(&self, node: &Self::Node) -> String;

    /// First direct text-node child, if any
    fn first_text(&self, node: &Self::Node) -> Option<String>;

    /// Current value of form controls
    fn value(&self, node: &Self::Node) -> Option<String>;

    fn outer_html(&self, node: &Self::Node) -> String;

    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// `(offsetWidth, offsetHeight)`; zero when not rendered
    fn offset_size(&self, node: &Self::Node) -> (f64, f64);

    fn computed_style(&self, node: &Self::Node) -> ComputedStyle;

    /// Topmost element receiving pointer events at a viewport point
    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Node>;

    fn scroll_into_view(&self, node: &Self::Node);

    /// Descendants of the body matching a CSS selector, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Node>, String>;

    /// Nodes selected by an XPath expression, in document order
    fn evaluate_xpath(&self, expression: &str) -> Result<Vec<Self::Node>, String>;

    /// True when `ancestor` is `node` or one of its ancestors
    fn is_self_or_ancestor(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            if &current == ancestor {
                return true;
            }
            cursor = self.parent(&current);
        }
        false
    }
}

/// Strict descendants of `root` in document (pre-)order.
pub(crate) fn descendants<D: Document + ?Sized>(doc: &D, root: &D::Node) -> Vec<D::Node> {
    let mut out = Vec::new();
    let mut stack: Vec<D::Node> = doc.children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        stack.extend(doc.children(&node).into_iter().rev());
        out.push(node);
    }
    out
}
