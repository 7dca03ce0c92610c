// SnapshotDocument - a captured, rendered page
//
// A snapshot records, per element, what the resolver would otherwise ask a
// live browser: tag, attributes, text, form value, page-space box, computed
// style and stacking order. Hit-testing and scrolling are simulated over that
// data so that resolution can run offline (fixtures, replays, tests).
//
// Boxes are stored in page coordinates; `bounding_rect` reports them in
// viewport coordinates, shifted by the current scroll offset unless the
// element (or an ancestor) is fixed-position.

use super::{ComputedStyle, Document, Rect};
use crate::error::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Declared `visibility` that takes the parent's computed value.
const INHERIT: &str = "inherit";

/// Stands in for handles that do not belong to the document.
static MISSING: LazyLock<NodeData> = LazyLock::new(|| NodeData {
    tag: String::new(),
    attributes: BTreeMap::new(),
    text: None,
    value: None,
    rect: Rect::default(),
    style: ComputedStyle::default(),
    z: 0,
    fixed: false,
    rendered: false,
    parent: None,
    children: Vec::new(),
});

/// Style of a node that declares nothing; `visibility` inherits.
fn declared_style() -> ComputedStyle {
    ComputedStyle {
        visibility: INHERIT.to_string(),
        ..ComputedStyle::default()
    }
}

/// One element of a captured page, with its subtree.
///
/// # Example
///
/// ```ignore
/// use spotter::dom::{Rect, SnapshotDocument, SnapshotNode};
///
/// let page = SnapshotDocument::new(
///     SnapshotNode::new("body")
///         .at(0.0, 0.0, 800.0, 600.0)
///         .child(SnapshotNode::new("button").text("Submit").at(10.0, 10.0, 80.0, 24.0)),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Text preceding the children (the first text node)
    #[serde(default)]
    pub text: Option<String>,
    /// Current value of a form control
    #[serde(default)]
    pub value: Option<String>,
    /// Box in page coordinates
    #[serde(default)]
    pub rect: Rect,
    /// Declared style; `visibility` may be `inherit`, which is also the default
    #[serde(default = "declared_style")]
    pub style: ComputedStyle,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: None,
            value: None,
            rect: Rect::default(),
            style: declared_style(),
            z_index: None,
            fixed: false,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Appends a class to the `class` attribute
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let entry = self.attributes.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class.as_ref());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Sets the box from position and size
    pub fn at(self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.rect(Rect::new(left, top, width, height))
    }

    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// `visibility: hidden`
    pub fn hidden(mut self) -> Self {
        self.style.visibility = "hidden".to_string();
        self
    }

    /// `visibility: visible`, overriding a hidden ancestor
    pub fn visible(mut self) -> Self {
        self.style.visibility = "visible".to_string();
        self
    }

    /// `display: none`
    pub fn display_none(mut self) -> Self {
        self.style.display = "none".to_string();
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity;
        self
    }

    /// `pointer-events: none`
    pub fn pointer_events_none(mut self) -> Self {
        self.style.pointer_events = "none".to_string();
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    /// `position: fixed`; unaffected by scrolling
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn child(mut self, child: SnapshotNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SnapshotNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Visible area of the page in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Serialized capture: viewport plus the body subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub viewport: Viewport,
    pub body: SnapshotNode,
}

/// Handle to an element of a `SnapshotDocument` (its index in document order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
    rect: Rect,
    style: ComputedStyle,
    z: i32,
    fixed: bool,
    rendered: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A captured page implementing [`Document`].
#[derive(Debug)]
pub struct SnapshotDocument {
    nodes: Vec<NodeData>,
    viewport: Viewport,
    scroll: RwLock<(f64, f64)>,
}

impl SnapshotDocument {
    /// Builds a document whose body is `body`, with the default viewport
    pub fn new(body: SnapshotNode) -> Self {
        Self::from_snapshot(Snapshot {
            viewport: Viewport::default(),
            body,
        })
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut nodes = Vec::new();
        flatten(snapshot.body, None, &Inherited::default(), &mut nodes);
        Self {
            nodes,
            viewport: snapshot.viewport,
            scroll: RwLock::new((0.0, 0.0)),
        }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current `(scrollX, scrollY)`
    pub fn scroll_offset(&self) -> (f64, f64) {
        *self.scroll.read()
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        *self.scroll.write() = (x.max(0.0), y.max(0.0));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element with the given `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attributes.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn node(&self, id: &NodeId) -> &NodeData {
        self.nodes.get(id.0).unwrap_or(&MISSING)
    }

    fn viewport_rect(&self, data: &NodeData) -> Rect {
        if data.fixed {
            return data.rect;
        }
        let (sx, sy) = self.scroll_offset();
        data.rect.translate(-sx, -sy)
    }

    fn hit_testable(&self, data: &NodeData) -> bool {
        data.rendered
            && data.style.visibility != "hidden"
            && data.style.receives_pointer_events()
            && !data.rect.is_empty()
    }
}

// Computed values a node passes down to its children.
struct Inherited<'a> {
    z: i32,
    fixed: bool,
    rendered: bool,
    visibility: &'a str,
}

impl Default for Inherited<'_> {
    fn default() -> Self {
        Self {
            z: 0,
            fixed: false,
            rendered: true,
            visibility: "visible",
        }
    }
}

fn flatten(
    node: SnapshotNode,
    parent: Option<usize>,
    inherited: &Inherited<'_>,
    out: &mut Vec<NodeData>,
) -> usize {
    let index = out.len();
    let mut style = node.style;
    if style.visibility == INHERIT {
        style.visibility = inherited.visibility.to_string();
    }
    let passed = Inherited {
        z: node.z_index.unwrap_or(inherited.z),
        fixed: node.fixed || inherited.fixed,
        rendered: inherited.rendered && style.display != "none",
        visibility: &style.visibility,
    };
    out.push(NodeData {
        tag: node.tag.to_ascii_lowercase(),
        attributes: node.attributes,
        text: node.text,
        value: node.value,
        rect: node.rect,
        style: style.clone(),
        z: passed.z,
        fixed: passed.fixed,
        rendered: passed.rendered,
        parent,
        children: Vec::new(),
    });
    for child in node.children {
        let child_index = flatten(child, Some(index), &passed, out);
        out[index].children.push(child_index);
    }
    index
}

impl Document for SnapshotDocument {
    type Node = NodeId;

    fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(node).parent.map(NodeId)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.node(node).children.iter().copied().map(NodeId).collect()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.node(node).tag.to_ascii_uppercase()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.node(node).attributes.get(name).cloned()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let data = self.node(node);
        let mut text = data.text.clone().unwrap_or_default();
        for child in &data.children {
            text.push_str(&self.text_content(&NodeId(*child)));
        }
        text
    }

    fn first_text(&self, node: &NodeId) -> Option<String> {
        self.node(node).text.clone()
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        let data = self.node(node);
        match data.tag.as_str() {
            "input" | "textarea" | "select" => data
                .value
                .clone()
                .or_else(|| data.attributes.get("value").cloned())
                .or_else(|| Some(String::new())),
            _ => data.value.clone(),
        }
    }

    fn outer_html(&self, node: &NodeId) -> String {
        let data = self.node(node);
        let mut html = format!("<{}", data.tag);
        for (name, value) in &data.attributes {
            html.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")));
        }
        html.push('>');
        if VOID_ELEMENTS.contains(&data.tag.as_str()) {
            return html;
        }
        if let Some(text) = &data.text {
            html.push_str(text);
        }
        for child in &data.children {
            html.push_str(&self.outer_html(&NodeId(*child)));
        }
        html.push_str(&format!("</{}>", data.tag));
        html
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let data = self.node(node);
        if !data.rendered {
            return Rect::default();
        }
        self.viewport_rect(data)
    }

    fn offset_size(&self, node: &NodeId) -> (f64, f64) {
        let data = self.node(node);
        if !data.rendered {
            return (0.0, 0.0);
        }
        (data.rect.width(), data.rect.height())
    }

    fn computed_style(&self, node: &NodeId) -> ComputedStyle {
        self.node(node).style.clone()
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        if x < 0.0 || y < 0.0 || x >= self.viewport.width || y >= self.viewport.height {
            return None;
        }
        // Later siblings paint over earlier ones at equal z.
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, data)| self.hit_testable(data) && self.viewport_rect(data).contains(x, y))
            .max_by_key(|(index, data)| (data.z, *index))
            .map(|(index, _)| NodeId(index))
    }

    fn scroll_into_view(&self, node: &NodeId) {
        let data = self.node(node);
        if data.fixed || !data.rendered {
            return;
        }
        let (sx, _) = self.scroll_offset();
        let visible = data.rect.translate(-sx, 0.0);
        let x = if visible.left < 0.0 || visible.right > self.viewport.width {
            data.rect.left
        } else {
            sx
        };
        tracing::debug!("Scrolling {:?} into view at ({}, {})", node, x, data.rect.top);
        self.scroll_to(x, data.rect.top);
    }

    fn query_selector_all(&self, selector: &str) -> std::result::Result<Vec<NodeId>, String> {
        super::selector::select_all(self, selector)
    }

    fn evaluate_xpath(&self, expression: &str) -> std::result::Result<Vec<NodeId>, String> {
        super::xpath::evaluate(self, expression)
    }
}
