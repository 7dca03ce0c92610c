// Resolver - the in-page half of element resolution
//
// Resolves a positional constraint chain against a `Document` in a single
// synchronous pass. The first constraint is matched globally; each further
// constraint is matched relative to the element its predecessor resolved to,
// keeping only candidates in the right direction and the nearest band of
// those.
//
// The resolver never fails with an error: every problem becomes a
// `ResolutionOutcome::Failed` description so that the answer can always be
// returned across a remote-execution boundary. Its only side effect is
// scrolling a lone off-screen candidate into view.

use crate::chain::{Chain, Position, PositionalConstraint};
use crate::dom::Document;
use crate::locator::Locator;
use crate::options::ResolveOptions;
use crate::outcome::ResolutionOutcome;
use serde::{Deserialize, Serialize};

mod display;
pub mod geometry;
mod select;

pub use display::{DisplayStatus, covering_elements, display_status, hits_element, sample_points};

/// Minimum projection overlap for two boxes to share a band
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Candidates within this distance of the nearest are equally near
pub const DEFAULT_TIE_TOLERANCE: f64 = 1.0;

/// Tunables of the resolver. Serializable so it can travel with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    pub epsilon: f64,
    pub tie_tolerance: f64,
    /// Classes that mark an element (and its subtree) as disabled
    pub disabled_classes: Vec<String>,
    /// Classes whose elements are never auto-scrolled into view
    pub no_autoscroll_classes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            disabled_classes: vec!["disabled".to_string()],
            no_autoscroll_classes: Vec::new(),
        }
    }
}

/// Decides whether a lone off-screen candidate may be scrolled into view.
pub trait ScrollPolicy<D: Document> {
    fn should_auto_scroll(&self, doc: &D, node: &D::Node) -> bool;
}

impl<D, F> ScrollPolicy<D> for F
where
    D: Document,
    F: Fn(&D, &D::Node) -> bool,
{
    fn should_auto_scroll(&self, doc: &D, node: &D::Node) -> bool {
        self(doc, node)
    }
}

/// Terminal matching requirements; set on the last constraint only.
#[derive(Debug, Clone, Copy, Default)]
struct Terminal {
    want_zero: bool,
    enabled: bool,
    disabled: bool,
}

enum Step<N> {
    Element(N),
    Absent,
}

/// Resolves constraint chains against one document.
///
/// # Example
///
/// ```ignore
/// use spotter::{Chain, Position, ResolveOptions};
/// use spotter::resolver::Resolver;
///
/// let chain = Chain::global("Form").then(Position::Inside, "Submit");
/// let outcome = Resolver::new(&page)
///     .with_options(ResolveOptions::builder().enabled(true).build())
///     .resolve(&chain.to_vec());
/// ```
pub struct Resolver<'a, D: Document> {
    doc: &'a D,
    options: ResolveOptions,
    config: ResolverConfig,
    scroll_policy: Option<&'a dyn ScrollPolicy<D>>,
}

impl<'a, D: Document> Resolver<'a, D> {
    pub fn new(doc: &'a D) -> Self {
        Self {
            doc,
            options: ResolveOptions::default(),
            config: ResolverConfig::default(),
            scroll_policy: None,
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the class-based auto-scroll exclusion
    pub fn with_scroll_policy(mut self, policy: &'a dyn ScrollPolicy<D>) -> Self {
        self.scroll_policy = Some(policy);
        self
    }

    /// Display status of `node` under this resolver's options
    pub fn display_status(&self, node: &D::Node) -> DisplayStatus {
        display_status(self.doc, node, &self.options)
    }

    /// Resolves `chain` (first to last constraint).
    pub fn resolve(&self, chain: &[PositionalConstraint]) -> ResolutionOutcome<D::Node> {
        match self.run(chain) {
            Ok(outcome) => outcome,
            Err(reason) => ResolutionOutcome::Failed(reason),
        }
    }

    /// Resolves a JSON-encoded chain with JSON-encoded options.
    ///
    /// The options given here replace the resolver's own. Malformed input
    /// is reported as a failure like any other.
    pub fn resolve_json(&self, chain_json: &str, options_json: &str) -> ResolutionOutcome<D::Node> {
        let chain: Vec<PositionalConstraint> = match serde_json::from_str(chain_json) {
            Ok(chain) => chain,
            Err(e) => return ResolutionOutcome::Failed(format!("Invalid locator chain: {}", e)),
        };
        let options: ResolveOptions = match serde_json::from_str(options_json) {
            Ok(options) => options,
            Err(e) => return ResolutionOutcome::Failed(format!("Invalid options: {}", e)),
        };
        Resolver {
            doc: self.doc,
            options,
            config: self.config.clone(),
            scroll_policy: self.scroll_policy,
        }
        .resolve(&chain)
    }

    fn run(&self, chain: &[PositionalConstraint]) -> Result<ResolutionOutcome<D::Node>, String> {
        let Some(last_index) = chain.len().checked_sub(1) else {
            return Err("Assert failed: the locator chain is empty.".to_string());
        };
        if self.options.is_scroll_mode() {
            if chain.len() != 1 {
                return Err("Assert failed: scroll requires exactly one locator.".to_string());
            }
            self.scroll_to(&chain[0].locator)?;
            return Ok(ResolutionOutcome::ConfirmedAbsent);
        }
        if chain[0].position != Position::Global {
            return Err(format!(
                "Assert failed: the first locator must be global, got {}.",
                chain[0].position
            ));
        }

        let mut anchor: Option<D::Node> = None;
        for (i, constraint) in chain.iter().enumerate() {
            let terminal = if i == last_index {
                Terminal {
                    want_zero: self.options.want_zero,
                    enabled: self.options.enabled,
                    disabled: self.options.disabled,
                }
            } else {
                Terminal::default()
            };
            let step = match &anchor {
                None => self.find_global(&constraint.locator, terminal)?,
                Some(reference) => {
                    if constraint.position == Position::Global {
                        return Err(format!(
                            "Assert failed: only the first locator may be global, {} is not first.",
                            constraint.locator
                        ));
                    }
                    self.find_relative(reference, constraint, terminal)?
                }
            };
            match step {
                Step::Element(node) => anchor = Some(node),
                Step::Absent => return Ok(ResolutionOutcome::ConfirmedAbsent),
            }
        }
        anchor
            .map(ResolutionOutcome::Found)
            .ok_or_else(|| "Assert failed: resolution produced no element.".to_string())
    }

    fn is_visible(&self, node: &D::Node) -> bool {
        self.display_status(node) == DisplayStatus::Visible
    }

    // Non-zero layout box that is not entirely off the left edge.
    fn is_maybe_displayed(&self, node: &D::Node) -> bool {
        let (width, height) = self.doc.offset_size(node);
        width > 0.0 && height > 0.0 && self.doc.bounding_rect(node).right > 0.0
    }

    fn should_auto_scroll(&self, node: &D::Node) -> bool {
        match self.scroll_policy {
            Some(policy) => policy.should_auto_scroll(self.doc, node),
            None => !self
                .doc
                .class_list(node)
                .iter()
                .any(|c| self.config.no_autoscroll_classes.contains(c)),
        }
    }

    // The one maybe-displayed node, when there is exactly one and it may be
    // scrolled.
    fn single_scroll_candidate(&self, nodes: &[D::Node]) -> Option<D::Node> {
        let mut maybe = nodes.iter().filter(|n| self.is_maybe_displayed(n));
        match (maybe.next(), maybe.next()) {
            (Some(only), None) if self.should_auto_scroll(only) => Some(only.clone()),
            _ => None,
        }
    }

    fn find_global(&self, locator: &Locator, terminal: Terminal) -> Result<Step<D::Node>, String> {
        let all = select::select_all(self.doc, locator)?;
        let mut candidates: Vec<D::Node> = all.iter().filter(|n| self.is_visible(n)).cloned().collect();

        if candidates.is_empty() && self.options.auto_scroll() {
            if let Some(node) = self.single_scroll_candidate(&all) {
                tracing::debug!("Auto-scrolling to the only candidate for {}", locator);
                self.doc.scroll_into_view(&node);
                if self.is_visible(&node) {
                    candidates = vec![node];
                }
            }
        }

        self.conclude(locator, &all, candidates, None, terminal)
    }

    // In-direction candidates sorted by distance (stable for ties).
    fn rank(&self, anchor: &D::Node, all: &[D::Node], position: Position) -> Vec<(D::Node, f64)> {
        let anchor_rect = self.doc.bounding_rect(anchor);
        let mut ranked: Vec<(D::Node, f64)> = all
            .iter()
            .filter_map(|node| {
                let rect = self.doc.bounding_rect(node);
                geometry::directional_distance(position, &anchor_rect, &rect, self.config.epsilon)
                    .map(|distance| (node.clone(), distance))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    fn find_relative(
        &self,
        anchor: &D::Node,
        constraint: &PositionalConstraint,
        terminal: Terminal,
    ) -> Result<Step<D::Node>, String> {
        let locator = &constraint.locator;
        let all = select::select_all(self.doc, locator)?;
        let mut ranked = self.rank(anchor, &all, constraint.position);
        let mut visible: Vec<(D::Node, f64)> =
            ranked.iter().filter(|(n, _)| self.is_visible(n)).cloned().collect();

        if visible.is_empty() && self.options.auto_scroll() {
            let in_direction: Vec<D::Node> = ranked.iter().map(|(n, _)| n.clone()).collect();
            if let Some(node) = self.single_scroll_candidate(&in_direction) {
                tracing::debug!("Auto-scrolling to the only candidate {} of anchor", locator);
                self.doc.scroll_into_view(&node);
                ranked = self.rank(anchor, &all, constraint.position);
                visible = ranked.iter().filter(|(n, _)| self.is_visible(n)).cloned().collect();
            }
        }

        let nearest: Vec<D::Node> = match visible.first() {
            Some(&(_, min)) => visible
                .iter()
                .filter(|(_, d)| (d - min).abs() < self.config.tie_tolerance)
                .map(|(n, _)| n.clone())
                .collect(),
            None => Vec::new(),
        };
        let considered: Vec<D::Node> = ranked.into_iter().map(|(n, _)| n).collect();
        self.conclude(locator, &considered, nearest, Some((anchor, constraint.position)), terminal)
    }

    fn conclude(
        &self,
        locator: &Locator,
        considered: &[D::Node],
        found: Vec<D::Node>,
        reference: Option<(&D::Node, Position)>,
        terminal: Terminal,
    ) -> Result<Step<D::Node>, String> {
        let reference_line = reference
            .map(|(anchor, position)| {
                format!(
                    "\nReference element ({}): {}",
                    position,
                    format_html(&self.doc.outer_html(anchor))
                )
            })
            .unwrap_or_default();

        if terminal.want_zero {
            if !found.is_empty() {
                return Err(format!(
                    "Found unwanted: {}{}\n{}",
                    locator,
                    reference_line,
                    self.elements_to_string(&found)
                ));
            }
            return Ok(Step::Absent);
        }

        let element = match found.as_slice() {
            [] => {
                let summary = if reference.is_some() {
                    "No elements are within area defined by reference element."
                } else {
                    "No elements are displayed."
                };
                return Err(format!(
                    "Looking for {} failed. {}{}{}",
                    locator,
                    summary,
                    reference_line,
                    self.hidden_report(considered)
                ));
            }
            [only] => only.clone(),
            many => {
                let summary = if reference.is_some() {
                    "More than one element seems to be nearest to reference element. Cannot choose."
                        .to_string()
                } else {
                    format!(
                        "More than one element is displayed, number of displayed elements: {}",
                        many.len()
                    )
                };
                return Err(format!(
                    "Looking for {} failed. {}{}\nElements:\n{}",
                    locator,
                    summary,
                    reference_line,
                    self.elements_to_string(many)
                ));
            }
        };

        let disabled_by = self.disabled_ancestor(&element);
        if terminal.enabled {
            if let Some(disabled) = &disabled_by {
                return Err(format!(
                    "Looking for {} failed. Element found is disabled.{}\nThe element:\n{}",
                    locator,
                    reference_line,
                    self.doc.outer_html(disabled)
                ));
            }
        }
        if terminal.disabled && disabled_by.is_none() {
            return Err(format!(
                "Looking for {} failed. Element found is enabled.{}\nThe element:\n{}",
                locator,
                reference_line,
                self.doc.outer_html(&element)
            ));
        }
        Ok(Step::Element(element))
    }

    /// Innermost ancestor-or-self that is disabled by attribute or class.
    fn disabled_ancestor(&self, node: &D::Node) -> Option<D::Node> {
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            let by_attribute = self.doc.attribute(&current, "disabled").is_some();
            let by_class = self
                .doc
                .class_list(&current)
                .iter()
                .any(|c| self.config.disabled_classes.contains(c));
            if by_attribute || by_class {
                return Some(current);
            }
            cursor = self.doc.parent(&current);
        }
        None
    }

    fn scroll_to(&self, locator: &Locator) -> Result<(), String> {
        let maybe: Vec<D::Node> = select::select_all(self.doc, locator)?
            .into_iter()
            .filter(|n| self.is_maybe_displayed(n))
            .collect();
        let [element] = maybe.as_slice() else {
            return Err(format!(
                "Scrolling to {} failed. Expected exactly one displayable element to match. \
                 Matched: {}\nElements:\n{}",
                locator,
                maybe.len(),
                self.elements_to_string(&maybe)
            ));
        };
        self.doc.scroll_into_view(element);
        if !self.is_visible(element) {
            return Err(format!(
                "Scrolling to {} failed. The displayable element did not become displayed \
                 after scrollIntoView(). The element:\n{}",
                locator,
                self.doc.outer_html(element)
            ));
        }
        Ok(())
    }

    // Markup of up to three elements, one per line.
    fn elements_to_string(&self, nodes: &[D::Node]) -> String {
        let mut out = String::new();
        for node in nodes.iter().take(3) {
            out.push_str(&self.doc.outer_html(node));
            out.push('\n');
        }
        if nodes.len() > 3 {
            out.push_str("...\n");
        }
        out
    }

    // Every matched element with its display status, and what covers the
    // COVERED ones.
    fn hidden_report(&self, considered: &[D::Node]) -> String {
        if considered.is_empty() {
            return String::new();
        }
        let mut report = format!(
            " Number of hidden elements: {}\nElements:\n",
            considered.len()
        );
        for node in considered {
            let status = self.display_status(node);
            report.push_str(&format!("{}: {}\n", format_html(&self.doc.outer_html(node)), status));
            if status == DisplayStatus::Covered {
                let covering = covering_elements(self.doc, node);
                report.push_str(&format!("\tby {} elements\n", covering.len()));
                for cover in covering {
                    match cover {
                        Some(cover) => report.push_str(&format!(
                            "\t\t{}\n",
                            format_html(&self.doc.outer_html(&cover))
                        )),
                        None => report.push_str("\t\tunknown element\n"),
                    }
                }
            }
        }
        report
    }
}

/// Resolves `chain` against `doc` with the default resolver configuration.
pub fn resolve<D: Document>(doc: &D, chain: &Chain, options: &ResolveOptions) -> ResolutionOutcome<D::Node> {
    Resolver::new(doc)
        .with_options(options.clone())
        .resolve(&chain.to_vec())
}

/// JSON entry point: `(locatorChainJSON, optionsJSON) -> outcome`.
pub fn resolve_json<D: Document>(doc: &D, chain_json: &str, options_json: &str) -> ResolutionOutcome<D::Node> {
    Resolver::new(doc).resolve_json(chain_json, options_json)
}

/// Drops newlines and whitespace between tags.
pub(crate) fn format_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pending = String::new();
    let mut after_tag = false;
    for c in html.chars().filter(|&c| c != '\n') {
        if after_tag && c.is_whitespace() {
            pending.push(c);
            continue;
        }
        if c != '<' {
            out.push_str(&pending);
        }
        pending.clear();
        out.push(c);
        after_tag = c == '>';
    }
    out.push_str(&pending);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{SnapshotDocument, SnapshotNode};
    use crate::locator::by;

    fn body() -> SnapshotNode {
        SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 720.0)
    }

    #[test]
    fn test_format_html() {
        assert_eq!(format_html("<div>\n  <b>x</b>  </div>"), "<div><b>x</b></div>");
        assert_eq!(format_html("<i>a b</i>"), "<i>a b</i>");
    }

    #[test]
    fn test_empty_chain_and_misplaced_global() {
        let doc = SnapshotDocument::new(body());
        let outcome = Resolver::new(&doc).resolve(&[]);
        assert!(outcome.failure_reason().unwrap().contains("empty"));

        let chain = Chain::global("a").then(Position::Global, "b");
        let outcome = resolve(&doc, &chain, &ResolveOptions::default());
        assert!(outcome.failure_reason().unwrap().contains("only the first locator may be global"));
    }

    #[test]
    fn test_disabled_ancestor_by_class_and_attribute() {
        let doc = SnapshotDocument::new(body().children([
            SnapshotNode::new("fieldset")
                .attr("disabled", "")
                .at(0.0, 0.0, 300.0, 100.0)
                .child(SnapshotNode::new("button").id("a").text("Apply").at(10.0, 10.0, 80.0, 20.0)),
            SnapshotNode::new("div")
                .class("disabled")
                .at(0.0, 200.0, 300.0, 100.0)
                .child(SnapshotNode::new("button").id("b").text("Book").at(10.0, 210.0, 80.0, 20.0)),
            SnapshotNode::new("button").id("c").text("Cancel").at(0.0, 400.0, 80.0, 20.0),
        ]));
        let enabled = ResolveOptions::builder().enabled(true).build();
        let disabled = ResolveOptions::builder().disabled(true).build();

        let outcome = resolve(&doc, &Chain::global("Apply"), &enabled);
        let reason = outcome.failure_reason().unwrap();
        assert!(reason.contains("Element found is disabled."));
        assert!(reason.contains("<fieldset disabled=\"\">"));

        assert!(resolve(&doc, &Chain::global("Book"), &disabled).is_success());
        let outcome = resolve(&doc, &Chain::global("Cancel"), &disabled);
        assert!(outcome.failure_reason().unwrap().contains("Element found is enabled."));
        assert!(resolve(&doc, &Chain::global("Cancel"), &enabled).is_success());
    }

    #[test]
    fn test_terminal_options_apply_to_last_constraint_only() {
        // The anchor is disabled; only the target is checked.
        let doc = SnapshotDocument::new(body().children([
            SnapshotNode::new("label").attr("disabled", "").text("Zone").at(0.0, 0.0, 100.0, 20.0),
            SnapshotNode::new("select").id("zone").at(0.0, 30.0, 100.0, 20.0),
        ]));
        let chain = Chain::global("Zone").then(Position::Under, by::css("select"));
        let options = ResolveOptions::builder().enabled(true).build();
        assert_eq!(
            resolve(&doc, &chain, &options),
            ResolutionOutcome::Found(doc.element_by_id("zone").unwrap())
        );
    }

    #[test]
    fn test_auto_scroll_recovers_single_offscreen_match() {
        let doc = SnapshotDocument::new(
            SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 4000.0).children([
                SnapshotNode::new("h2").id("footer").text("Footer").at(0.0, 3000.0, 200.0, 30.0),
            ]),
        );
        let outcome = resolve(&doc, &Chain::global("Footer"), &ResolveOptions::default());
        assert_eq!(outcome, ResolutionOutcome::Found(doc.element_by_id("footer").unwrap()));
        assert_eq!(doc.scroll_offset().1, 3000.0);
    }

    #[test]
    fn test_relative_step_scrolls_to_single_in_direction_match() {
        let page = || {
            SnapshotDocument::new(SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 4000.0).children([
                SnapshotNode::new("h2").id("footer").text("Footer").at(0.0, 600.0, 200.0, 30.0),
                SnapshotNode::new("a").id("imprint").text("Imprint").at(0.0, 3000.0, 200.0, 20.0),
                SnapshotNode::new("a").id("aside").text("Imprint").at(600.0, 3500.0, 200.0, 20.0),
                SnapshotNode::new("a").id("legal").text("Legal").at(600.0, 3600.0, 200.0, 20.0),
            ]))
        };
        let options = ResolveOptions::default();

        let doc = page();
        let chain = Chain::global("Footer").then(Position::Under, "Imprint");
        assert_eq!(
            resolve(&doc, &chain, &options),
            ResolutionOutcome::Found(doc.element_by_id("imprint").unwrap())
        );
        assert_eq!(doc.scroll_offset(), (0.0, 3000.0));

        // Off to the side, so never a candidate worth scrolling to.
        let doc = page();
        let chain = Chain::global("Footer").then(Position::Under, "Legal");
        assert!(!resolve(&doc, &chain, &options).is_success());
        assert_eq!(doc.scroll_offset(), (0.0, 0.0));
    }

    #[test]
    fn test_auto_scroll_can_be_disabled_or_excluded() {
        let page = || {
            SnapshotDocument::new(SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 4000.0).children([
                SnapshotNode::new("h2")
                    .class("page-title")
                    .text("Footer")
                    .at(0.0, 3000.0, 200.0, 30.0),
            ]))
        };

        let doc = page();
        let no_scroll = ResolveOptions::builder().scroll(false).build();
        let outcome = resolve(&doc, &Chain::global("Footer"), &no_scroll);
        assert!(outcome.failure_reason().unwrap().contains("COVERED"));
        assert_eq!(doc.scroll_offset(), (0.0, 0.0));

        let doc = page();
        let config = ResolverConfig {
            no_autoscroll_classes: vec!["page-title".to_string()],
            ..ResolverConfig::default()
        };
        let outcome = Resolver::new(&doc)
            .with_config(config)
            .resolve(&Chain::global("Footer").to_vec());
        assert!(!outcome.is_success());

        let doc = page();
        let never = |_: &SnapshotDocument, _: &crate::dom::snapshot::NodeId| false;
        let outcome = Resolver::new(&doc)
            .with_scroll_policy(&never)
            .resolve(&Chain::global("Footer").to_vec());
        assert!(!outcome.is_success());
        assert_eq!(doc.scroll_offset(), (0.0, 0.0));
    }

    #[test]
    fn test_scroll_mode() {
        let doc = SnapshotDocument::new(SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 4000.0).children([
            SnapshotNode::new("a").text("Docs").at(0.0, 2500.0, 50.0, 20.0),
            SnapshotNode::new("a").text("Docs").at(0.0, 3500.0, 50.0, 20.0),
            SnapshotNode::new("a").text("Help").at(0.0, 3600.0, 50.0, 20.0),
        ]));
        let scroll = ResolveOptions::builder().scroll(true).build();

        assert_eq!(
            resolve(&doc, &Chain::global("Help"), &scroll),
            ResolutionOutcome::ConfirmedAbsent
        );
        assert_eq!(doc.scroll_offset().1, 3600.0);

        let reason = resolve(&doc, &Chain::global("Docs"), &scroll);
        assert!(reason.failure_reason().unwrap().contains("Matched: 2"));

        let two = Chain::global("Docs").then(Position::Under, "Help");
        assert_eq!(
            resolve(&doc, &two, &scroll).failure_reason(),
            Some("Assert failed: scroll requires exactly one locator.")
        );
    }

    #[test]
    fn test_resolve_json_entry_point() {
        let doc = SnapshotDocument::new(body().children([
            SnapshotNode::new("button").id("go").text("Go").at(0.0, 0.0, 50.0, 20.0),
        ]));
        let chain = serde_json::to_string(&Chain::global("go").to_vec()).unwrap();
        assert_eq!(
            resolve_json(&doc, &chain, "{}"),
            ResolutionOutcome::Found(doc.element_by_id("go").unwrap())
        );
        assert_eq!(
            resolve_json(&doc, &chain, r#"{"wantZero": true}"#).failure_reason().map(|r| r.starts_with("Found unwanted: go")),
            Some(true)
        );
        assert!(resolve_json(&doc, "[{}]", "{}").failure_reason().unwrap().starts_with("Invalid locator chain"));
    }
}
