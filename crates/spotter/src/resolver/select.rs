// Strategy dispatch: every element a locator matches, before any filtering

use crate::dom::Document;
use crate::locator::{Locator, compile_pattern};
use fancy_regex::Regex;

/// All elements matching `locator`, in document order.
///
/// Errors are resolver failure strings (invalid pattern or selector).
pub(crate) fn select_all<D: Document>(doc: &D, locator: &Locator) -> Result<Vec<D::Node>, String> {
    let invalid = |e: String| format!("Invalid locator {}: {}", locator, e);
    match locator {
        Locator::Text(text) => Ok(by_text(doc, text)),
        Locator::Regexp(pattern) => {
            let re = compile_pattern(pattern).map_err(invalid)?;
            by_regexp(doc, &re, &doc.body()).map_err(invalid)
        }
        Locator::Css(selector) => doc.query_selector_all(selector).map_err(invalid),
        Locator::XPath(expression) => doc.evaluate_xpath(expression).map_err(invalid),
    }
}

/// Folds ASCII letters to lower case and collapses whitespace (including
/// no-break spaces). Other letters keep their case.
pub(crate) fn normalize_text(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn input_type<D: Document>(doc: &D, node: &D::Node) -> Option<String> {
    (doc.tag_name(node) == "INPUT").then(|| {
        doc.attribute(node, "type")
            .map(|t| t.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    })
}

// Inputs whose value a text locator may match exactly.
fn accepts_typed_text<D: Document>(doc: &D, node: &D::Node) -> bool {
    doc.tag_name(node) == "TEXTAREA"
        || input_type(doc, node).is_some_and(|t| t == "text" || t == "number")
}

// Controls whose value stands in for text content in regexp matching.
fn is_text_entry<D: Document>(doc: &D, node: &D::Node) -> bool {
    doc.tag_name(node) == "TEXTAREA" || input_type(doc, node).is_some_and(|t| t == "text")
}

/// Innermost elements whose normalised text equals `text`, then text inputs
/// whose value equals it exactly.
fn by_text<D: Document>(doc: &D, text: &str) -> Vec<D::Node> {
    let wanted = normalize_text(text);
    let body = doc.body();

    let mut matched = Vec::new();
    let mut counter = 0;
    collect_text_matches(doc, &body, &wanted, &mut counter, &mut matched);
    matched.sort_by_key(|(order, _)| *order);
    let mut found: Vec<D::Node> = matched.into_iter().map(|(_, node)| node).collect();

    let mut all = vec![body.clone()];
    all.extend(crate::dom::descendants(doc, &body));
    for node in all {
        if accepts_typed_text(doc, &node)
            && doc.value(&node).as_deref() == Some(text)
            && !found.contains(&node)
        {
            found.push(node);
        }
    }
    found
}

// Post-order walk; returns whether `node` or a descendant has matching text,
// so that only the innermost matches are kept.
fn collect_text_matches<D: Document>(
    doc: &D,
    node: &D::Node,
    wanted: &str,
    counter: &mut usize,
    out: &mut Vec<(usize, D::Node)>,
) -> bool {
    let order = *counter;
    *counter += 1;

    let mut descendant_matches = false;
    for child in doc.children(node) {
        if collect_text_matches(doc, &child, wanted, counter, out) {
            descendant_matches = true;
        }
    }

    let full = normalize_text(&doc.text_content(node)) == wanted;
    let own = doc
        .first_text(node)
        .is_some_and(|t| normalize_text(&t) == wanted);
    if (full || own) && !descendant_matches {
        out.push((order, node.clone()));
    }
    descendant_matches || full
}

/// Deepest elements whose collapsed text matches `re`; a parent is only
/// tested when none of its subtrees produced a match.
///
/// Fails when the backtracking matcher gives up on a pattern.
fn by_regexp<D: Document>(doc: &D, re: &Regex, node: &D::Node) -> Result<Vec<D::Node>, String> {
    let mut from_children = Vec::new();
    for child in doc.children(node) {
        from_children.extend(by_regexp(doc, re, &child)?);
    }
    if !from_children.is_empty() {
        return Ok(from_children);
    }

    let content = doc.text_content(node);
    let text = if !content.is_empty() {
        Some(content)
    } else if is_text_entry(doc, node) {
        doc.value(node).filter(|v| !v.is_empty())
    } else {
        None
    };
    match text {
        Some(text) if re.is_match(&collapse_whitespace(&text)).map_err(|e| e.to_string())? => {
            Ok(vec![node.clone()])
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{SnapshotDocument, SnapshotNode};
    use crate::locator::by;

    fn page() -> SnapshotDocument {
        SnapshotDocument::new(SnapshotNode::new("body").children([
            SnapshotNode::new("div")
                .id("outer")
                .child(SnapshotNode::new("span").id("inner").text("  Machine\u{a0}TYPE ")),
            SnapshotNode::new("label").id("split").text("Machine ").child(SnapshotNode::new("b").text("type")),
            SnapshotNode::new("input").id("name").value("Machine type"),
            SnapshotNode::new("input").id("check").attr("type", "checkbox").value("Machine type"),
            SnapshotNode::new("p").id("count").text("3 vCPUs"),
        ]))
    }

    fn ids(doc: &SnapshotDocument, nodes: &[crate::dom::snapshot::NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| doc.attribute(n, "id").unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_text_finds_innermost_and_inputs() {
        let doc = page();
        let found = select_all(&doc, &Locator::from("machine type")).unwrap();
        assert_eq!(ids(&doc, &found), vec!["inner", "split"]);

        let exact = select_all(&doc, &Locator::from("Machine type")).unwrap();
        assert_eq!(ids(&doc, &exact), vec!["inner", "split", "name"]);
    }

    #[test]
    fn test_regexp_prefers_deepest_match() {
        let doc = page();
        let found = select_all(&doc, &Locator::regexp(r"/\d+ vcpus?/i")).unwrap();
        assert_eq!(ids(&doc, &found), vec!["count"]);

        // Case-sensitive: the upper-case span does not match, the label and
        // the input value do.
        let found = select_all(&doc, &Locator::regexp("Machine type")).unwrap();
        assert_eq!(ids(&doc, &found), vec!["split", "name"]);
    }

    #[test]
    fn test_regexp_lookahead() {
        let doc = SnapshotDocument::new(SnapshotNode::new("body").children([
            SnapshotNode::new("button").id("all").text("Save all"),
            SnapshotNode::new("button").id("draft").text("Save draft"),
        ]));
        let found = select_all(&doc, &Locator::regexp("/^Save(?! all)/")).unwrap();
        assert_eq!(ids(&doc, &found), vec!["draft"]);
    }

    #[test]
    fn test_invalid_locators_are_reported() {
        let doc = page();
        let err = select_all(&doc, &Locator::regexp("/(/")).unwrap_err();
        assert!(err.starts_with("Invalid locator /(/"));
        let err = select_all(&doc, &by::css("a::before")).unwrap_err();
        assert!(err.starts_with("Invalid locator css selector(a::before)"));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello\n\u{a0}World "), "hello world");
        assert_eq!(normalize_text("ÜBER Straße"), "Über straße");
    }
}
