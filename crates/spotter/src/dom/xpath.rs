// XPath subset for documents without a native evaluator
//
// Location paths made of `/` and `//` steps with a name test (`tag` or `*`)
// and any number of predicates: `[@a]`, `[@a='v']`, `[contains(@a,'v')]` and
// `[text()='v']`. Paths may be combined with `|`. Results come back in
// document order without duplicates.

use super::Document;
use super::selector::split_top_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    HasAttr(String),
    AttrEquals(String, String),
    AttrContains(String, String),
    TextEquals(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    // None for `*`
    name: Option<String>,
    predicates: Vec<Predicate>,
}

pub(crate) fn evaluate<D: Document>(doc: &D, expression: &str) -> Result<Vec<D::Node>, String> {
    let paths = split_top_level(expression, '|')
        .into_iter()
        .map(|path| parse_path(path.trim()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("unsupported XPath expression '{}': {}", expression, e))?;

    let body = doc.body();
    let mut all = vec![body.clone()];
    all.extend(super::descendants(doc, &body));

    let mut selected = vec![false; all.len()];
    for path in &paths {
        for index in eval_path(doc, &all, path) {
            selected[index] = true;
        }
    }
    Ok(all
        .into_iter()
        .zip(selected)
        .filter_map(|(node, keep)| keep.then_some(node))
        .collect())
}

// Returns indices into `all`. A context of None is the document root, the
// parent of the body.
fn eval_path<D: Document>(doc: &D, all: &[D::Node], path: &[Step]) -> Vec<usize> {
    let mut context: Vec<Option<usize>> = vec![None];
    for step in path {
        let next: Vec<usize> = (0..all.len())
            .filter(|&i| step_matches(doc, &all[i], step))
            .filter(|&i| {
                context
                    .iter()
                    .any(|ctx| related(doc, all, *ctx, i, step.axis))
            })
            .collect();
        context = next.into_iter().map(Some).collect();
    }
    context.into_iter().flatten().collect()
}

fn related<D: Document>(doc: &D, all: &[D::Node], ctx: Option<usize>, i: usize, axis: Axis) -> bool {
    match (ctx, axis) {
        (None, Axis::Descendant) => true,
        (None, Axis::Child) => i == 0,
        (Some(c), Axis::Child) => doc.parent(&all[i]).as_ref() == Some(&all[c]),
        (Some(c), Axis::Descendant) => c != i && doc.is_self_or_ancestor(&all[c], &all[i]),
    }
}

fn step_matches<D: Document>(doc: &D, node: &D::Node, step: &Step) -> bool {
    if let Some(name) = &step.name {
        if !doc.tag_name(node).eq_ignore_ascii_case(name) {
            return false;
        }
    }
    step.predicates.iter().all(|p| match p {
        Predicate::HasAttr(a) => doc.attribute(node, a).is_some(),
        Predicate::AttrEquals(a, v) => doc.attribute(node, a).as_deref() == Some(v.as_str()),
        Predicate::AttrContains(a, v) => doc.attribute(node, a).is_some_and(|x| x.contains(v.as_str())),
        Predicate::TextEquals(v) => doc.first_text(node).as_deref() == Some(v.as_str()),
    })
}

fn parse_path(path: &str) -> Result<Vec<Step>, String> {
    let mut rest = path;
    let mut steps = Vec::new();
    if !rest.starts_with('/') {
        return Err("only absolute paths are supported".to_string());
    }
    while !rest.is_empty() {
        let axis = if let Some(r) = rest.strip_prefix("//") {
            rest = r;
            Axis::Descendant
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
            Axis::Child
        } else {
            return Err(format!("unexpected '{}'", rest));
        };

        let name_end = rest.find(['/', '[']).unwrap_or(rest.len());
        let name = rest[..name_end].trim();
        if name.is_empty() {
            return Err("missing name test".to_string());
        }
        if !(name == "*" || name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')) {
            return Err(format!("unsupported name test '{}'", name));
        }
        rest = &rest[name_end..];

        let mut predicates = Vec::new();
        while rest.starts_with('[') {
            let end = predicate_end(rest).ok_or_else(|| "unterminated predicate".to_string())?;
            predicates.push(parse_predicate(rest[1..end].trim())?);
            rest = &rest[end + 1..];
        }

        steps.push(Step {
            axis,
            name: (name != "*").then(|| name.to_string()),
            predicates,
        });
    }
    Ok(steps)
}

fn predicate_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn literal(input: &str) -> Result<String, String> {
    let input = input.trim();
    for q in ['\'', '"'] {
        if input.len() >= 2 && input.starts_with(q) && input.ends_with(q) {
            return Ok(input[1..input.len() - 1].to_string());
        }
    }
    Err(format!("expected string literal, got '{}'", input))
}

fn parse_predicate(pred: &str) -> Result<Predicate, String> {
    if let Some(args) = pred
        .strip_prefix("contains(")
        .and_then(|p| p.strip_suffix(')'))
    {
        let (attr, value) = args
            .split_once(',')
            .ok_or_else(|| format!("bad contains() predicate '{}'", pred))?;
        let attr = attr
            .trim()
            .strip_prefix('@')
            .ok_or_else(|| format!("contains() supports attributes only: '{}'", pred))?;
        return Ok(Predicate::AttrContains(attr.to_string(), literal(value)?));
    }
    if let Some((lhs, rhs)) = pred.split_once('=') {
        let lhs = lhs.trim();
        if lhs == "text()" {
            return Ok(Predicate::TextEquals(literal(rhs)?));
        }
        if let Some(attr) = lhs.strip_prefix('@') {
            return Ok(Predicate::AttrEquals(attr.to_string(), literal(rhs)?));
        }
        return Err(format!("unsupported predicate '{}'", pred));
    }
    match pred.strip_prefix('@') {
        Some(attr) if !attr.is_empty() => Ok(Predicate::HasAttr(attr.to_string())),
        _ => Err(format!("unsupported predicate '{}'", pred)),
    }
}
