// CSS selector subset for documents without a native query engine
//
// Supported: type and universal selectors, `#id`, `.class`, attribute
// conditions (`[a]`, `[a=v]`, `[a~=v]`, `[a*=v]`, `[a^=v]`, `[a$=v]`),
// descendant and child combinators, and comma-separated selector lists.
// Pseudo-classes and sibling combinators are rejected with an error.

use super::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Equals(String, String),
    Includes(String, String),
    Contains(String, String),
    StartsWith(String, String),
    EndsWith(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    // Relation to the part on the left; None for the leftmost part.
    combinator: Option<Combinator>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList {
    selectors: Vec<Vec<Part>>,
}

impl SelectorList {
    pub(crate) fn parse(selector: &str) -> Result<Self, String> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err("empty selector".to_string());
        }
        let selectors = split_top_level(selector, ',')
            .into_iter()
            .map(|complex| parse_complex(complex.trim(), selector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    pub(crate) fn matches<D: Document>(&self, doc: &D, node: &D::Node) -> bool {
        self.selectors
            .iter()
            .any(|parts| matches_parts(doc, node, parts))
    }
}

/// Descendants of the body matching `selector`, in document order.
pub(crate) fn select_all<D: Document>(doc: &D, selector: &str) -> Result<Vec<D::Node>, String> {
    let list = SelectorList::parse(selector)?;
    let body = doc.body();
    Ok(super::descendants(doc, &body)
        .into_iter()
        .filter(|node| list.matches(doc, node))
        .collect())
}

/// Splits on `sep` outside brackets, parentheses and quotes.
pub(crate) fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn tokenize(selector: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for c in selector.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if in_brackets => {
                quote = Some(c);
                current.push(c);
            }
            '[' => {
                in_brackets = true;
                current.push(c);
            }
            ']' => {
                in_brackets = false;
                current.push(c);
            }
            '>' if !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            c if c.is_whitespace() && !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if quote.is_some() || in_brackets {
        return Err(format!("unterminated attribute selector in '{}'", selector));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_complex(complex: &str, whole: &str) -> Result<Vec<Part>, String> {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(complex)? {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(format!("unsupported selector '{}'", whole));
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(&token).map_err(|e| format!("{} in '{}'", e, whole))?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part {
            compound,
            combinator,
        });
    }
    if parts.is_empty() || pending.is_some() {
        return Err(format!("unsupported selector '{}'", whole));
    }
    Ok(parts)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_compound(token: &str) -> Result<Compound, String> {
    let chars: Vec<char> = token.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars.first() == Some(&'*') {
        pos = 1;
    } else {
        let tag = read_ident(&chars, &mut pos);
        if !tag.is_empty() {
            compound.tag = Some(tag);
        }
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                let id = read_ident(&chars, &mut pos);
                if id.is_empty() {
                    return Err("empty id selector".to_string());
                }
                compound.id = Some(id);
            }
            '.' => {
                pos += 1;
                let class = read_ident(&chars, &mut pos);
                if class.is_empty() {
                    return Err("empty class selector".to_string());
                }
                compound.classes.push(class);
            }
            '[' => {
                let end = chars[pos..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| pos + offset)
                    .ok_or_else(|| "unterminated attribute selector".to_string())?;
                let inner: String = chars[pos + 1..end].iter().collect();
                compound.attrs.push(parse_attr(&inner)?);
                pos = end + 1;
            }
            other => return Err(format!("unsupported selector syntax '{}'", other)),
        }
    }
    Ok(compound)
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn parse_attr(inner: &str) -> Result<AttrCondition, String> {
    for op in ["~=", "*=", "^=", "$="] {
        if let Some((name, value)) = inner.split_once(op) {
            let name = name.trim().to_string();
            let value = unquote(value);
            return Ok(match op {
                "~=" => AttrCondition::Includes(name, value),
                "*=" => AttrCondition::Contains(name, value),
                "^=" => AttrCondition::StartsWith(name, value),
                _ => AttrCondition::EndsWith(name, value),
            });
        }
    }
    if let Some((name, value)) = inner.split_once('=') {
        return Ok(AttrCondition::Equals(name.trim().to_string(), unquote(value)));
    }
    let name = inner.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(format!("invalid attribute selector '[{}]'", inner));
    }
    Ok(AttrCondition::Exists(name.to_string()))
}

fn compound_matches<D: Document>(doc: &D, node: &D::Node, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if !doc.tag_name(node).eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if doc.attribute(node, "id").as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let classes = doc.class_list(node);
        if !compound.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
    }
    compound.attrs.iter().all(|cond| attr_matches(doc, node, cond))
}

fn attr_matches<D: Document>(doc: &D, node: &D::Node, cond: &AttrCondition) -> bool {
    match cond {
        AttrCondition::Exists(name) => doc.attribute(node, name).is_some(),
        AttrCondition::Equals(name, value) => doc.attribute(node, name).as_deref() == Some(value),
        AttrCondition::Includes(name, value) => doc
            .attribute(node, name)
            .is_some_and(|v| v.split_whitespace().any(|t| t == value)),
        AttrCondition::Contains(name, value) => doc
            .attribute(node, name)
            .is_some_and(|v| !value.is_empty() && v.contains(value.as_str())),
        AttrCondition::StartsWith(name, value) => doc
            .attribute(node, name)
            .is_some_and(|v| !value.is_empty() && v.starts_with(value.as_str())),
        AttrCondition::EndsWith(name, value) => doc
            .attribute(node, name)
            .is_some_and(|v| !value.is_empty() && v.ends_with(value.as_str())),
    }
}

fn matches_parts<D: Document>(doc: &D, node: &D::Node, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !compound_matches(doc, node, &last.compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match last.combinator {
        Some(Combinator::Child) => doc
            .parent(node)
            .is_some_and(|parent| matches_parts(doc, &parent, rest)),
        _ => {
            let mut cursor = doc.parent(node);
            while let Some(ancestor) = cursor {
                if matches_parts(doc, &ancestor, rest) {
                    return true;
                }
                cursor = doc.parent(&ancestor);
            }
            false
        }
    }
}
