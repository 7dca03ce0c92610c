// Locator - What to look for, independent of where it is
//
// A locator is one of four matching strategies. Text and regexp locators are
// resolved by the in-page resolver itself; CSS and XPath are delegated to the
// document's native query engines.
//
// Locators are plain immutable values and serialize into the wire form
// `{ "using": ..., "value": ... }` shared with the resolver.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching strategy, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "string")]
    Text,
    #[serde(rename = "regexp")]
    Regexp,
    #[serde(rename = "css selector")]
    Css,
    #[serde(rename = "xpath")]
    XPath,
}

impl Strategy {
    /// Wire name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Text => "string",
            Strategy::Regexp => "regexp",
            Strategy::Css => "css selector",
            Strategy::XPath => "xpath",
        }
    }
}

/// Identifies zero or more elements on a page.
///
/// # Example
///
/// ```ignore
/// use spotter::{Locator, by};
///
/// let label = Locator::from("Machine type");
/// let cpu = Locator::regexp(r"/\d+ vCPUs?/i");
/// let dropdown = by::css("select.machine-type");
/// assert_eq!(cpu.to_string(), r"/\d+ vCPUs?/i");
/// assert_eq!(dropdown.to_string(), "css selector(select.machine-type)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Case- and whitespace-insensitive text of the innermost matching element
    Text(String),
    /// Regular expression over collapsed element text, bare or `/body/flags`
    Regexp(String),
    /// CSS selector evaluated by the document
    Css(String),
    /// XPath expression evaluated by the document
    XPath(String),
}

impl Locator {
    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    pub fn regexp(pattern: impl Into<String>) -> Self {
        Locator::Regexp(pattern.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    /// Rebuilds a locator from its wire parts
    pub fn from_parts(strategy: Strategy, value: impl Into<String>) -> Self {
        let value = value.into();
        match strategy {
            Strategy::Text => Locator::Text(value),
            Strategy::Regexp => Locator::Regexp(value),
            Strategy::Css => Locator::Css(value),
            Strategy::XPath => Locator::XPath(value),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Locator::Text(_) => Strategy::Text,
            Locator::Regexp(_) => Strategy::Regexp,
            Locator::Css(_) => Strategy::Css,
            Locator::XPath(_) => Strategy::XPath,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Text(v) | Locator::Regexp(v) | Locator::Css(v) | Locator::XPath(v) => v,
        }
    }

    /// Short form used in action descriptions, e.g. `"Submit"` or `css(.btn)`.
    pub fn pretty(&self) -> String {
        match self {
            Locator::Text(v) => format!("\"{}\"", v),
            Locator::Regexp(v) => v.clone(),
            Locator::Css(v) => format!("css({})", v),
            Locator::XPath(v) => format!("xpath({})", v),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Text(v) | Locator::Regexp(v) => f.write_str(v),
            other => write!(f, "{}({})", other.strategy().as_str(), other.value()),
        }
    }
}

impl From<&str> for Locator {
    fn from(text: &str) -> Self {
        Locator::Text(text.to_string())
    }
}

impl From<String> for Locator {
    fn from(text: String) -> Self {
        Locator::Text(text)
    }
}

impl From<&String> for Locator {
    fn from(text: &String) -> Self {
        Locator::Text(text.clone())
    }
}

impl From<Regex> for Locator {
    fn from(re: Regex) -> Self {
        Locator::Regexp(re.as_str().to_string())
    }
}

impl From<&Regex> for Locator {
    fn from(re: &Regex) -> Self {
        Locator::Regexp(re.as_str().to_string())
    }
}

impl From<fancy_regex::Regex> for Locator {
    fn from(re: fancy_regex::Regex) -> Self {
        Locator::Regexp(re.as_str().to_string())
    }
}

macro_rules! number_locator {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Locator {
                fn from(n: $t) -> Self {
                    Locator::Text(n.to_string())
                }
            }
        )*
    };
}

number_locator!(i32, i64, u32, u64, usize);

/// Constructors mirroring the `by.css(...)` / `by.xpath(...)` idiom.
pub mod by {
    use super::Locator;

    pub fn css(selector: impl Into<String>) -> Locator {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Locator {
        Locator::XPath(expression.into())
    }
}

/// Compiles a regexp locator value.
///
/// Accepts a bare pattern or the `/body/flags` literal form. Patterns follow
/// JavaScript syntax, so lookaround and backreferences are allowed. Flags `i`,
/// `m` and `s` become an inline group; `g`, `u` and `y` have no meaning for a
/// single test and are ignored.
pub(crate) fn compile_pattern(value: &str) -> std::result::Result<fancy_regex::Regex, String> {
    let (body, flags) = split_literal(value);
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'g' | 'u' | 'y' => {}
            other => return Err(format!("unsupported regexp flag '{}' in {}", other, value)),
        }
    }
    let pattern = if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", inline, body)
    };
    fancy_regex::Regex::new(&pattern).map_err(|e| e.to_string())
}

fn split_literal(value: &str) -> (&str, &str) {
    if value.len() >= 2 && value.starts_with('/') {
        if let Some(end) = value.rfind('/') {
            if end > 0 {
                let flags = &value[end + 1..];
                if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                    return (&value[1..end], flags);
                }
            }
        }
    }
    (value, "")
}
