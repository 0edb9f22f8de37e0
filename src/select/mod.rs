// Copyright © 2024 Don Isaac
//
// This file is part of DocQuery.
//
// DocQuery is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// DocQuery is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details.
//
// You should have received a copy of the GNU General Public License along with
// DocQuery. If not, see <https://www.gnu.org/licenses/>.
mod glob;

use std::fmt;

use scraper::node::Element;

use crate::dom::DomNode;
use glob::Glob;

/// A compiled, single-step CSS-like selector.
///
/// This is not a CSS engine. It understands a small, forgiving grammar
/// meant for ad-hoc scraping:
///
/// | pattern           | matches                                              |
/// |-------------------|------------------------------------------------------|
/// | `div`             | `<div>`                                              |
/// | `div.cls`, `.cls` | a `class` token matching the glob `cls`              |
/// | `div#id`, `#id`   | an `id` matching the glob `id`                       |
/// | `a[href]`         | any attribute whose key matches the glob `href`      |
/// | `a[href=v]`       | attribute value equal to `v`                         |
/// | `a[href*=v]`      | attribute value containing `v`                       |
/// | `a[href^=v]`      | attribute value starting with `v`                    |
/// | `a[href$=v]`      | attribute value ending with `v`                      |
/// | `h1,h2`           | either alternative                                   |
///
/// Class, id and attribute keys use shell-style globs (`*`, `?`, `[...]`).
/// Attribute values are always compared literally. An empty or `*` tag
/// matches any element. Text and other non-element nodes never match.
///
/// Parsing never fails. Malformed alternatives compile to a step that never
/// matches.
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    alternatives: Vec<Step>,
}

#[derive(Debug, Clone)]
enum Step {
    Tag(TagName),
    Class { tag: TagName, class: Glob },
    Id { tag: TagName, id: Glob },
    Attr { tag: TagName, key: Glob, op: AttrOp },
    Never,
}

#[derive(Debug, Clone)]
enum TagName {
    Any,
    Named(String),
}

#[derive(Debug, Clone)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
}

impl Selector {
    pub fn parse(pattern: &str) -> Self {
        let alternatives = pattern
            .split(',')
            .map(|alternative| Step::parse(alternative.trim()))
            .collect();

        Self {
            source: pattern.to_string(),
            alternatives,
        }
    }

    /// The pattern this selector was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if `node` is an element matching any alternative.
    pub fn matches(&self, node: DomNode<'_>) -> bool {
        node.value()
            .as_element()
            .is_some_and(|element| self.matches_element(element))
    }

    pub fn matches_element(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|step| step.matches(element))
    }
}

impl From<&str> for Selector {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

impl From<String> for Selector {
    fn from(pattern: String) -> Self {
        Self::parse(&pattern)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

impl Step {
    fn parse(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self::Never;
        }

        // Attribute selectors are checked first; their values may contain
        // `.` and `#`.
        if let Some(open) = pattern.find('[') {
            let (tag, rest) = pattern.split_at(open);
            let Some(body) = rest[1..].strip_suffix(']') else {
                return Self::Never;
            };
            return Self::parse_attr(TagName::new(tag), body);
        }

        if let Some((tag, id)) = pattern.split_once('#') {
            return Self::Id {
                tag: TagName::new(tag),
                id: Glob::new(id),
            };
        }

        if let Some((tag, class)) = pattern.split_once('.') {
            return Self::Class {
                tag: TagName::new(tag),
                class: Glob::new(class),
            };
        }

        Self::Tag(TagName::new(pattern))
    }

    fn parse_attr(tag: TagName, body: &str) -> Self {
        const OPERATORS: [(&str, fn(String) -> AttrOp); 4] = [
            ("*=", AttrOp::Contains),
            ("^=", AttrOp::Prefix),
            ("$=", AttrOp::Suffix),
            ("=", AttrOp::Equals),
        ];

        let (key, op) = OPERATORS
            .iter()
            .find_map(|(operator, make_op)| {
                body.split_once(operator)
                    .map(|(key, value)| (key, make_op(unquote(value.trim()).to_string())))
            })
            .unwrap_or((body, AttrOp::Exists));

        let key = key.trim();
        if key.is_empty() {
            return Self::Never;
        }

        Self::Attr {
            tag,
            key: Glob::new(key),
            op,
        }
    }

    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Tag(tag) => tag.matches(element),
            Self::Class { tag, class } => {
                tag.matches(element)
                    && element
                        .attrs()
                        .filter(|(key, _)| *key == "class")
                        .flat_map(|(_, value)| value.split_whitespace())
                        .any(|token| class.matches(token))
            }
            Self::Id { tag, id } => {
                tag.matches(element)
                    && element
                        .attrs()
                        .any(|(key, value)| key == "id" && id.matches(value))
            }
            Self::Attr { tag, key, op } => {
                tag.matches(element)
                    && element
                        .attrs()
                        .any(|(name, value)| key.matches(name) && op.matches(value))
            }
            Self::Never => false,
        }
    }
}

impl TagName {
    fn new(tag: &str) -> Self {
        match tag.trim() {
            "" | "*" => Self::Any,
            tag => Self::Named(tag.to_string()),
        }
    }

    #[inline]
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Any => true,
            Self::Named(name) => element.name() == name,
        }
    }
}

impl AttrOp {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals(expected) => value == expected,
            Self::Contains(needle) => value.contains(needle.as_str()),
            Self::Prefix(prefix) => value.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => value.ends_with(suffix.as_str()),
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::Document;

    /// Parse `html` as a fragment and test `pattern` against its first
    /// element.
    fn check(pattern: &str, html: &str) -> bool {
        let doc = Document::parse_fragment(html);
        let first = doc
            .root()
            .descendants()
            .find(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|el| el.name() != "html")
            })
            .expect("fragment should contain an element");
        Selector::parse(pattern).matches(first)
    }

    #[test]
    fn test_tag() {
        assert!(check("div", "<div></div>"));
        assert!(!check("div", "<span></span>"));
        assert!(check("*", "<span></span>"));
        assert!(check("h1,h2, h3", "<h3>x</h3>"));
        assert!(!check("h1,h2", "<h4>x</h4>"));
    }

    #[test]
    fn test_class() {
        assert!(check("div.Documentation", r#"<div class="a Documentation b"></div>"#));
        assert!(check(".Documentation", r#"<section class="Documentation"></section>"#));
        assert!(!check("span.Documentation", r#"<div class="Documentation"></div>"#));
        assert!(!check("div.Documentation", r#"<div class="Documentation-sinceVersion"></div>"#));
        assert!(check("div.Documentation-*", r#"<div class="x Documentation-content"></div>"#));
        assert!(!check("div.Documentation", "<div></div>"));
    }

    #[test]
    fn test_id() {
        assert!(check("section#module-*", r#"<section id="module-json"></section>"#));
        assert!(check("#main", r#"<p id="main"></p>"#));
        assert!(!check("section#module-*", r#"<section id="json"></section>"#));
        assert!(!check("div#main", r#"<p id="main"></p>"#));
    }

    #[test]
    fn test_attr_exists() {
        assert!(check("a[aria-label]", r#"<a aria-label="x" href="/"></a>"#));
        assert!(check("[data-*]", r#"<span data-kind="x"></span>"#));
        assert!(!check("a[aria-label]", r#"<a href="/"></a>"#));
    }

    #[test]
    fn test_attr_value_operators() {
        assert!(check("a[href*=#module-]", r#"<a href="/x/json.html#module-json"></a>"#));
        assert!(!check("a[href*=#module-]", r#"<a href="/x/json.html"></a>"#));

        assert!(check("a[href^=/3/library/]", r#"<a href="/3/library/os.html"></a>"#));
        assert!(!check("a[href^=/3/library/]", r#"<a href="/2/library/os.html"></a>"#));

        assert!(check("a[href$=.html]", r#"<a href="/docs/abc.html"></a>"#));
        assert!(!check("a[href$=.html]", r#"<a href="/docs/abc.json"></a>"#));

        assert!(check("div[role=note]", r#"<div role="note"></div>"#));
        assert!(!check("div[role=note]", r#"<div role="alerting-note"></div>"#));
        assert!(check(r#"div[role="note"]"#, r#"<div role="note"></div>"#));
    }

    #[test]
    fn test_values_are_not_globs() {
        // glob characters in values are compared literally
        assert!(!check("a[href^=/docs/*]", r#"<a href="/docs/abc.html"></a>"#));
        assert!(check("a[href^=/docs/*]", r#"<a href="/docs/*/abc.html"></a>"#));
        assert!(!check("div[role=n?te]", r#"<div role="note"></div>"#));
    }

    #[test]
    fn test_malformed_never_matches() {
        assert!(!check("div[role", r#"<div role="x"></div>"#));
        assert!(!check("div.[abc", r#"<div class="[abc"></div>"#));
        assert!(!check("", "<div></div>"));
        assert!(!check("[=x]", r#"<div a="x"></div>"#));
        // a malformed alternative does not poison the others
        assert!(check("div[role,p", "<p></p>"));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let doc = Document::parse_fragment("<p>hello</p>");
        let selector = Selector::parse("*");
        let text = doc
            .root()
            .descendants()
            .find(|node| node.value().is_text())
            .unwrap();
        assert!(!selector.matches(text));
    }
}
