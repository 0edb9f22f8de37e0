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
use scraper::Node;
use url::{ParseError, Url};

use super::DomNode;

/// Default text filter. Skips anchors carrying an `aria-label`, which
/// documentation sites use for permalink and "copy link" buttons.
pub fn skip_labelled_anchor(node: DomNode<'_>) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| element.name() == "a" && element.attr("aria-label").is_some())
}

/// Text content of `node`, trimmed and whitespace-collapsed.
///
/// Only direct text children are read unless `recurse` is set, in which case
/// the text of nested elements is interpolated, separated by spaces.
/// Labelled anchors are skipped (see [`skip_labelled_anchor`]).
pub fn inner_text(node: DomNode<'_>, recurse: bool) -> String {
    inner_text_with(node, recurse, skip_labelled_anchor)
}

/// Like [`inner_text`], but children for which `skip` returns `true` are
/// left out entirely.
pub fn inner_text_with<F>(node: DomNode<'_>, recurse: bool, skip: F) -> String
where
    F: Fn(DomNode<'_>) -> bool,
{
    let mut text = String::new();
    collect_trimmed(node, recurse, &skip, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_trimmed<F>(node: DomNode<'_>, recurse: bool, skip: &F, out: &mut String)
where
    F: Fn(DomNode<'_>) -> bool,
{
    for child in node.children() {
        if skip(child) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text.trim()),
            Node::Element(_) if recurse => {
                out.push(' ');
                collect_trimmed(child, recurse, skip, out);
                out.push(' ');
            }
            _ => {}
        }
    }
}

/// Text content of `node` exactly as it appears in the source. Useful for
/// `<pre>` blocks where whitespace is significant.
///
/// Labelled anchors are skipped (see [`skip_labelled_anchor`]).
///
/// `recurse` is honored: with `false` only the text nodes directly under
/// `node` are read, so `<pre>a<b>b</b>c</pre>` gives `"ac"`. Pass `true` for
/// the text of the whole subtree.
pub fn raw_inner_text(node: DomNode<'_>, recurse: bool) -> String {
    raw_inner_text_with(node, recurse, skip_labelled_anchor)
}

/// Like [`raw_inner_text`], but children for which `skip` returns `true`
/// are left out entirely.
pub fn raw_inner_text_with<F>(node: DomNode<'_>, recurse: bool, skip: F) -> String
where
    F: Fn(DomNode<'_>) -> bool,
{
    if let Node::Text(text) = node.value() {
        return (**text).to_owned();
    }

    let mut text = String::new();
    collect_raw(node, recurse, &skip, &mut text);
    text
}

fn collect_raw<F>(node: DomNode<'_>, recurse: bool, skip: &F, out: &mut String)
where
    F: Fn(DomNode<'_>) -> bool,
{
    for child in node.children() {
        if skip(child) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) if recurse => collect_raw(child, recurse, skip, out),
            _ => {}
        }
    }
}

/// The trimmed `href` attribute of `node`.
pub fn href(node: DomNode<'_>) -> Option<&str> {
    super::attr(node, "href").map(str::trim)
}

/// The `href` attribute of `node`, resolved against `base`.
///
/// Returns [`None`] for missing or empty links, in-page `#section` links,
/// `mailto:` and `javascript:` links, and links that fail to parse.
pub fn resolve_href(node: DomNode<'_>, base: &Url) -> Option<Url> {
    let link = href(node)?;
    if link.is_empty()
        || link.starts_with('#')
        || link.starts_with("mailto:")
        || link.starts_with("javascript:")
    {
        return None;
    }

    resolve(base, link).ok()
}

fn resolve(base: &Url, link: &str) -> Result<Url, ParseError> {
    if link.starts_with('/') || !link.contains("://") {
        base.join(link)
    } else {
        Url::parse(link)
    }
}
