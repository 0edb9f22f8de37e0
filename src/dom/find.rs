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

//! Plain depth-first lookups. These do not take part in matcher traversal.

use super::DomNode;
use crate::select::Selector;

/// First descendant of `node` matching `pattern`, depth-first in document
/// order. `node` itself is not tested.
pub fn find_one<'dom>(node: DomNode<'dom>, pattern: &str) -> Option<DomNode<'dom>> {
    let selector = Selector::parse(pattern);
    node.descendants()
        .skip(1)
        .find(|descendant| selector.matches(*descendant))
}

/// Every descendant of `node` matching `pattern`, depth-first in document
/// order. `node` itself is not tested.
pub fn find_all<'dom>(node: DomNode<'dom>, pattern: &str) -> Vec<DomNode<'dom>> {
    let selector = Selector::parse(pattern);
    node.descendants()
        .skip(1)
        .filter(|descendant| selector.matches(*descendant))
        .collect()
}

/// First immediate child of `node` matching `pattern`.
pub fn find_direct_child<'dom>(node: DomNode<'dom>, pattern: &str) -> Option<DomNode<'dom>> {
    let selector = Selector::parse(pattern);
    node.children().find(|child| selector.matches(*child))
}

/// Check if any immediate child of `node` matches `pattern`.
#[inline]
pub fn has_child(node: DomNode<'_>, pattern: &str) -> bool {
    find_direct_child(node, pattern).is_some()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::{inner_text, tag_name, Document};

    const TABLE: &str = r##"
<table class="modindextable">
  <tr class="cap"><td></td><td><strong>j</strong></td><td></td></tr>
  <tr>
    <td></td>
    <td><a href="library/json.html#module-json"><code>json</code></a></td>
    <td><em>Encode and decode the JSON format.</em></td>
  </tr>
  <tr>
    <td></td>
    <td>&nbsp;&nbsp;&nbsp; <a href="library/json.tool.html#module-json.tool"><code>json.tool</code></a></td>
    <td><em>A command line to validate and pretty-print JSON.</em></td>
  </tr>
</table>
"##;

    #[test]
    fn test_find_all_document_order() {
        let doc = Document::parse(TABLE);
        let rows = doc.find_all("tr");
        assert_eq!(rows.len(), 3);

        let cells = find_all(rows[1], "td");
        assert_eq!(cells.len(), 3);
        assert_eq!(inner_text(cells[2], true), "Encode and decode the JSON format.");

        let codes: Vec<_> = doc
            .find_all("code")
            .into_iter()
            .map(|code| inner_text(code, true))
            .collect();
        assert_eq!(codes, vec!["json", "json.tool"]);
    }

    #[test]
    fn test_find_one() {
        let doc = Document::parse(TABLE);
        let table = doc.find_one("table.modindextable").unwrap();
        assert_eq!(tag_name(table), Some("table"));

        let first_link = find_one(table, "a[href*=#module-]").unwrap();
        assert_eq!(inner_text(first_link, true), "json");
        assert!(find_one(table, "section").is_none());
    }

    #[test]
    fn test_find_one_skips_self() {
        let doc = Document::parse("<div class='outer'><div class='inner'></div></div>");
        let outer = doc.find_one("div.outer").unwrap();
        let found = find_one(outer, "div").unwrap();
        assert_eq!(crate::dom::attr(found, "class"), Some("inner"));
    }

    #[test]
    fn test_find_direct_child() {
        let doc = Document::parse(TABLE);
        let rows = doc.find_all("tr");

        // the cap row has no module link
        let cap_cells = find_all(rows[0], "td");
        assert!(find_direct_child(cap_cells[1], "a[href*=#module-]").is_none());

        let cells = find_all(rows[1], "td");
        let link = find_direct_child(cells[1], "a[href*=#module-]").unwrap();
        assert_eq!(crate::dom::href(link), Some("library/json.html#module-json"));

        // grandchildren are not direct children
        assert!(find_direct_child(cells[1], "code").is_none());
        assert!(has_child(cells[1], "a"));
        assert!(!has_child(cells[1], "code"));
    }
}
