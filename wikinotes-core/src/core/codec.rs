//! Conversion between indented-bullet text and the node tree.
//!
//! The text form is the on-disk body of a document:
//!
//! ```text
//! • Parent
//!   - Child
//!     [NOTE] a note on Child
//!   - Second child
//! continuation of Second child
//! ```
//!
//! Each bullet line opens a node at `level = indent / 2`. `[NOTE]` lines
//! extend the note of the most recently opened node, and any other non-blank
//! line is appended to that node's content. Parsing never fails: text with
//! no bullet lines yields a single empty root.

use crate::Node;
use regex::Regex;
use std::sync::LazyLock;

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)([•-]) (.*)$").expect("bullet pattern is valid"));

static NOTE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)\[NOTE\] (.*)$").expect("note pattern is valid"));

const INDENT: &str = "  ";
const ROOT_BULLET: char = '•';
const CHILD_BULLET: char = '-';
const NOTE_MARKER: &str = "[NOTE]";

/// Controls what [`serialize_with`] emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Emit the children of collapsed nodes as well. Off by default, which
    /// drops collapsed subtrees from the output.
    pub include_collapsed: bool,
}

/// Parses `text` into a forest with zeroed timestamps.
pub fn parse(text: &str) -> Vec<Node> {
    parse_at(text, 0)
}

/// Parses `text` into a forest, stamping every node with `timestamp`.
///
/// Node ids are `line-<n>` where `n` is the zero-based source line. Every
/// node that ends up with children is collapsed.
pub fn parse_at(text: &str, timestamp: i64) -> Vec<Node> {
    // Flat arena; `parents[i]` indexes into `nodes`, so a parent always
    // precedes its children.
    let mut nodes: Vec<Node> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut has_note: Vec<bool> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = BULLET_LINE.captures(line) {
            let level = caps[1].len() / 2;
            while open.last().is_some_and(|&top| nodes[top].level >= level) {
                open.pop();
            }
            let parent = open.last().copied();
            let mut node = Node::empty(
                format!("line-{line_index}"),
                level,
                parent.map(|p| nodes[p].id.clone()),
                timestamp,
            );
            node.content = caps[3].to_string();

            open.push(nodes.len());
            nodes.push(node);
            parents.push(parent);
            has_note.push(false);
            continue;
        }

        let Some(last) = nodes.len().checked_sub(1) else {
            log::debug!("discarding line {line_index} before the first bullet");
            continue;
        };

        if let Some(caps) = NOTE_LINE.captures(line) {
            let node = &mut nodes[last];
            if has_note[last] {
                node.note.push('\n');
            }
            node.note.push_str(&caps[2]);
            node.is_note_visible = true;
            has_note[last] = true;
        } else {
            let node = &mut nodes[last];
            node.content.push('\n');
            node.content.push_str(line);
        }
    }

    if nodes.is_empty() {
        return vec![Node::empty("line-0", 0, None, timestamp)];
    }

    assemble(nodes, &parents)
}

/// Links the flat arena into a tree, collapsing every node with children.
fn assemble(nodes: Vec<Node>, parents: &[Option<usize>]) -> Vec<Node> {
    let mut children: Vec<Vec<Node>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();

    for (index, mut node) in nodes.into_iter().enumerate().rev() {
        let mut kids = std::mem::take(&mut children[index]);
        kids.reverse();
        node.is_collapsed = !kids.is_empty();
        node.children = kids;
        match parents[index] {
            Some(parent) => children[parent].push(node),
            None => roots.push(node),
        }
    }

    roots.reverse();
    roots
}

/// Serializes `forest` to indented-bullet text, omitting collapsed subtrees.
pub fn serialize(forest: &[Node]) -> String {
    serialize_with(forest, SerializeOptions::default())
}

/// Serializes `forest` to indented-bullet text.
///
/// Indentation and bullet style follow structural depth. An empty forest
/// serializes to a single empty root bullet so the document always has an
/// insertion point.
pub fn serialize_with(forest: &[Node], options: SerializeOptions) -> String {
    if forest.is_empty() {
        return format!("{ROOT_BULLET} ");
    }

    let mut lines = Vec::new();
    for node in forest {
        write_node(&mut lines, node, 0, options);
    }
    lines.join("\n")
}

fn write_node(lines: &mut Vec<String>, node: &Node, depth: usize, options: SerializeOptions) {
    let indent = INDENT.repeat(depth);
    let bullet = if depth == 0 { ROOT_BULLET } else { CHILD_BULLET };
    lines.push(format!("{indent}{bullet} {}", node.content));

    if !node.note.is_empty() {
        for note_line in node.note.split('\n') {
            lines.push(format!("{indent}{INDENT}{NOTE_MARKER} {note_line}"));
        }
    }

    if node.is_collapsed && !options.include_collapsed {
        return;
    }
    for child in &node.children {
        write_node(lines, child, depth + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expand_all, validate_forest};

    const EXAMPLE: &str = "• Parent\n  - Child1\n  [NOTE] a note\n  - Child2";

    #[test]
    fn test_parse_example_document() {
        let forest = parse(EXAMPLE);
        assert_eq!(forest.len(), 1);
        let parent = &forest[0];
        assert_eq!(parent.content, "Parent");
        assert_eq!(parent.level, 0);
        assert!(parent.is_collapsed, "nodes with children open collapsed");
        assert_eq!(parent.children.len(), 2);

        let child1 = &parent.children[0];
        assert_eq!(child1.content, "Child1");
        assert_eq!(child1.note, "a note");
        assert!(child1.is_note_visible);
        assert_eq!(child1.level, 1);
        assert_eq!(child1.parent_id.as_deref(), Some(parent.id.as_str()));
        assert!(!child1.is_collapsed);

        assert_eq!(parent.children[1].content, "Child2");
        assert!(validate_forest(&forest).is_ok());
    }

    #[test]
    fn test_example_serializes_back_after_expanding() {
        let forest = expand_all(&parse(EXAMPLE));
        assert_eq!(
            serialize(&forest),
            "• Parent\n  - Child1\n    [NOTE] a note\n  - Child2"
        );
    }

    #[test]
    fn test_ids_follow_source_lines() {
        let forest = parse("• a\n\n  - b");
        assert_eq!(forest[0].id, "line-0");
        assert_eq!(forest[0].children[0].id, "line-2");
    }

    #[test]
    fn test_parse_empty_text_yields_single_empty_root() {
        for text in ["", "   ", "\n \n"] {
            let forest = parse(text);
            assert_eq!(forest.len(), 1);
            assert!(forest[0].content.is_empty());
            assert_eq!(forest[0].level, 0);
            assert!(forest[0].children.is_empty());
        }
    }

    #[test]
    fn test_text_without_bullets_is_discarded() {
        let forest = parse("just prose\n[NOTE] orphan note");
        assert_eq!(forest.len(), 1);
        assert!(forest[0].content.is_empty());
        assert!(forest[0].note.is_empty());
    }

    #[test]
    fn test_continuation_lines_extend_last_node() {
        let forest = parse("• first\n  - second\nmore of second\n• third");
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].children[0].content, "second\nmore of second");
        assert_eq!(forest[1].content, "third");
    }

    #[test]
    fn test_notes_attach_to_last_started_node() {
        let forest = parse("• a\n  - b\n[NOTE] one\n      [NOTE] two");
        let b = &forest[0].children[0];
        assert_eq!(b.note, "one\ntwo");
        assert!(forest[0].note.is_empty());
    }

    #[test]
    fn test_level_floors_odd_indentation() {
        let forest = parse("• a\n   - b");
        assert_eq!(forest[0].children[0].level, 1);
    }

    #[test]
    fn test_deep_indent_keeps_level_but_nests_under_open_node() {
        let forest = parse("• a\n      - b\n  - c");
        let a = &forest[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].level, 3);
        assert_eq!(a.children[1].level, 1);
    }

    #[test]
    fn test_equal_level_pops_to_sibling() {
        let forest = parse("• a\n  - b\n    - c\n  - d\n• e");
        assert_eq!(forest.len(), 2);
        let a = &forest[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].children[0].content, "c");
        assert_eq!(a.children[1].content, "d");
        assert!(a.children[0].is_collapsed);
        assert!(!a.children[1].is_collapsed);
    }

    #[test]
    fn test_dash_marker_at_root() {
        let forest = parse("- a\n- b");
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_parse_at_stamps_nodes() {
        let forest = parse_at("• a\n  - b", 99);
        assert_eq!(forest[0].created_at, 99);
        assert_eq!(forest[0].children[0].updated_at, 99);
    }

    #[test]
    fn test_serialize_empty_forest() {
        assert_eq!(serialize(&[]), "• ");
        let reparsed = parse(&serialize(&[]));
        assert_eq!(reparsed.len(), 1);
        assert!(reparsed[0].content.is_empty());
    }

    #[test]
    fn test_serialize_emits_blank_children() {
        let forest = expand_all(&parse("• a\n  - \n  - c"));
        assert_eq!(serialize(&forest), "• a\n  - \n  - c");
    }

    #[test]
    fn test_collapsed_children_are_dropped() {
        let forest = parse("• a\n  - b");
        assert!(forest[0].is_collapsed);
        let text = serialize(&forest);
        assert_eq!(text, "• a");
        let reparsed = parse(&text);
        assert!(reparsed[0].children.is_empty());
    }

    #[test]
    fn test_include_collapsed_keeps_children() {
        let forest = parse("• a\n  - b");
        let options = SerializeOptions { include_collapsed: true };
        assert_eq!(serialize_with(&forest, options), "• a\n  - b");
    }

    #[test]
    fn test_multiline_note_round_trip() {
        let mut forest = parse("• a");
        forest[0].note = "line one\nline two".to_string();
        let text = serialize(&forest);
        assert_eq!(text, "• a\n  [NOTE] line one\n  [NOTE] line two");
        assert_eq!(parse(&text)[0].note, "line one\nline two");
    }
}
