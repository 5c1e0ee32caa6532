//! Plain text tree rendering

use std::fmt::Write;
use tagtree_model::{Branch, Node};
use tagtree_selection::{SelectionMap, SelectionStatus};

/// Render a tree one node per line, indented by depth
///
/// Branches show their leaf count when annotated; leaves show `*` when used
/// for training and their secondary information. With a selection, every
/// line starts with `[x]`, `[-]` or `[ ]`.
#[must_use]
pub fn render_tree(tree: &Branch, selection: Option<&SelectionMap>) -> String {
    let mut out = String::new();
    branch_line(&mut out, tree, 0, selection);
    for child in &tree.children {
        node_lines(&mut out, child, 1, selection);
    }
    out
}

fn node_lines(out: &mut String, node: &Node, depth: usize, selection: Option<&SelectionMap>) {
    match node {
        Node::Branch(branch) => {
            branch_line(out, branch, depth, selection);
            for child in &branch.children {
                node_lines(out, child, depth + 1, selection);
            }
        }
        Node::Leaf(leaf) => {
            prefix(out, depth, selection, leaf.id.as_str());
            let _ = write!(out, "{} ({})", leaf.name, leaf.id);
            if leaf.is_training {
                out.push_str(" *");
            }
            if !leaf.secondary_information.is_empty() {
                let _ = write!(out, " - {}", leaf.secondary_information);
            }
            out.push('\n');
        }
    }
}

fn branch_line(out: &mut String, branch: &Branch, depth: usize, selection: Option<&SelectionMap>) {
    prefix(out, depth, selection, branch.id.as_str());
    let _ = write!(out, "{} ({})", branch.name, branch.id);
    if let Some(count) = branch.count {
        let _ = write!(out, " [{count}]");
    }
    out.push('\n');
}

fn prefix(out: &mut String, depth: usize, selection: Option<&SelectionMap>, id: &str) {
    out.push_str(&"  ".repeat(depth));
    if let Some(selection) = selection {
        out.push_str(match selection.status(id) {
            SelectionStatus::Checked => "[x] ",
            SelectionStatus::Indeterminate => "[-] ",
            SelectionStatus::Unchecked => "[ ] ",
        });
    }
}
