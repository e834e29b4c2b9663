//! Renderers for flattened hierarchies
//!
//! The node list is already in pre-order with contiguous depths, so every
//! renderer is a single pass.

use serde::Serialize;
use termtree::Tree;

use crate::domain::TreeNode;
use crate::infrastructure::{InfraError, InfraResult};

fn label(node: &TreeNode) -> String {
    format!("{} ({})", node.name, node.id)
}

/// One line per node, `indent` repeated `depth` times.
pub fn render_indent(nodes: &[TreeNode], indent: &str) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&indent.repeat(node.depth));
        out.push_str(&label(node));
        out.push('\n');
    }
    out
}

/// Rebuild nesting from depths below a synthetic `title` root.
pub fn render_tree(title: &str, nodes: &[TreeNode]) -> Tree<String> {
    // open[0] is the title; open[d + 1] is the last node seen at depth d
    let mut open: Vec<Tree<String>> = vec![Tree::new(title.to_string())];

    for node in nodes {
        while open.len() > node.depth + 1 {
            close_last(&mut open);
        }
        open.push(Tree::new(label(node)));
    }
    while open.len() > 1 {
        close_last(&mut open);
    }

    open.pop().unwrap_or_else(|| Tree::new(title.to_string()))
}

fn close_last(open: &mut Vec<Tree<String>>) {
    if let Some(done) = open.pop() {
        if let Some(parent) = open.last_mut() {
            parent.push(done);
        }
    }
}

#[derive(Serialize)]
struct NodeDocument<'a> {
    node: &'a [TreeNode],
}

/// TOML document with one `[[node]]` table per occurrence.
pub fn render_toml(nodes: &[TreeNode]) -> InfraResult<String> {
    toml::to_string(&NodeDocument { node: nodes }).map_err(|e| InfraError::Render {
        message: e.to_string(),
    })
}
