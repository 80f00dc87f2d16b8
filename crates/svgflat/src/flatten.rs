//! Stage 3: collapses every group, and the root itself, into a single path
//! node whose `d` concatenates the path data of all descendants.
//!
//! Collapsing is bottom-up. Each child is flattened first, then run through
//! transform resolution so that a transform the child's group carried (copied
//! onto its collapsed path) is baked into coordinates before the `d` strings
//! are merged. Children that end up as something other than a path, or as a
//! path with empty data, contribute nothing.

use crate::dom::{Node, NodeKind};
use crate::resolve::resolve_transforms;
use crate::{Error, PipelineOptions, Result};

pub fn flatten(node: Node, options: &PipelineOptions) -> Result<Node> {
    flatten_at(node, options, 0)
}

fn flatten_at(node: Node, options: &PipelineOptions, depth: usize) -> Result<Node> {
    if depth > options.max_depth {
        return Err(Error::TooDeep {
            max_depth: options.max_depth,
        });
    }
    if !node.kind.is_group_like() {
        return Ok(node);
    }

    let mut merged = String::new();
    for child in node.children {
        let child = flatten_at(child, options, depth + 1)?;
        let child = resolve_transforms(child, options)?;
        if child.kind != NodeKind::Path {
            continue;
        }
        match child.attr("d") {
            Some(d) if !d.is_empty() => {
                if !merged.is_empty() {
                    merged.push(' ');
                }
                merged.push_str(d);
            }
            _ => {}
        }
    }

    let mut path = Node::new(NodeKind::Path);
    path.attrs = node.attrs;
    path.set_attr("d", merged);
    Ok(path)
}
