//! Stage 2: applies each path node's `transform` attribute to its `d` data
//! and removes the attribute.
//!
//! Only `path` nodes are rewritten here. A `transform` on a group stays in
//! place; the flatten stage copies it onto the collapsed path, where a later
//! resolve pass consumes it.

use crate::dom::{Node, NodeKind};
use crate::matrix::Matrix;
use crate::path::{PathData, PRECISION};
use crate::{Error, PipelineOptions, Result};

pub fn resolve_transforms(node: Node, options: &PipelineOptions) -> Result<Node> {
    resolve_at(node, options, 0)
}

fn resolve_at(mut node: Node, options: &PipelineOptions, depth: usize) -> Result<Node> {
    if depth > options.max_depth {
        return Err(Error::TooDeep {
            max_depth: options.max_depth,
        });
    }

    match node.kind {
        NodeKind::Path => {
            if let Some(transform) = node.remove_attr("transform") {
                let matrix = Matrix::parse(&transform)?;
                let d = node.attr("d").unwrap_or("");
                let mut path = PathData::parse(d)?;
                path.transform(&matrix);
                path.round(PRECISION);
                node.set_attr("d", path.to_string());
            }
            Ok(node)
        }
        NodeKind::Svg | NodeKind::Group => {
            node.children = node
                .children
                .into_iter()
                .map(|child| resolve_at(child, options, depth + 1))
                .collect::<Result<_>>()?;
            Ok(node)
        }
        _ => Ok(node),
    }
}
