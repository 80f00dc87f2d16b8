//! Stage 1: rewrites every primitive shape into a `path` node carrying an
//! equivalent path-command string.
//!
//! After this stage no node in the tree is a circle, ellipse, line, polygon,
//! polyline or rect; groups keep their structure and unknown kinds pass
//! through with only their descendants rewritten.

use crate::dom::{Node, NodeKind};
use crate::util::format_number;
use crate::{Error, PipelineOptions, Result};

pub fn normalize(node: Node, options: &PipelineOptions) -> Result<Node> {
    normalize_at(node, options, 0)
}

fn normalize_at(mut node: Node, options: &PipelineOptions, depth: usize) -> Result<Node> {
    if depth > options.max_depth {
        return Err(Error::TooDeep {
            max_depth: options.max_depth,
        });
    }

    match node.kind {
        NodeKind::Circle => {
            let r = required_number(&node, "r");
            let d = ellipse_path(number(&node, "cx"), number(&node, "cy"), r, r);
            Ok(into_path(node, &["cx", "cy", "r"], d))
        }
        NodeKind::Ellipse => {
            let d = ellipse_path(
                number(&node, "cx"),
                number(&node, "cy"),
                required_number(&node, "rx"),
                required_number(&node, "ry"),
            );
            Ok(into_path(node, &["cx", "cy", "rx", "ry"], d))
        }
        NodeKind::Line => {
            let d = point_path(&[
                number(&node, "x1"),
                number(&node, "y1"),
                number(&node, "x2"),
                number(&node, "y2"),
            ]);
            Ok(into_path(node, &["x1", "y1", "x2", "y2"], d))
        }
        NodeKind::Polygon => {
            let d = point_path(&split_points(node.attr("points").unwrap_or(""))) + "z";
            Ok(into_path(node, &["points"], d))
        }
        NodeKind::Polyline => {
            let d = point_path(&split_points(node.attr("points").unwrap_or("")));
            Ok(into_path(node, &["points"], d))
        }
        NodeKind::Rect => {
            let x = number(&node, "x");
            let y = number(&node, "y");
            let w = required_number(&node, "width");
            let h = required_number(&node, "height");
            let d = point_path(&[x, y, x + w, y, x + w, y + h, x, y + h]) + "z";
            Ok(into_path(node, &["x", "y", "width", "height"], d))
        }
        // Path nodes are already normalized; everything else keeps its own
        // shape but still gets its descendants rewritten.
        NodeKind::Path => Ok(node),
        NodeKind::Svg | NodeKind::Group | NodeKind::Other(_) => {
            node.children = node
                .children
                .into_iter()
                .map(|child| normalize_at(child, options, depth + 1))
                .collect::<Result<_>>()?;
            Ok(node)
        }
    }
}

/// Optional numeric attribute; absent or unparseable values fall back to 0.
fn number(node: &Node, name: &str) -> f64 {
    node.attr(name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Mandatory numeric attribute; absence propagates `NaN` into the emitted
/// path string rather than failing the stage.
fn required_number(node: &Node, name: &str) -> f64 {
    node.attr(name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(f64::NAN)
}

fn into_path(mut node: Node, consumed: &[&str], d: String) -> Node {
    for name in consumed {
        node.remove_attr(name);
    }
    node.kind = NodeKind::Path;
    node.set_attr("d", d);
    node
}

/// Splits a `points` attribute on whitespace/comma runs into numbers.
fn split_points(text: &str) -> Vec<f64> {
    text.trim()
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().unwrap_or(f64::NAN))
        .collect()
}

/// `Mx0,y0 x1,y1 …` — first pair gets the moveto, the rest are implicit
/// linetos. An odd trailing value is paired with `NaN`.
fn point_path(values: &[f64]) -> String {
    let mut buf = ryu_js::Buffer::new();
    let mut out = String::new();
    for pair in values.chunks(2) {
        out.push(if out.is_empty() { 'M' } else { ' ' });
        out.push_str(format_number(pair[0], &mut buf));
        out.push(',');
        out.push_str(format_number(
            pair.get(1).copied().unwrap_or(f64::NAN),
            &mut buf,
        ));
    }
    out
}

/// Two 180° arcs tracing the full ellipse, starting at the leftmost point.
/// The arcs meet again at the start, so no explicit close is needed.
fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    let mut buf = ryu_js::Buffer::new();
    let mut out = String::new();
    out.push('M');
    out.push_str(format_number(cx - rx, &mut buf));
    out.push(',');
    out.push_str(format_number(cy, &mut buf));
    for dx in [rx * 2.0, rx * -2.0] {
        out.push('a');
        out.push_str(format_number(rx, &mut buf));
        out.push(',');
        out.push_str(format_number(ry, &mut buf));
        out.push_str(" 0 1,0 ");
        out.push_str(format_number(dx, &mut buf));
        out.push_str(",0");
    }
    out
}
