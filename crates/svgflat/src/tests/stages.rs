use crate::*;

fn parse(source: &str) -> Svg {
    Svg::parse(source, ParseOptions::strict()).unwrap()
}

fn assert_no_shapes(node: &Node) {
    assert!(
        !matches!(
            node.kind,
            NodeKind::Circle
                | NodeKind::Ellipse
                | NodeKind::Line
                | NodeKind::Polygon
                | NodeKind::Polyline
                | NodeKind::Rect
        ),
        "shape survived normalization: {:?}",
        node.kind
    );
    for child in &node.children {
        assert_no_shapes(child);
    }
}

fn assert_no_path_transforms(node: &Node) {
    if node.kind == NodeKind::Path {
        assert_eq!(node.attr("transform"), None);
    }
    for child in &node.children {
        assert_no_path_transforms(child);
    }
}

#[test]
fn no_shape_kind_survives_normalization() {
    let mut svg = parse(concat!(
        r#"<svg><circle r="1"/><ellipse rx="1" ry="2"/><line x2="1"/>"#,
        r#"<g><polygon points="0,0 1,1"/><polyline points="0,0 1,1"/>"#,
        r#"<rect width="1" height="1"/></g></svg>"#,
    ));
    svg.pathify().unwrap();
    assert_no_shapes(svg.root());
}

#[test]
fn no_path_keeps_a_transform_after_resolution() {
    let mut svg = parse(concat!(
        r#"<svg><path d="M0,0 1,1" transform="scale(2)"/>"#,
        r#"<g><path d="M2,2 3,3" transform="rotate(90)"/></g></svg>"#,
    ));
    svg.resolve_transforms().unwrap();
    assert_no_path_transforms(svg.root());
}

#[test]
fn flattening_inner_groups_first_changes_nothing() {
    let source = r#"<svg><g><g><path d="M0,0 1,1"/><path d="M2,2 3,3"/></g><path d="M4,4 5,5"/></g></svg>"#;

    let mut all_at_once = parse(source);
    all_at_once.flatten().unwrap();

    let mut staged = parse(source);
    let inner = staged.root().children[0].children[0].clone();
    let inner = flatten::flatten(inner, &PipelineOptions::default()).unwrap();
    // Splice the pre-flattened inner group back in, then flatten the rest.
    let mut doc = staged.into_document();
    doc.root.children[0].children[0] = inner;
    let root = flatten::flatten(doc.root, &PipelineOptions::default()).unwrap();

    assert_eq!(all_at_once.root().attr("d"), root.attr("d"));
    assert_eq!(root.attr("d"), Some("M0,0 1,1 M2,2 3,3 M4,4 5,5"));
}

#[test]
fn group_styling_attributes_carry_onto_the_merged_path() {
    let mut svg = parse(r#"<svg><g fill="red" id="layer"><path d="M0,0 1,1"/></g></svg>"#);
    svg.flatten().unwrap();
    // The root collapse copies the svg's attributes; the inner group's
    // attributes survive only on its own collapsed path, which here is
    // swallowed into the root's d.
    assert_eq!(svg.root().attr("d"), Some("M0,0 1,1"));

    let mut group_only = parse(r#"<svg><g fill="red" id="layer"><path d="M0,0 1,1"/></g></svg>"#);
    let doc = {
        group_only.pathify().unwrap();
        group_only.into_document()
    };
    let group = doc.root.children.into_iter().next().unwrap();
    let collapsed = flatten::flatten(group, &PipelineOptions::default()).unwrap();
    assert_eq!(collapsed.kind, NodeKind::Path);
    assert_eq!(collapsed.attr("fill"), Some("red"));
    assert_eq!(collapsed.attr("id"), Some("layer"));
    assert_eq!(collapsed.attr("d"), Some("M0,0 1,1"));
}

#[test]
fn stage_order_is_observable_on_transformed_shapes() {
    // Resolving before normalizing leaves the shape untouched, so the
    // transform only bakes in when the stages run in pipeline order.
    let source = r#"<svg><rect width="2" height="2" transform="translate(1,1)"/></svg>"#;

    let mut in_order = parse(source);
    in_order.pathify().unwrap();
    in_order.resolve_transforms().unwrap();
    assert_eq!(
        in_order.root().children[0].attr("d"),
        Some("M1 1 L3 1 L3 3 L1 3 z")
    );

    let mut reversed = parse(source);
    reversed.resolve_transforms().unwrap();
    assert_eq!(
        reversed.root().children[0].attr("transform"),
        Some("translate(1,1)")
    );
}
