use crate::*;

fn run(source: &str) -> String {
    let mut svg = Svg::parse(source, ParseOptions::strict()).unwrap();
    svg.pathify().unwrap();
    svg.resolve_transforms().unwrap();
    svg.flatten().unwrap();
    svg.to_svg_string()
}

#[test]
fn rect_document_collapses_to_one_path() {
    assert_eq!(
        run(r#"<svg><rect x="0" y="0" width="10" height="20"/></svg>"#),
        r#"<path d="M0,0 10,0 10,20 0,20z"/>"#
    );
}

#[test]
fn circle_document_collapses_to_one_path() {
    assert_eq!(
        run(r#"<svg><circle cx="10" cy="10" r="5"/></svg>"#),
        r#"<path d="M5,10a5,5 0 1,0 10,0a5,5 0 1,0 -10,0"/>"#
    );
}

#[test]
fn translated_rect_merges_before_its_untranslated_sibling() {
    let out = run(concat!(
        r#"<svg><g>"#,
        r#"<rect width="10" height="20" transform="translate(5,5)"/>"#,
        r#"<rect width="10" height="20"/>"#,
        r#"</g></svg>"#,
    ));
    assert_eq!(
        out,
        r#"<path d="M5 5 L15 5 L15 25 L5 25 z M0,0 10,0 10,20 0,20z"/>"#
    );
}

#[test]
fn root_attributes_survive_onto_the_merged_path() {
    let out = run(r#"<svg xmlns="http://www.w3.org/2000/svg" id="art"><line x2="4" y2="4"/></svg>"#);
    assert_eq!(
        out,
        r#"<path xmlns="http://www.w3.org/2000/svg" id="art" d="M0,0 4,4"/>"#
    );
}

#[test]
fn preamble_is_prepended_verbatim() {
    let source = "<?xml version=\"1.0\"?>\n<svg><rect width=\"1\" height=\"1\"/></svg>";
    assert_eq!(
        run(source),
        "<?xml version=\"1.0\"?>\n<path d=\"M0,0 1,0 1,1 0,1z\"/>"
    );
}

#[test]
fn empty_document_yields_an_empty_path() {
    assert_eq!(run("<svg/>"), r#"<path d=""/>"#);
}

#[test]
fn lenient_parse_placeholder_flows_through_every_stage() {
    let mut svg = Svg::parse("not markup at all", ParseOptions::lenient()).unwrap();
    svg.pathify().unwrap();
    svg.resolve_transforms().unwrap();
    svg.flatten().unwrap();
    let root = svg.root();
    assert_eq!(root.kind, NodeKind::Other("invalid".to_string()));
    assert!(root.attr("reason").is_some());
    assert_eq!(root.attr("d"), None);
}

#[test]
fn depth_cap_is_configurable() {
    let mut svg = Svg::parse(
        "<svg><g><g><g><rect width='1' height='1'/></g></g></g></svg>",
        ParseOptions::strict(),
    )
    .unwrap()
    .with_pipeline_options(PipelineOptions { max_depth: 2 });
    let err = svg.pathify().unwrap_err();
    assert!(matches!(err, Error::TooDeep { max_depth: 2 }));
}

#[test]
fn rerunning_the_pipeline_on_its_output_is_stable() {
    let once = run(r#"<svg><g><circle cx="1" cy="2" r="3"/></g><rect width="4" height="4"/></svg>"#);
    assert_eq!(run(&once), once);
}
