use narwhal::{BBox, BBoxResolver, BoxResolver, CachedResolver, ElementView, resolve_box};
use narwhal_svg::{Error, SvgDocument, fit_svg};

const FLOWCHART: &str = r#"<svg id="m" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: 10px;" viewBox="0 0 10 10">
  <g class="root">
    <g class="nodes">
      <g class="node default" id="flowchart-A-0" transform="translate(50, 30)">
        <rect class="basic label-container" x="-40" y="-20" width="80" height="40"/>
        <g class="label" transform="translate(-12, -8)">
          <text>Start</text>
        </g>
      </g>
      <g class="node default" id="flowchart-B-1" transform="translate(50, 130)">
        <circle r="25"/>
      </g>
    </g>
  </g>
</svg>"#;

#[test]
fn resolves_nested_groups_in_parent_space() {
    let doc = SvgDocument::parse(FLOWCHART).expect("parse");

    let a = doc.find_by_id("flowchart-A-0").expect("node A");
    assert_eq!(resolve_box(&a), BBox::new(10.0, 10.0, 80.0, 40.0));

    let b = doc.find_by_id("flowchart-B-1").expect("node B");
    assert_eq!(resolve_box(&b), BBox::new(25.0, 105.0, 50.0, 50.0));

    let root = doc.root().expect("root");
    let g_root = root.children()[0];
    assert_eq!(resolve_box(&g_root), BBox::new(10.0, 10.0, 80.0, 145.0));
}

#[test]
fn label_text_uses_the_character_heuristic() {
    let doc = SvgDocument::parse(FLOWCHART).expect("parse");
    let a = doc.find_by_id("flowchart-A-0").expect("node A");
    let label = a.children()[1];
    assert_eq!(label.tag_name(), "g");
    assert_eq!(resolve_box(&label), BBox::new(-12.0, -8.0, 40.0, 16.0));
}

#[test]
fn cached_resolution_matches_direct_resolution() {
    let doc = SvgDocument::parse(FLOWCHART).expect("parse");
    let cached = CachedResolver::default();
    for el in doc.elements().expect("elements") {
        assert_eq!(
            cached.resolve(&el),
            BBoxResolver::default().resolve(&el),
            "{}",
            el.path()
        );
    }
    assert_eq!(cached.len(), doc.elements().expect("elements").len());
}

#[test]
fn fit_svg_rewrites_root_viewport() {
    let (out, vp) = fit_svg(FLOWCHART, &BBoxResolver::default(), 8.0).expect("fit");
    assert_eq!(vp.view_box, BBox::new(2.0, 2.0, 96.0, 161.0));
    assert!(out.contains(r#"viewBox="2 2 96 161""#), "{out}");
    assert!(out.contains(r#"style="max-width: 96px;""#), "{out}");
    assert!(!out.contains("max-width: 10px"), "{out}");

    let reparsed = SvgDocument::parse(&out).expect("reparse");
    let root = reparsed.root().expect("root");
    assert_eq!(root.attribute("viewBox"), Some("2 2 96 161"));
    assert_eq!(root.id(), Some("m"));
}

#[test]
fn missing_svg_root_is_an_error() {
    let doc = SvgDocument::parse("<html><body/></html>").expect("parse");
    assert!(matches!(doc.root(), Err(Error::MissingSvgRoot)));
}

#[test]
fn malformed_markup_is_an_error() {
    assert!(matches!(SvgDocument::parse("<svg><g></svg>"), Err(Error::Xml(_))));
}

#[test]
fn fit_ignores_attribute_names_quoted_inside_other_values() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" aria-label="a viewBox='9 9 9 9'" viewBox="0 0 1 1"><rect width="4" height="4"/></svg>"#;
    let (out, _) = fit_svg(src, &BBoxResolver::default(), 0.0).expect("fit");
    let reparsed = SvgDocument::parse(&out).expect("reparse");
    let root = reparsed.root().expect("root");
    assert_eq!(root.attribute("viewBox"), Some("0 0 4 4"));
    assert_eq!(root.attribute("aria-label"), Some("a viewBox='9 9 9 9'"));
}

#[test]
fn fit_output_stays_well_formed_with_quoted_style_values() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" style='font-family: &apos;x&apos; "y"'><rect width="4" height="4"/></svg>"#;
    let (out, _) = fit_svg(src, &BBoxResolver::default(), 0.0).expect("fit");
    let reparsed = SvgDocument::parse(&out).expect("reparse");
    let root = reparsed.root().expect("root");
    assert_eq!(
        root.attribute("style"),
        Some(r#"font-family: 'x' "y"; max-width: 4px;"#)
    );
}
