use folio::compose::{compose_sections, ComposeMode, SectionKind, UNINDEXED};
use folio::html_exporter::{self, ExportOptions, LOAD_FAILURE_MESSAGE, PUBLICATIONS_PAGE};
use folio::loader::{load_configuration, FetchError, Source};
use folio::markup;
use std::fs;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/portfolio.json")
}

fn fixture_source() -> Source {
    Source::Path(fixture_path())
}

#[test]
fn test_fixture_sections_are_ordered() {
    let doc = load_configuration(&fixture_source()).unwrap();
    let sections = compose_sections(&doc, ComposeMode::Strict).unwrap();

    let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "about",
            "now",
            "skills",
            "experience",
            "publications",
            "achievements",
            "testimonials",
            "contact",
            "portfolio",
            "quote",
            "newsletter",
        ]
    );

    let unindexed: Vec<&str> = sections
        .iter()
        .filter(|s| s.resolved_index == UNINDEXED)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(unindexed, vec!["portfolio", "quote", "newsletter"]);
    assert!(matches!(sections[1].kind, SectionKind::Custom(0)));
}

#[test]
fn test_build_writes_both_pages() {
    let out = tempfile::tempdir().unwrap();
    let doc = load_configuration(&fixture_source()).unwrap();
    let sections = compose_sections(&doc, ComposeMode::Strict).unwrap();
    let mut options = ExportOptions::new(ComposeMode::Strict);
    options.year = 2025;

    let index_path = out.path().join("index.html");
    html_exporter::to_html(&doc, &sections, &options, &index_path).unwrap();
    let publications_path = out.path().join(PUBLICATIONS_PAGE);
    assert!(html_exporter::to_publications_html(&doc, &options, &publications_path).unwrap());

    let index = fs::read_to_string(&index_path).unwrap();

    // Navigation keeps only eligible links
    assert!(index.contains("<a href=\"#about\">About</a>"));
    assert!(index.contains("<a href=\"#publications\">Writing</a>"));
    assert!(!index.contains("Drafts"));

    // Markup in authored text
    assert!(index.contains("I build <strong>reliable</strong> services.<br>Currently at"));
    assert!(index.contains("href=\"https://acme.dev\""));

    // Publications show the first two and link to the full list
    assert!(index.contains("Ownership in Practice"));
    assert!(index.contains("Async Without Tears"));
    assert!(!index.contains("Zero-Copy Parsing"));
    assert!(index.contains("<a href=\"publications.html\">Show More</a>"));

    // Certification links only for web URLs; blank icon falls back to the default
    assert!(index.contains("href=\"https://cncf.io/cert\""));
    assert!(!index.contains("href=\"not a url\""));
    assert!(index.contains("class=\"cert-icon\" width=\"40\""));

    assert!(index.contains("<span class=\"initials\">AS</span>"));
    assert!(index.contains("https://www.linkedin.com/in/maryann"));
    assert!(index.contains("© 2025 Jane Doe"));
    assert!(index.contains("<title>LeetCode</title>"));
    assert!(index.contains("placeholder=\"Your email\""));
    assert!(index.contains("style=\"left: 10%; top: 20%; animation-delay: 0s;\""));
    assert!(!index.contains("id=\"education\""));
    assert!(!index.contains("id=\"hidden\""));

    let publications = fs::read_to_string(&publications_path).unwrap();
    assert!(publications.contains("Zero-Copy Parsing"));
    assert!(publications.contains("Jane Doe, John Roe"));
}

#[test]
fn test_missing_document_gets_failure_page() {
    let out = tempfile::tempdir().unwrap();
    let err = load_configuration(&Source::Path(out.path().join("missing.json"))).unwrap_err();
    assert!(matches!(err, FetchError::Io { .. }));

    let index_path = out.path().join("site/index.html");
    html_exporter::to_failure_html(&index_path).unwrap();
    let page = fs::read_to_string(index_path).unwrap();
    assert!(page.contains(LOAD_FAILURE_MESSAGE));
}

#[test]
fn test_embedded_avatar_uses_data_url() {
    let assets = tempfile::tempdir().unwrap();
    fs::copy(fixture_path(), assets.path().join("portfolio.json")).unwrap();
    fs::write(assets.path().join("avatar.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let doc = load_configuration(&Source::Path(assets.path().join("portfolio.json"))).unwrap();
    let sections = compose_sections(&doc, ComposeMode::Lenient).unwrap();
    let mut options = ExportOptions::new(ComposeMode::Lenient);
    options.embed_images = true;
    options.asset_root = assets.path().to_path_buf();

    let html = html_exporter::render_page(&doc, &sections, &options).unwrap();
    assert!(html.contains("src=\"data:image/png;base64,"));
}

#[test]
fn test_markup_plain_text_drops_only_markup() {
    let inputs = [
        "plain",
        "<b>bold</b> and <i>it<u>al</u>ic</i>",
        "see (docs)[https://docs.rs] now",
        "broken <b>tag and (label)[",
        "line\\nbreak\nagain",
        "ünïcödé <strong>✓</strong>",
        "",
    ];
    let expected = [
        "plain",
        "bold and italic",
        "see docs now",
        "broken <b>tag and (label)[",
        "line\nbreak\nagain",
        "ünïcödé ✓",
        "",
    ];

    for (input, want) in inputs.iter().zip(expected) {
        let nodes = markup::parse(input);
        assert_eq!(markup::plain_text(&nodes), want, "input: {:?}", input);
    }
}
