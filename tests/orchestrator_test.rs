//! Integration tests for page orchestration and asset persistence.

use std::fs;

use pdfstruct::{
    extract_to_folder, ClassifyOptions, Classifier, ElementType, Error, FolderSink,
    PageOrchestrator, PageSelection, SpanDocument,
};

const BODY: &str = "Body text at the regular size, long enough to stay a paragraph.";

fn dump(image_data: &str) -> String {
    format!(
        r#"{{"pages": [
            {{"images": [{{"data": "{image}", "ext": "png"}}],
              "tables": [{{"rows": [["a", "1"], ["b", "2"]]}}],
              "blocks": [
                {{"type": 0, "lines": [{{"spans": [{{"text": "Field Report", "size": 20}}]}}]}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "{body}", "size": 11}}]}}]}},
                {{"type": 1}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "{body}", "size": 11}}]}}]}}
            ]}},
            {{"tables": [{{"header": ["name", "value"], "rows": [["x", "9"]]}}],
              "blocks": [
                {{"type": 0, "lines": [{{"spans": [{{"text": "2. Findings", "size": 20}}]}}]}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "{body}", "size": 11}}]}}]}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "Draft for review", "size": 4}}]}}]}}
            ]}}
        ]}}"#,
        image = image_data,
        body = BODY
    )
}

fn report() -> SpanDocument {
    SpanDocument::from_json_str(&dump("iVBORw0KGgo=")).unwrap()
}

#[test]
fn test_folder_sink_layout_and_order() {
    let doc = report();
    let dir = tempfile::tempdir().unwrap();
    let sink = FolderSink::new(dir.path());

    let result = PageOrchestrator::new(&doc).with_sink(&sink).run().unwrap();
    let kinds: Vec<(ElementType, u32)> = result.elements.iter().map(|e| (e.kind, e.page)).collect();
    assert_eq!(
        kinds,
        vec![
            (ElementType::Image, 1),
            (ElementType::Table, 1),
            (ElementType::HeaderTitle, 1),
            (ElementType::Para, 1),
            (ElementType::Para, 1),
            (ElementType::Table, 2),
            (ElementType::Heading, 2),
            (ElementType::Para, 2),
            (ElementType::Footer, 2),
        ]
    );

    let image_path = dir.path().join("page_1_image_1.png");
    assert_eq!(result.elements.elements[0].text, image_path.display().to_string());
    assert_eq!(
        fs::read(&image_path).unwrap(),
        vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
    );

    assert_eq!(
        fs::read_to_string(dir.path().join("page_1_table_1.csv")).unwrap(),
        "a,1\nb,2\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("page_2_table_1.csv")).unwrap(),
        "name,value\nx,9\n"
    );

    assert_eq!(result.stats.image_count, 1);
    assert_eq!(result.stats.table_count, 2);
    assert_eq!(result.stats.footer_count, 1);
}

#[test]
fn test_parallel_output_matches_sequential() {
    let doc = report();
    let parallel_dir = tempfile::tempdir().unwrap();
    let sequential_dir = tempfile::tempdir().unwrap();

    let parallel = Classifier::new()
        .with_asset_dir(parallel_dir.path())
        .classify_document(&doc)
        .unwrap();
    let sequential = Classifier::new()
        .sequential()
        .with_asset_dir(sequential_dir.path())
        .classify_document(&doc)
        .unwrap();

    let strip = |dir: &std::path::Path, text: &str| text.replace(&dir.display().to_string(), "");
    let parallel_texts: Vec<String> = parallel
        .elements
        .iter()
        .map(|e| strip(parallel_dir.path(), &e.text))
        .collect();
    let sequential_texts: Vec<String> = sequential
        .elements
        .iter()
        .map(|e| strip(sequential_dir.path(), &e.text))
        .collect();

    assert_eq!(parallel_texts, sequential_texts);
    assert_eq!(parallel.stats.element_count(), sequential.stats.element_count());
    assert_eq!(parallel.stats.table_count, sequential.stats.table_count);
}

#[test]
fn test_empty_image_degrades_by_default() {
    let doc = SpanDocument::from_json_str(&dump("")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let sink = FolderSink::new(dir.path());

    let degraded = PageOrchestrator::new(&doc).with_sink(&sink).run().unwrap();
    assert_eq!(degraded.stats.image_count, 0);
    assert_eq!(degraded.stats.table_count, 2);
    assert_eq!(degraded.elements.elements[0].kind, ElementType::Table);
    assert_eq!(degraded.elements.len(), 8);

    let strict = PageOrchestrator::new(&doc)
        .with_options(ClassifyOptions::new().strict())
        .with_sink(&sink)
        .run();
    assert!(matches!(strict, Err(Error::ImageExtract(_))));
}

#[test]
fn test_empty_table_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("memo.json");
    fs::write(
        &input,
        r#"{"pages": [{"tables": [{}], "blocks": [
            {"type": 0, "lines": [{"spans": [{"text": "Quarterly memo", "size": 12}]}]}
        ]}]}"#,
    )
    .unwrap();
    let out = dir.path().join("memo");

    let result = extract_to_folder(&input, &out).unwrap();
    let kinds: Vec<ElementType> = result.elements.iter().map(|e| e.kind).collect();

    assert_eq!(kinds, vec![ElementType::Table, ElementType::Para]);
    assert_eq!(fs::read_to_string(out.join("page_1_table_1.csv")).unwrap(), "");
}

#[test]
fn test_image_extension_cannot_escape_folder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.json");
    fs::write(
        &input,
        r#"{"pages": [{"images": [{"data": "iVBORw0KGgo=", "ext": "/../../escaped.txt"}], "blocks": [
            {"type": 0, "lines": [{"spans": [{"text": "Scanned page", "size": 12}]}]}
        ]}]}"#,
    )
    .unwrap();
    let out = dir.path().join("scan");

    let result = extract_to_folder(&input, &out).unwrap();

    assert_eq!(result.stats.image_count, 1);
    assert!(out.join("page_1_image_1.png").is_file());
    assert!(!dir.path().join("escaped.txt").exists());
}

#[test]
fn test_opening_span_on_later_page() {
    let dump = format!(
        r#"{{"pages": [
            {{"blocks": [{{"type": 1}}, {{"type": 0, "lines": [{{"spans": [{{"text": "  ", "size": 11}}]}}]}}]}},
            {{"blocks": [
                {{"type": 0, "lines": [{{"spans": [{{"text": "Field Report", "size": 20}}]}}]}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "{body}", "size": 11}}]}}]}}
            ]}},
            {{"blocks": [
                {{"type": 0, "lines": [{{"spans": [{{"text": "Appendix Tables", "size": 20}}]}}]}},
                {{"type": 0, "lines": [{{"spans": [{{"text": "{body}", "size": 11}}]}}]}}
            ]}}
        ]}}"#,
        body = BODY
    );
    let doc = SpanDocument::from_json_str(&dump).unwrap();

    let all = Classifier::new().classify_document(&doc).unwrap();
    let kinds: Vec<(ElementType, u32)> = all.elements.iter().map(|e| (e.kind, e.page)).collect();
    assert_eq!(
        kinds,
        vec![
            (ElementType::HeaderTitle, 2),
            (ElementType::Para, 2),
            (ElementType::Para, 3),
            (ElementType::Para, 3),
        ]
    );

    let selected = Classifier::new()
        .with_pages(PageSelection::Range(2..=3))
        .classify_document(&doc)
        .unwrap();
    assert_eq!(selected.elements, all.elements);

    let later = Classifier::new()
        .with_pages(PageSelection::Pages(vec![3]))
        .classify_document(&doc)
        .unwrap();
    assert_eq!(later.elements.elements[0].kind, ElementType::Para);
}

#[test]
fn test_page_selection_limits_assets() {
    let doc = report();
    let dir = tempfile::tempdir().unwrap();

    let result = Classifier::new()
        .with_pages(PageSelection::Pages(vec![2]))
        .with_asset_dir(dir.path())
        .classify_document(&doc)
        .unwrap();

    assert!(result.elements.iter().all(|e| e.page == 2));
    assert_eq!(result.stats.page_count, 1);
    assert!(!dir.path().join("page_1_image_1.png").exists());
    assert!(dir.path().join("page_2_table_1.csv").exists());
}

#[test]
fn test_text_only_writes_nothing() {
    let doc = report();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("assets");

    let result = Classifier::new()
        .text_only()
        .with_asset_dir(&out)
        .classify_document(&doc)
        .unwrap();

    assert!(result.elements.iter().all(|e| !e.kind.is_asset()));
    assert!(!out.exists());
}

#[test]
fn test_extract_to_folder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.json");
    fs::write(&input, dump("iVBORw0KGgo=")).unwrap();
    let out = dir.path().join("report");

    let result = extract_to_folder(&input, &out).unwrap();

    assert_eq!(result.stats.page_count, 2);
    assert_eq!(result.elements.len(), 9);
    assert!(out.join("page_1_image_1.png").is_file());
    assert!(out.join("page_1_table_1.csv").is_file());
    assert!(out.join("page_2_table_1.csv").is_file());

    let json = result.to_json(pdfstruct::JsonFormat::Compact).unwrap();
    assert!(json.contains(r#""type":"footer","text":"Draft for review","page":2"#));
}
