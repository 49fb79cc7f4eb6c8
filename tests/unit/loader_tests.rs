//! Loader tests

use std::path::Path;
use tempfile::TempDir;

use wpt_import::document::MAX_BLOCK_DEPTH;
use wpt_import::{ImportError, load, parse_str};

use crate::common::test_helpers::*;

#[test]
fn test_load_nonexistent_path() {
    match load(Path::new("some_non_existent_file")) {
        Err(ImportError::NotFound { path }) => {
            assert_eq!(path, Path::new("some_non_existent_file"))
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_load_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_wpt(&temp_dir, "mytemplate.xml", "");

    let err = load(&path).unwrap_err();
    assert!(matches!(err, ImportError::MalformedMarkup { .. }));
    assert_eq!(
        err.to_string(),
        format!("There is a markup error in {}", path.display())
    );
}

#[test]
fn test_load_non_xml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_wpt(&temp_dir, "notes.txt", "just some text, not markup");

    let result = load(&path);
    assert!(matches!(result, Err(ImportError::MalformedMarkup { .. })));
}

#[test]
fn test_load_unclosed_element() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_wpt(&temp_dir, "broken.xml", &format!("{}<ow:template>", WPT_OPEN));

    let result = load(&path);
    assert!(matches!(result, Err(ImportError::MalformedMarkup { .. })));
}

#[test]
fn test_load_product_fixture() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_wpt(&temp_dir, "shop.xml", PRODUCT_WPT);

    let doc = load(&path).unwrap();
    assert_eq!(doc.host.as_deref(), Some("http://www.shop-example.com/"));
    assert_eq!(doc.templates.len(), 2);

    let products = doc.template_named("Products").unwrap();
    assert_eq!(products.url, None);
    let names: Vec<_> = products
        .blocks
        .iter()
        .map(|b| b.name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["title", "price", "sku"]);
    assert_eq!(products.blocks[1].xpath.as_deref(), Some("/html/body/div[2]/span/"));
    assert_eq!(products.blocks[2].pattern.as_deref(), Some(r"SKU: (\d+)"));

    let urls: Vec<_> = doc
        .mappings_for("Products")
        .flat_map(|m| m.urls.iter().map(String::as_str))
        .collect();
    assert_eq!(
        urls,
        vec!["http://www.shop-example.com/p/1", "http://www.shop-example.com/p/2"]
    );
}

#[test]
fn test_foreign_elements_are_ignored() {
    let doc = parse_fixture(&wpt_with(
        r#"<note>ignored</note>
           <ow:template ow:name="T" ow:url="http://example.com/">
               <block ow:tagid="not-wpt"/>
               <ow:block name="kept" ow:tagid="x"/>
           </ow:template>"#,
    ));

    assert_eq!(doc.templates.len(), 1);
    assert_eq!(doc.templates[0].blocks.len(), 1);
    assert_eq!(doc.templates[0].blocks[0].name.as_deref(), Some("kept"));
}

#[test]
fn test_other_prefix_same_namespace() {
    let doc = parse_str(
        r#"<w:wpt xmlns:w="http://www.omfica.org/schemas/ow/0.9" w:host="http://example.com">
             <w:template w:name="T" w:url="http://example.com/"><w:block name="a" w:tagid="x"/></w:template>
           </w:wpt>"#,
        Path::new("prefixed.xml"),
    )
    .unwrap();

    assert_eq!(doc.host.as_deref(), Some("http://example.com"));
    assert_eq!(doc.templates[0].blocks[0].tagid.as_deref(), Some("x"));
}

#[test]
fn test_wrong_root_is_malformed() {
    let result = parse_str("<html><body/></html>", Path::new("page.html"));
    assert!(matches!(result, Err(ImportError::MalformedMarkup { .. })));
}

#[test]
fn test_nesting_limit() {
    let nested = |depth: usize| {
        let open = r#"<ow:block ow:tagid="x">"#.repeat(depth);
        let close = "</ow:block>".repeat(depth);
        wpt_with(&format!(
            r#"<ow:template ow:name="T" ow:url="http://example.com/">{}{}</ow:template>"#,
            open, close
        ))
    };

    assert!(parse_str(&nested(MAX_BLOCK_DEPTH), Path::new("ok.xml")).is_ok());
    match parse_str(&nested(MAX_BLOCK_DEPTH + 1), Path::new("deep.xml")) {
        Err(ImportError::NestingTooDeep { limit, .. }) => assert_eq!(limit, MAX_BLOCK_DEPTH),
        other => panic!("Expected NestingTooDeep, got {:?}", other),
    }
}
