//! Rendering tests over parsed fixtures

use wpt_import::render::build_spec;
use wpt_import::{ImportError, RenderOptions, render, render_with};

use crate::common::test_helpers::*;

#[test]
fn test_minimal_document_renders_tagid_locator() {
    let source = render(&parse_fixture(MINIMAL_WPT)).unwrap();

    assert!(!source.items.is_empty());
    assert!(source.spider.contains(r#"id("ex1")/text()"#));
    assert!(source.items.contains("class ExampleItem(Item):"));
    assert!(source.spider.contains("'http://www.example.com/index.php',"));
}

#[test]
fn test_product_fixture_uses_url_section() {
    let doc = parse_fixture(PRODUCT_WPT);
    let spec = build_spec(&doc, &RenderOptions::default()).unwrap();

    assert_eq!(spec.spider_name, "shop-example");
    assert_eq!(spec.item_class, "ShopExampleItem");
    assert_eq!(spec.domain, "www.shop-example.com");
    assert_eq!(
        spec.start_urls,
        vec!["http://www.shop-example.com/p/1", "http://www.shop-example.com/p/2"]
    );
}

#[test]
fn test_field_order_matches_in_both_artifacts() {
    let source = render(&parse_fixture(PRODUCT_WPT)).unwrap();

    let in_items: Vec<usize> = ["    title = Field()", "    price = Field()", "    sku = Field()"]
        .iter()
        .map(|line| source.items.find(line).unwrap())
        .collect();
    let in_spider: Vec<usize> = ["item['title']", "item['price']", "item['sku']"]
        .iter()
        .map(|line| source.spider.find(line).unwrap())
        .collect();

    assert!(in_items.windows(2).all(|w| w[0] < w[1]));
    assert!(in_spider.windows(2).all(|w| w[0] < w[1]));
    assert!(source
        .spider
        .contains("item['price'] = hxs.select('/html/body/div[2]/span/text()').extract()"));
    assert!(source
        .spider
        .contains(r"item['sku'] = hxs.select('//body').re('SKU: (\\d+)')"));
}

#[test]
fn test_render_selected_template() {
    let options = RenderOptions {
        spider_name: Some("about".to_string()),
        template: Some("About".to_string()),
    };
    let source = render_with(&parse_fixture(PRODUCT_WPT), &options).unwrap();

    assert!(source.spider.contains("    name = 'about'"));
    assert!(source.spider.contains("'http://www.shop-example.com/about',"));
    assert!(source.items.contains("    body = Field()"));
    assert!(!source.items.contains("title"));
}

#[test]
fn test_nested_blocks_are_not_fields() {
    let doc = parse_fixture(&wpt_with(
        r#"<ow:template ow:name="T" ow:url="http://example.com/">
            <ow:block name="outer" ow:tagid="o">
                <ow:block name="inner" ow:xpath="//span"/>
            </ow:block>
        </ow:template>"#,
    ));
    let spec = build_spec(&doc, &RenderOptions::default()).unwrap();

    assert_eq!(spec.fields.len(), 1);
    assert_eq!(spec.fields[0].name, "outer");
}

#[test]
fn test_document_without_templates_is_missing_field() {
    let result = render(&parse_fixture(NO_TEMPLATE_WPT));
    assert!(matches!(result, Err(ImportError::MissingField { .. })));
}
