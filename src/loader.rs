//! WPT document loading
//!
//! Reads a file and turns its markup into the typed [`Document`] tree. The two
//! failure modes callers care about are kept apart: the file could not be read
//! at all ([`ImportError::NotFound`]) or it was read but is not a well-formed
//! WPT document ([`ImportError::MalformedMarkup`]).

use std::path::Path;

use roxmltree::Node;

use crate::document::{Block, Document, MAX_BLOCK_DEPTH, Template, UrlMapping, WPT_NAMESPACE};
use crate::error::{ImportError, Result};

/// Load and parse a WPT file
pub fn load(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|_| ImportError::NotFound {
        path: path.to_path_buf(),
    })?;

    let text = String::from_utf8(bytes).map_err(|e| ImportError::MalformedMarkup {
        path: path.to_path_buf(),
        details: format!("content is not valid UTF-8: {}", e),
    })?;

    parse_str(&text, path)
}

/// Parse WPT markup that has already been read; `origin` is only used in errors
pub fn parse_str(text: &str, origin: &Path) -> Result<Document> {
    let malformed = |details: String| ImportError::MalformedMarkup {
        path: origin.to_path_buf(),
        details,
    };

    let xml = roxmltree::Document::parse(text).map_err(|e| malformed(e.to_string()))?;
    let root = xml.root_element();

    if !root.has_tag_name((WPT_NAMESPACE, "wpt")) {
        return Err(malformed(format!(
            "expected root element wpt in namespace {}, found {}",
            WPT_NAMESPACE,
            root.tag_name().name()
        )));
    }

    let mut document = Document {
        host: wpt_attr(root, "host"),
        ..Document::default()
    };

    for child in wpt_children(root) {
        match child.tag_name().name() {
            "template" => document.templates.push(read_template(child, origin)?),
            "urls" => document.url_mappings.push(read_url_mapping(child)),
            _ => {}
        }
    }

    Ok(document)
}

fn read_template(node: Node<'_, '_>, origin: &Path) -> Result<Template> {
    let blocks = wpt_children(node)
        .filter(|n| n.tag_name().name() == "block")
        .map(|n| read_block(n, 1, origin))
        .collect::<Result<Vec<_>>>()?;

    Ok(Template {
        name: wpt_attr(node, "name"),
        url: wpt_attr(node, "url"),
        blocks,
    })
}

fn read_block(node: Node<'_, '_>, depth: usize, origin: &Path) -> Result<Block> {
    if depth > MAX_BLOCK_DEPTH {
        return Err(ImportError::NestingTooDeep {
            path: origin.to_path_buf(),
            limit: MAX_BLOCK_DEPTH,
        });
    }

    let blocks = wpt_children(node)
        .filter(|n| n.tag_name().name() == "block")
        .map(|n| read_block(n, depth + 1, origin))
        .collect::<Result<Vec<_>>>()?;

    Ok(Block {
        // The field name is the one attribute that is not namespaced
        name: node.attribute("name").map(str::to_string),
        tagid: wpt_attr(node, "tagid"),
        pattern: wpt_attr(node, "pattern"),
        xpath: wpt_attr(node, "xpath"),
        blocks,
    })
}

fn read_url_mapping(node: Node<'_, '_>) -> UrlMapping {
    let urls = wpt_children(node)
        .filter(|n| n.tag_name().name() == "url")
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();

    UrlMapping {
        name: wpt_attr(node, "name"),
        template: wpt_attr(node, "template"),
        urls,
    }
}

/// Element children in the WPT namespace, in document order
fn wpt_children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == Some(WPT_NAMESPACE))
}

fn wpt_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute((WPT_NAMESPACE, name)).map(str::to_string)
}
