//! Spider source generation
//!
//! Rendering happens in two steps. [`build_spec`] turns a validated document
//! into a [`SpiderSpec`]: class names, domain, seed urls and an ordered list
//! of fields with their extraction expressions. [`render_spec`] then fills two
//! independent text templates from that record, so both artifacts always see
//! the same field order.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use crate::document::{Block, Document, Locator, Template};
use crate::domain::extract_domain;
use crate::error::{ImportError, Result};

const ITEMS_TEMPLATE: &str = "\
# Define here the models for your scraped items

from scrapy.item import Item, Field


class ${item_class}(Item):
${fields}
";

const SPIDER_TEMPLATE: &str = "\
from scrapy.spider import BaseSpider
from scrapy.selector import HtmlXPathSelector


class ${spider_class}(BaseSpider):
    name = ${spider_name}
    allowed_domains = [${domain}]
    start_urls = [
${start_urls}
    ]

    def parse(self, response):
        hxs = HtmlXPathSelector(response)
        item = ${item_class}()
${extractions}
        return item


SPIDER = ${spider_class}()
";

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Cached regex for `${name}` placeholders
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([a-z_]+)\}").expect("Failed to compile placeholder regex")
    })
}

/// Knobs for rendering that do not come from the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spider `name`; defaults to the site name
    pub spider_name: Option<String>,
    /// Template to render; defaults to the first one
    pub template: Option<String>,
}

/// How a field's value is pulled out of the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// XPath selecting the text to extract
    XPath(String),
    /// Regular expression run over the page body
    Regex(String),
}

impl Extractor {
    /// Python expression evaluated inside `parse`
    pub fn expression(&self) -> String {
        match self {
            Extractor::XPath(xpath) => format!("hxs.select({}).extract()", py_str(xpath)),
            Extractor::Regex(pattern) => format!("hxs.select('//body').re({})", py_str(pattern)),
        }
    }
}

/// One generated item field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub extractor: Extractor,
}

/// Everything the two text templates need, computed up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiderSpec {
    pub spider_name: String,
    pub item_class: String,
    pub spider_class: String,
    pub domain: String,
    pub start_urls: Vec<String>,
    pub fields: Vec<FieldSpec>,
}

/// Rendered items and spider source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub items: String,
    pub spider: String,
}

impl fmt::Display for GeneratedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.items, self.spider)
    }
}

/// Render the first template of a validated document
pub fn render(doc: &Document) -> Result<GeneratedSource> {
    render_with(doc, &RenderOptions::default())
}

/// Render with explicit options
pub fn render_with(doc: &Document, options: &RenderOptions) -> Result<GeneratedSource> {
    let spec = build_spec(doc, options)?;
    Ok(render_spec(&spec))
}

/// Compute the spider record for the selected template
pub fn build_spec(doc: &Document, options: &RenderOptions) -> Result<SpiderSpec> {
    let host = doc.host.as_deref().ok_or_else(|| ImportError::missing("host"))?;
    let host = extract_domain(host)?;

    let template = match &options.template {
        Some(name) => doc
            .template_named(name)
            .ok_or_else(|| ImportError::missing(format!("template {}", name)))?,
        None => doc
            .first_template()
            .ok_or_else(|| ImportError::missing("template"))?,
    };

    let mut taken = HashSet::new();
    let mut fields = Vec::with_capacity(template.blocks.len());
    for (index, block) in template.blocks.iter().enumerate() {
        let mut field = field_for_block(block, index + 1)?;
        field.name = unique_name(&field.name, &mut taken);
        fields.push(field);
    }

    let class_prefix = class_prefix(&host.site_name);

    Ok(SpiderSpec {
        spider_name: options
            .spider_name
            .clone()
            .unwrap_or_else(|| host.site_name.clone()),
        item_class: format!("{}Item", class_prefix),
        spider_class: format!("{}Spider", class_prefix),
        domain: host.domain,
        start_urls: start_urls(doc, template),
        fields,
    })
}

/// Fill both text templates from a spider record
pub fn render_spec(spec: &SpiderSpec) -> GeneratedSource {
    let fields = if spec.fields.is_empty() {
        "    pass".to_string()
    } else {
        spec.fields
            .iter()
            .map(|f| format!("    {} = Field()", f.name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let start_urls = spec
        .start_urls
        .iter()
        .map(|url| format!("        {},", py_str(url)))
        .collect::<Vec<_>>()
        .join("\n");

    let extractions = spec
        .fields
        .iter()
        .map(|f| {
            format!(
                "        item[{}] = {}",
                py_str(&f.name),
                f.extractor.expression()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let spider_name = py_str(&spec.spider_name);
    let domain = py_str(&spec.domain);

    let items = substitute(
        ITEMS_TEMPLATE,
        &[
            ("item_class", spec.item_class.as_str()),
            ("fields", fields.as_str()),
        ],
    );
    let spider = substitute(
        SPIDER_TEMPLATE,
        &[
            ("spider_class", spec.spider_class.as_str()),
            ("spider_name", spider_name.as_str()),
            ("domain", domain.as_str()),
            ("start_urls", start_urls.as_str()),
            ("item_class", spec.item_class.as_str()),
            ("extractions", extractions.as_str()),
        ],
    );

    GeneratedSource { items, spider }
}

/// `position` is 1-based and names a block that has no usable `name`
fn field_for_block(block: &Block, position: usize) -> Result<FieldSpec> {
    let extractor = match block.locator() {
        Some(Locator::TagId(tagid)) if !tagid.trim().is_empty() => {
            Extractor::XPath(tag_id_xpath(tagid.trim()))
        }
        Some(Locator::XPath(xpath)) if !xpath.trim().is_empty() => {
            Extractor::XPath(text_xpath(xpath.trim()))
        }
        Some(Locator::Pattern(pattern)) if !pattern.is_empty() => {
            Extractor::Regex(pattern.to_string())
        }
        _ => {
            let label = block.name.as_deref().unwrap_or("without a name");
            return Err(ImportError::missing(format!("locator of block {}", label)));
        }
    };

    let name = block
        .name
        .as_deref()
        .and_then(identifier)
        .or_else(|| block.tagid.as_deref().and_then(identifier))
        .unwrap_or_else(|| format!("field_{}", position));

    Ok(FieldSpec { name, extractor })
}

/// First of `name`, `name_2`, `name_3`, ... not yet in `taken`
fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", name, suffix);
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Inline url, or every url mapped to the template, in document order
fn start_urls(doc: &Document, template: &Template) -> Vec<String> {
    if let Some(url) = &template.url {
        return vec![url.trim().to_string()];
    }

    match template.name.as_deref() {
        Some(name) => doc
            .mappings_for(name)
            .flat_map(|m| m.urls.iter().cloned())
            .collect(),
        None => Vec::new(),
    }
}

/// `id("ex1")/text()`
pub fn tag_id_xpath(tagid: &str) -> String {
    format!("id({})/text()", xpath_literal(tagid))
}

/// XPath 1.0 string literal; falls back to `concat()` when both quote kinds appear
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|part| format!("'{}'", part)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Make an XPath select text: drop a trailing `/` and append `/text()`
/// unless the last step already yields text or an attribute
pub fn text_xpath(xpath: &str) -> String {
    let trimmed = xpath.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/text()".to_string();
    }

    let last_step = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if last_step.ends_with("text()") || last_step.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("{}/text()", trimmed)
    }
}

/// Python identifier for a field name; `None` if nothing usable is left
fn identifier(name: &str) -> Option<String> {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if ident.is_empty() || ident.chars().all(|c| c == '_') {
        return None;
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    Some(ident)
}

/// CamelCase prefix for generated class names
fn class_prefix(site_name: &str) -> String {
    let prefix: String = site_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if prefix.is_empty() || prefix.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Wpt{}", prefix)
    } else {
        prefix
    }
}

/// Single-quoted Python string literal
fn py_str(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            _ => literal.push(c),
        }
    }
    literal.push('\'');
    literal
}

/// Replace `${key}` placeholders in one pass; substituted values are not rescanned
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    get_placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
