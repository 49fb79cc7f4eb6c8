//! Typed WPT document tree
//!
//! The loader turns the XML markup into these plain structs once; every other
//! component reads them. Absent attributes are `None`, present-but-empty ones
//! are `Some("")`.

/// Namespace URI every WPT element and domain attribute lives in
pub const WPT_NAMESPACE: &str = "http://www.omfica.org/schemas/ow/0.9";

/// Deepest block nesting the loader and the validator will descend into
pub const MAX_BLOCK_DEPTH: usize = 64;

/// Root `<ow:wpt>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub host: Option<String>,
    pub templates: Vec<Template>,
    pub url_mappings: Vec<UrlMapping>,
}

/// `<ow:template>`: one page type to scrape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub name: Option<String>,
    pub url: Option<String>,
    pub blocks: Vec<Block>,
}

/// `<ow:block>`: one extraction target, possibly nested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Unprefixed `name`, used as the generated field name
    pub name: Option<String>,
    pub tagid: Option<String>,
    pub pattern: Option<String>,
    pub xpath: Option<String>,
    pub blocks: Vec<Block>,
}

/// `<ow:urls>`: seed URLs for a template without an inline `url`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlMapping {
    pub name: Option<String>,
    pub template: Option<String>,
    pub urls: Vec<String>,
}

/// Where a block's value lives on the target page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    TagId(&'a str),
    XPath(&'a str),
    Pattern(&'a str),
}

impl Document {
    pub fn new(host: Option<&str>) -> Self {
        Self {
            host: host.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_url_mapping(mut self, mapping: UrlMapping) -> Self {
        self.url_mappings.push(mapping);
        self
    }

    pub fn first_template(&self) -> Option<&Template> {
        self.templates.first()
    }

    /// First template carrying exactly this name
    pub fn template_named(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.name.as_deref() == Some(name))
    }

    /// Mappings whose `template` key equals `template_name`, in document order
    pub fn mappings_for<'a>(
        &'a self,
        template_name: &'a str,
    ) -> impl Iterator<Item = &'a UrlMapping> + 'a {
        self.url_mappings
            .iter()
            .filter(move |m| m.template.as_deref() == Some(template_name))
    }
}

impl Template {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn has_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn tagid(mut self, tagid: &str) -> Self {
        self.tagid = Some(tagid.to_string());
        self
    }

    pub fn xpath(mut self, xpath: &str) -> Self {
        self.xpath = Some(xpath.to_string());
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// True if any of `tagid`, `xpath` or `pattern` is present on this block
    pub fn has_locator(&self) -> bool {
        self.tagid.is_some() || self.xpath.is_some() || self.pattern.is_some()
    }

    /// The locator used for extraction; `tagid` wins over `xpath`, which wins over `pattern`
    pub fn locator(&self) -> Option<Locator<'_>> {
        if let Some(tagid) = &self.tagid {
            Some(Locator::TagId(tagid))
        } else if let Some(xpath) = &self.xpath {
            Some(Locator::XPath(xpath))
        } else {
            self.pattern.as_deref().map(Locator::Pattern)
        }
    }
}

impl UrlMapping {
    pub fn for_template(template: &str) -> Self {
        Self {
            name: Some(template.to_string()),
            template: Some(template.to_string()),
            urls: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.urls.push(url.to_string());
        self
    }
}
