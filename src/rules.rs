//! WPT Business Rule Validation
//!
//! Every rule is a pure predicate over a loaded [`Document`]. A well-formed
//! document that breaks a rule makes the predicate return `false`; nothing in
//! here fails or panics on odd input. [`check_all`] runs the whole set in a
//! fixed order and keeps every outcome, so a single run reports all broken
//! rules together.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::{Block, Document, MAX_BLOCK_DEPTH};
use crate::domain::extract_domain;

/// One structural rule a WPT document must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// `ow:host` is an http(s) url
    HostUrl,
    /// Some template has at least one block
    TemplateWithBlock,
    /// No template is empty
    EveryTemplateHasBlock,
    /// Every block, at any depth, has `tagid`, `xpath` or `pattern`
    BlockLocator,
    /// No two templates share a name
    UniqueTemplateNames,
    /// Templates without `ow:url` are covered by an `ow:urls` section
    UrlSection,
}

impl Rule {
    /// Rules in the order they are checked and reported
    pub const ALL: [Rule; 6] = [
        Rule::HostUrl,
        Rule::TemplateWithBlock,
        Rule::EveryTemplateHasBlock,
        Rule::BlockLocator,
        Rule::UniqueTemplateNames,
        Rule::UrlSection,
    ];

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            Rule::HostUrl => "host-url",
            Rule::TemplateWithBlock => "template-with-block",
            Rule::EveryTemplateHasBlock => "every-template-has-block",
            Rule::BlockLocator => "block-locator",
            Rule::UniqueTemplateNames => "unique-template-names",
            Rule::UrlSection => "url-section",
        }
    }

    /// Diagnostic reported when the rule is broken
    pub fn message(self) -> &'static str {
        match self {
            Rule::HostUrl => "The WPT file must have a valid host url.",
            Rule::TemplateWithBlock => {
                "The WPT file must have at least one template tag with one block tag."
            }
            Rule::EveryTemplateHasBlock => "Every template tag must have at least one block tag.",
            Rule::BlockLocator => {
                "Every block tag must have at least one of the xpath, tagid or pattern attributes."
            }
            Rule::UniqueTemplateNames => "Every template tag must have a unique name.",
            Rule::UrlSection => "Every template without a url must have a urls section for it.",
        }
    }

    /// Evaluate this rule against a document
    pub fn check(self, doc: &Document) -> bool {
        match self {
            Rule::HostUrl => has_valid_host_url(doc),
            Rule::TemplateWithBlock => has_at_least_one_template_with_block(doc),
            Rule::EveryTemplateHasBlock => every_template_has_block(doc),
            Rule::BlockLocator => every_block_has_locator(doc),
            Rule::UniqueTemplateNames => template_names_unique(doc),
            Rule::UrlSection => url_section_valid_for_urlless_templates(doc),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// `ow:host` is present and parses as an http(s) url
pub fn has_valid_host_url(doc: &Document) -> bool {
    doc.host
        .as_deref()
        .is_some_and(|host| extract_domain(host).is_ok())
}

/// At least one template, anywhere in the document, has a block
pub fn has_at_least_one_template_with_block(doc: &Document) -> bool {
    doc.templates.iter().any(|t| t.has_blocks())
}

/// Every template has a block; a document without templates fails
pub fn every_template_has_block(doc: &Document) -> bool {
    !doc.templates.is_empty() && doc.templates.iter().all(|t| t.has_blocks())
}

/// Every block of every template, nested ones included, carries a locator
pub fn every_block_has_locator(doc: &Document) -> bool {
    doc.templates
        .iter()
        .flat_map(|t| t.blocks.iter())
        .all(block_has_locator)
}

/// A block and all of its descendants carry a locator
///
/// Trees deeper than [`MAX_BLOCK_DEPTH`] fail rather than being walked.
pub fn block_has_locator(block: &Block) -> bool {
    fn walk(block: &Block, depth: usize) -> bool {
        depth <= MAX_BLOCK_DEPTH
            && block.has_locator()
            && block.blocks.iter().all(|child| walk(child, depth + 1))
    }

    walk(block, 1)
}

/// No two templates carry the same name
pub fn template_names_unique(doc: &Document) -> bool {
    let mut seen = HashSet::new();
    doc.templates
        .iter()
        .filter_map(|t| t.name.as_deref())
        .all(|name| seen.insert(name))
}

/// Every template without an inline url has an `ow:urls` section keyed by its name
pub fn url_section_valid_for_urlless_templates(doc: &Document) -> bool {
    doc.templates
        .iter()
        .filter(|t| t.url.is_none())
        .all(|t| {
            t.name
                .as_deref()
                .is_some_and(|name| doc.mappings_for(name).next().is_some())
        })
}

/// Outcome of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub passed: bool,
}

/// All rule outcomes for one document, in check order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub outcomes: Vec<RuleOutcome>,
}

impl ValidationReport {
    /// Check if every rule passed
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Broken rules, in check order
    pub fn failures(&self) -> Vec<Rule> {
        self.outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| o.rule)
            .collect()
    }

    /// Number of rules that passed
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Rebuild a full report from the broken rules alone
    pub fn from_failures(failures: &[Rule]) -> Self {
        let outcomes = Rule::ALL
            .iter()
            .map(|&rule| RuleOutcome {
                rule,
                passed: !failures.contains(&rule),
            })
            .collect();

        Self { outcomes }
    }
}

/// Run every rule, without stopping at the first failure
pub fn check_all(doc: &Document) -> ValidationReport {
    let outcomes = Rule::ALL
        .iter()
        .map(|&rule| RuleOutcome {
            rule,
            passed: rule.check(doc),
        })
        .collect();

    ValidationReport { outcomes }
}
