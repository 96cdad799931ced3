use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Policy vocabulary applied when the configuration does not supply one.
///
/// Every search hit already mentions the subject; these terms separate policy
/// bills from incidental mentions. Industrial hemp is not a policy term.
pub const DEFAULT_POLICY_TERMS: &[&str] = &[
    "legalization",
    "legalize",
    "decriminalization",
    "decriminalize",
    "medical",
    "recreational",
    "adult use",
    "adult-use",
    "dispensary",
    "dispensaries",
    "cultivation",
    "possession",
    "tax",
    "license",
    "licensing",
    "expungement",
    "expunge",
    "equity",
    "tribal",
    "banking",
    "rescheduling",
    "schedule",
    "paraphernalia",
    "retail",
    "sales",
    "research",
    "thc",
    "cbd",
    "impaired driving",
];

/// Filter result indicating whether a bill should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

/// Keyword classifier over bill title and description
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    pattern: Regex,
}

impl RelevanceFilter {
    /// Build a filter from a list of terms, matched case-insensitively as substrings
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Err(Error::Config(
                "Relevance filter needs at least one policy term".to_string(),
            ));
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?;

        Ok(Self { pattern })
    }

    /// True when title or description mention at least one policy term
    pub fn is_relevant(&self, title: &str, description: &str) -> bool {
        // Newline keeps a term from straddling title and description
        let text = format!("{}\n{}", title, description);
        self.pattern.is_match(&text)
    }

    pub fn check(&self, title: &str, description: &str) -> FilterResult {
        if self.is_relevant(title, description) {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}
