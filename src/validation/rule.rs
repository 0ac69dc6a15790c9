//! Rule definitions and the plain-data rule configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::matcher::Matcher;
use crate::canonical::canonical_hash_hex;

/// Reason shown for a rule whose matcher was replaced by an override.
pub const OVERRIDE_REASON: &str = "This rule is a project module- specific override.  Look for its definition in the\n\
project module's rule configuration";

/// A standard the graph must not violate.
///
/// The rule is *violated* when its matcher matches the root vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Why the rule matters; shown in reports to guide a fix.
    pub reason: String,
    /// Matches vertices in violation.
    pub matcher: Matcher,
}

impl ValidationRule {
    /// Create a rule.
    pub fn new(reason: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            reason: reason.into(),
            matcher,
        }
    }
}

/// Rules, per-module overrides and ignores for one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Rule id -> rule.
    pub rules: BTreeMap<String, ValidationRule>,
    /// Rule id -> matcher replacing that rule's matcher.
    pub rule_overrides: BTreeMap<String, Matcher>,
    /// Rule ids whose violations are tolerated.
    pub ignore: Vec<String>,
}

impl ValidationConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style rule registration.
    pub fn with_rule(mut self, id: impl Into<String>, rule: ValidationRule) -> Self {
        self.rules.insert(id.into(), rule);
        self
    }

    /// Builder-style override registration.
    pub fn with_override(mut self, id: impl Into<String>, matcher: Matcher) -> Self {
        self.rule_overrides.insert(id.into(), matcher);
        self
    }

    /// Builder-style ignore registration.
    pub fn with_ignore(mut self, id: impl Into<String>) -> Self {
        self.ignore.push(id.into());
        self
    }

    /// Rules with overrides applied. An override replaces the matcher and
    /// the reason becomes [`OVERRIDE_REASON`].
    pub fn effective_rules(&self) -> BTreeMap<String, ValidationRule> {
        self.rules
            .iter()
            .map(|(id, rule)| {
                let effective = match self.rule_overrides.get(id) {
                    Some(matcher) => ValidationRule::new(OVERRIDE_REASON, matcher.clone()),
                    None => rule.clone(),
                };
                (id.clone(), effective)
            })
            .collect()
    }

    /// Rendered description of every rule and every override, in id order.
    pub fn describe_rules(&self) -> (Vec<String>, Vec<String>) {
        let rules = self.rules.values().map(|r| r.matcher.describe()).collect();
        let overrides = self.rule_overrides.values().map(Matcher::describe).collect();
        (rules, overrides)
    }

    /// Fingerprint over the rendered rule descriptions and the ignore list.
    ///
    /// Changes whenever a rule, override or ignore changes, so it can key
    /// cached validation results.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let (rules, overrides) = self.describe_rules();
        canonical_hash_hex(&(rules, overrides, &self.ignore))
    }
}
