//! Rule collections and the include/exclude matcher.

use ahash::AHashMap;
use std::net::IpAddr;

use crate::error::Result;
use crate::normalize::{canonicalize, split_base_port};
use crate::rule::Rule;
use crate::RuleType;

/// RuleSet is one unordered collection of rules, keyed by normalized text.
///
/// A [`Scope`](crate::Scope) owns two of these, one for includes and one for
/// excludes. Inserting an equivalent definition twice leaves a single entry.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: AHashMap<String, Rule>,
}

impl RuleSet {
    /// Create an empty RuleSet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of rules in this set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if this set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Normalize, classify and store `definition`.
    pub fn insert(&mut self, definition: &str) -> Result<()> {
        let rule = Rule::parse(definition)?;
        self.insert_rule(rule);
        Ok(())
    }

    /// Insert every definition in order, stopping at the first invalid one.
    ///
    /// Definitions before the failing one stay inserted.
    pub fn insert_all<I, S>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for definition in definitions {
            self.insert(definition.as_ref())?;
        }
        Ok(())
    }

    /// Store an already built rule, replacing any rule with the same key.
    pub fn insert_rule(&mut self, rule: Rule) {
        self.rules.insert(rule.key().to_string(), rule);
    }

    /// Normalize `definition` and remove the rule stored under it.
    ///
    /// Returns `true` if a rule was removed.
    pub fn remove(&mut self, definition: &str) -> bool {
        let key = match Rule::parse(definition) {
            Ok(rule) => rule.key().to_string(),
            Err(_) => canonicalize(definition),
        };
        self.remove_key(&key)
    }

    /// Remove the rule stored under an exact key.
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.rules.remove(key).is_some()
    }

    /// Check whether a rule is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Look up the rule stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    /// Iterate over the rules in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.rules.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Rules of the given type (all rules for `None`), sorted by key.
    pub fn sorted(&self, rule_type: Option<RuleType>) -> Vec<&Rule> {
        self.keys()
            .iter()
            .filter_map(|key| self.get(key))
            .filter(|rule| rule_type.map_or(true, |t| rule.rule_type() == t))
            .collect()
    }

    /// Number of rules of the given type.
    pub fn count_of(&self, rule_type: RuleType) -> usize {
        self.iter().filter(|rule| rule.rule_type() == rule_type).count()
    }

    /// Check whether any rule admits `target` as an include.
    ///
    /// `target` must already be canonical (see
    /// [`canonicalize`](crate::normalize::canonicalize)).
    pub fn match_include(&self, target: &str, parent_prefix: bool) -> bool {
        if self.rules.contains_key(target) {
            return true;
        }

        let ip: Option<IpAddr> = target.parse().ok();
        self.rules
            .values()
            .any(|rule| rule.match_include(target, ip, parent_prefix))
    }

    /// Check whether any rule excludes `target`.
    ///
    /// `target` must already be canonical.
    pub fn match_exclude(&self, target: &str) -> bool {
        let (base, port) = split_base_port(target);
        self.rules
            .values()
            .any(|rule| rule.match_exclude(base, port))
    }
}
