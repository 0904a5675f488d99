//! The Scope facade: includes, excludes and confirmed targets.

use ahash::AHashMap;
use ipnet::IpNet;
use std::net::IpAddr;

use crate::config::{ScopeConfig, ScopeOptions};
use crate::error::{Error, Result};
use crate::normalize::canonicalize;
use crate::rule::Rule;
use crate::ruleset::RuleSet;
use crate::target::{classify, TargetKind, Targets};

/// Scope decides whether hosts, IPs and URLs are permissible targets.
///
/// A target is in scope when some include admits it and no exclude rejects
/// it. Includes admit by exact key, by key prefix (see
/// [`ScopeOptions::parent_prefix_includes`]), by wildcard pattern, and by
/// CIDR or IP-range containment of a bare address. Excludes reject by exact
/// key (port-sensitive) and by parent domain (any port).
///
/// Scope does no locking of its own; wrap it in a
/// [`SharedScope`](crate::SharedScope) to share it between threads.
///
/// # Examples
/// ```
/// use hostscope::Scope;
///
/// let mut scope = Scope::new();
/// scope.add_includes(["192.168.0.1-5", "*.example.com", "example2.com:8080"])?;
/// scope.add_excludes(["exclude.example.com", "somedomain.com"])?;
///
/// assert!(scope.in_scope("https://foo.example.com/"));
/// assert!(!scope.in_scope("exclude.example.com"));
/// assert!(!scope.in_scope("example2.com:1234"));
/// # Ok::<(), hostscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scope {
    includes: RuleSet,
    excludes: RuleSet,
    targets: Targets,
    options: ScopeOptions,
}

impl Scope {
    /// Create an empty Scope with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty Scope with the given options.
    pub fn with_options(options: ScopeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Get the options of this Scope.
    pub fn options(&self) -> &ScopeOptions {
        &self.options
    }

    /// Add a single include definition.
    pub fn add_include(&mut self, definition: &str) -> Result<()> {
        self.includes.insert(definition)
    }

    /// Add include definitions in order, stopping at the first invalid one.
    ///
    /// Definitions before the invalid one stay added.
    pub fn add_includes<I, S>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.includes.insert_all(definitions)
    }

    /// Add a single exclude definition.
    pub fn add_exclude(&mut self, definition: &str) -> Result<()> {
        self.excludes.insert(definition)
    }

    /// Add exclude definitions in order, stopping at the first invalid one.
    ///
    /// Definitions before the invalid one stay added.
    pub fn add_excludes<I, S>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excludes.insert_all(definitions)
    }

    /// Remove an include definition. Returns `true` if one was removed.
    pub fn remove_include(&mut self, definition: &str) -> bool {
        self.includes.remove(definition)
    }

    /// Remove an exclude definition. Returns `true` if one was removed.
    pub fn remove_exclude(&mut self, definition: &str) -> bool {
        self.excludes.remove(definition)
    }

    /// Check whether `target` is admitted by some include.
    pub fn is_included(&self, target: &str) -> bool {
        self.included(&canonicalize(target))
    }

    /// Check whether `target` is rejected by some exclude.
    pub fn is_excluded(&self, target: &str) -> bool {
        self.excluded(&canonicalize(target))
    }

    /// Check whether `target` is included and not excluded.
    pub fn in_scope(&self, target: &str) -> bool {
        let target = canonicalize(target);
        self.included(&target) && !self.excluded(&target)
    }

    fn included(&self, target: &str) -> bool {
        self.includes
            .match_include(target, self.options.parent_prefix_includes)
    }

    fn excluded(&self, target: &str) -> bool {
        self.excludes.match_exclude(target)
    }

    /// The include rule set.
    pub fn include_rules(&self) -> &RuleSet {
        &self.includes
    }

    /// The exclude rule set.
    pub fn exclude_rules(&self) -> &RuleSet {
        &self.excludes
    }

    /// All include keys, sorted.
    pub fn includes(&self) -> Vec<String> {
        self.includes.keys()
    }

    /// All exclude keys, sorted.
    pub fn excludes(&self) -> Vec<String> {
        self.excludes.keys()
    }

    /// Include keys that are not themselves excluded, sorted.
    pub fn active_includes(&self) -> Vec<String> {
        self.includes
            .keys()
            .into_iter()
            .filter(|key| !self.excluded(key))
            .collect()
    }

    /// Register a confirmed target.
    ///
    /// The target is normalized, rejected if currently excluded, classified,
    /// and added to the includes. Text that no rule syntax accepts (for
    /// example `example.com/robots.txt`) is still included as an exact key.
    /// Registering a target twice is a no-op.
    pub fn add_target(&mut self, target: &str) -> Result<()> {
        let target = canonicalize(target);
        if target.is_empty() {
            return Err(Error::InvalidHost(target));
        }
        if self.excluded(&target) {
            return Err(Error::TargetExcluded(target));
        }
        if self.targets.contains(&target) {
            return Ok(());
        }

        let rule = match Rule::parse(&target) {
            Ok(rule) => rule,
            Err(Error::InvalidHost(_)) => Rule::opaque(target.clone()),
            Err(e) => return Err(e),
        };
        self.includes.insert_rule(rule);

        let kind = classify(&target);
        self.targets.insert(target, kind);
        Ok(())
    }

    /// Register targets in order, stopping at the first failure.
    ///
    /// Targets before the failing one stay registered.
    pub fn add_targets<I, S>(&mut self, targets: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for target in targets {
            self.add_target(target.as_ref())?;
        }
        Ok(())
    }

    /// Unregister a target and drop its include.
    pub fn remove_target(&mut self, target: &str) -> Result<()> {
        let target = canonicalize(target);
        if self.targets.remove(&target).is_none() {
            return Err(Error::TargetNotFound(target));
        }
        self.includes.remove_key(&target);
        Ok(())
    }

    /// Check whether `target` is a registered target.
    pub fn is_target_added(&self, target: &str) -> bool {
        self.targets.contains(&canonicalize(target))
    }

    /// The target registry.
    pub fn target_registry(&self) -> &Targets {
        &self.targets
    }

    /// Every registered target mapped to its kind.
    pub fn target_kinds(&self) -> &AHashMap<String, TargetKind> {
        self.targets.kinds()
    }

    /// All registered targets, sorted.
    pub fn targets(&self) -> Vec<String> {
        self.targets.all()
    }

    /// Registered IP targets, sorted.
    pub fn target_ips(&self) -> Vec<String> {
        self.targets.of_kind(TargetKind::Ip)
    }

    /// Registered domain targets, sorted.
    pub fn target_domains(&self) -> Vec<String> {
        self.targets.of_kind(TargetKind::Domain)
    }

    /// Registered CIDR targets, sorted.
    pub fn target_cidrs(&self) -> Vec<String> {
        self.targets.of_kind(TargetKind::Cidr)
    }

    /// Registered IP-range targets, sorted.
    pub fn target_ranges(&self) -> Vec<String> {
        self.targets.of_kind(TargetKind::IpRange)
    }

    /// Registered targets of no recognized kind, sorted.
    pub fn target_other(&self) -> Vec<String> {
        self.targets.of_kind(TargetKind::Other)
    }

    /// Every individual address covered by IP, CIDR and IP-range targets.
    pub fn target_hosts(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.targets.hosts()
    }

    /// Address targets aggregated into the fewest CIDR blocks.
    pub fn collapsed_target_ips(&self) -> Vec<IpNet> {
        self.targets.collapsed_ips()
    }

    /// Export this Scope as a config.
    ///
    /// Includes that only exist because of a registered target are listed
    /// under `targets`, so building the config again yields the same Scope.
    pub fn to_config(&self) -> ScopeConfig {
        ScopeConfig {
            includes: self
                .includes
                .keys()
                .into_iter()
                .filter(|key| !self.targets.contains(key))
                .collect(),
            excludes: self.excludes.keys(),
            targets: self.targets.all(),
            options: self.options,
        }
    }
}
