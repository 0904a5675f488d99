//! Rule types and per-rule matching.

mod cidr;
mod domain;
mod range;
mod wildcard;

pub use cidr::{cidr_addrs, parse_cidr};
pub use domain::{is_domain_name, is_subdomain_of};
pub use range::IpRange;
pub use wildcard::WildcardPattern;

pub(crate) use range::addr_range;

use ipnet::IpNet;
use std::net::IpAddr;

use crate::error::{Error, Result};
use crate::normalize::{canonicalize, join_host_port, split_host_port};
use crate::RuleType;

/// Kind-specific data of a rule, decided once at insertion.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Exact IP or domain, optionally with a port
    Host,
    /// Compiled `*` pattern
    Wildcard(WildcardPattern),
    /// CIDR block
    Cidr(IpNet),
    /// Inclusive address range
    IpRange(IpRange),
}

/// A single normalized include or exclude definition.
///
/// The `key` is the normalized text the rule was stored under (`host`,
/// `host:port`, `[v6]:port`, a CIDR, a range or a wildcard pattern). The
/// `base`/`port` pair is the key split on its port suffix and drives the
/// exclusion checks.
///
/// # Examples
/// ```
/// use hostscope::rule::Rule;
/// use hostscope::RuleType;
///
/// let rule = Rule::parse("HTTPS://Example2.com:8080/").unwrap();
/// assert_eq!(rule.key(), "example2.com:8080");
/// assert_eq!(rule.port(), Some("8080"));
/// assert_eq!(rule.rule_type(), RuleType::Host);
///
/// assert!(Rule::parse("not a host").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    key: String,
    base: String,
    port: Option<String>,
    kind: RuleKind,
}

impl Rule {
    /// Normalize and classify `definition`.
    ///
    /// Classification order: IP or domain literal (port kept), CIDR block,
    /// IP range, anything containing `*`. CIDR, range and wildcard rules keep
    /// the normalized text as-is.
    pub fn parse(definition: &str) -> Result<Self> {
        let canonical = canonicalize(definition);
        let (host, port) = split_host_port(&canonical);

        if host.parse::<IpAddr>().is_ok() || is_domain_name(host) {
            let key = join_host_port(host, port);
            return Ok(Self::with_kind(key, RuleKind::Host));
        }

        if let Some(net) = parse_cidr(&canonical) {
            return Ok(Self::with_kind(canonical, RuleKind::Cidr(net)));
        }

        if let Some(range) = IpRange::parse(&canonical) {
            return Ok(Self::with_kind(canonical, RuleKind::IpRange(range)));
        }

        if canonical.contains('*') {
            let pattern = WildcardPattern::new(&canonical)?;
            return Ok(Self::with_kind(canonical, RuleKind::Wildcard(pattern)));
        }

        Err(Error::InvalidHost(canonical))
    }

    /// An exact-host rule for text that no syntax accepts.
    ///
    /// Used for registered targets such as `example.com/robots.txt`, which
    /// must still be included verbatim.
    pub(crate) fn opaque(key: String) -> Self {
        Self::with_kind(key, RuleKind::Host)
    }

    fn with_kind(key: String, kind: RuleKind) -> Self {
        let (base, port) = split_host_port(&key);
        let base = base.to_string();
        let port = port.map(str::to_string);
        Self {
            key,
            base,
            port,
            kind,
        }
    }

    /// The normalized key this rule is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key without its port suffix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Port suffix of the key, if any.
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// Kind-specific data.
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Get the type of this rule.
    pub fn rule_type(&self) -> RuleType {
        match self.kind {
            RuleKind::Host => RuleType::Host,
            RuleKind::Wildcard(_) => RuleType::Wildcard,
            RuleKind::Cidr(_) => RuleType::Cidr,
            RuleKind::IpRange(_) => RuleType::IpRange,
        }
    }

    /// Include semantics: does this rule admit `target`?
    ///
    /// `target` must already be canonical. `ip` is `target` parsed as a bare
    /// address, if it is one. With `parent_prefix` set, a key that is a
    /// string prefix of `target` also matches (so `example.com` admits
    /// `example.com/foo`, and also `example.community`).
    pub fn match_include(&self, target: &str, ip: Option<IpAddr>, parent_prefix: bool) -> bool {
        if self.key == target || (parent_prefix && target.starts_with(&self.key)) {
            return true;
        }

        match &self.kind {
            RuleKind::Host => false,
            RuleKind::Wildcard(pattern) => pattern.is_match(target),
            RuleKind::Cidr(net) => ip.map_or(false, |ip| net.contains(&ip)),
            RuleKind::IpRange(range) => ip.map_or(false, |ip| range.contains(ip)),
        }
    }

    /// Short description of what the rule covers.
    pub fn describe(&self) -> String {
        match &self.kind {
            RuleKind::Host => match self.port() {
                Some(port) => format!("{} port {}", self.base, port),
                None => self.base.clone(),
            },
            RuleKind::Wildcard(pattern) => format!("pattern {}", pattern.as_str()),
            RuleKind::Cidr(net) => format!("{}-{}", net.network(), net.broadcast()),
            RuleKind::IpRange(range) => range.to_string(),
        }
    }

    /// Exclude semantics for a target split into `base` and `port`.
    ///
    /// Same base: a hit only when the ports agree (both absent counts).
    /// Different base: a hit when `base` is a subdomain of this rule's base,
    /// whatever the ports.
    pub fn match_exclude(&self, base: &str, port: Option<&str>) -> bool {
        if self.base == base {
            return self.port.as_deref() == port;
        }
        is_subdomain_of(base, &self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Option<IpAddr> {
        s.parse().ok()
    }

    #[test]
    fn test_classification() {
        assert_eq!(Rule::parse("192.168.1.1").unwrap().rule_type(), RuleType::Host);
        assert_eq!(Rule::parse("192.168.1.1:8080").unwrap().rule_type(), RuleType::Host);
        assert_eq!(Rule::parse("example.com").unwrap().rule_type(), RuleType::Host);
        assert_eq!(Rule::parse("example.com:8080").unwrap().rule_type(), RuleType::Host);
        assert_eq!(Rule::parse("192.168.2.0/24").unwrap().rule_type(), RuleType::Cidr);
        assert_eq!(Rule::parse("192.168.3.2-5").unwrap().rule_type(), RuleType::IpRange);
        assert_eq!(Rule::parse("*.example.com").unwrap().rule_type(), RuleType::Wildcard);
        assert_eq!(
            Rule::parse("*.example.*.test").unwrap().rule_type(),
            RuleType::Wildcard
        );
    }

    #[test]
    fn test_scheme_and_slash_stripped() {
        assert_eq!(Rule::parse("http://example.com/").unwrap().key(), "example.com");
        assert_eq!(Rule::parse("https://EXAMPLE.com").unwrap().key(), "example.com");
        assert_eq!(Rule::parse("ftp://192.168.1.1").unwrap().key(), "192.168.1.1");
        assert_eq!(
            Rule::parse("http://192.168.2.0/24").unwrap().key(),
            "192.168.2.0/24"
        );
    }

    #[test]
    fn test_ipv6_rules() {
        let rule = Rule::parse("[2001:db8::1]:443").unwrap();
        assert_eq!(rule.key(), "[2001:db8::1]:443");
        assert_eq!(rule.base(), "2001:db8::1");
        assert_eq!(rule.port(), Some("443"));

        let rule = Rule::parse("2001:db8::1").unwrap();
        assert_eq!(rule.key(), "2001:db8::1");
        assert_eq!(rule.port(), None);

        assert_eq!(Rule::parse("fc00::/7").unwrap().rule_type(), RuleType::Cidr);
    }

    #[test]
    fn test_invalid_hosts() {
        for bad in ["", "localhost", "not a host", "example.com/path", "192.168.2.0/24:80"] {
            match Rule::parse(bad) {
                Err(Error::InvalidHost(input)) => assert_eq!(input, bad.to_lowercase()),
                other => panic!("expected InvalidHost for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_match_include_exact_and_port() {
        let rule = Rule::parse("example2.com:8080").unwrap();
        assert!(rule.match_include("example2.com:8080", None, true));
        assert!(!rule.match_include("example2.com:1234", None, true));
        assert!(!rule.match_include("example2.com", None, true));
    }

    #[test]
    fn test_match_include_parent_prefix() {
        let rule = Rule::parse("example.com").unwrap();
        assert!(rule.match_include("example.com/foo/scope.html", None, true));
        assert!(!rule.match_include("example.com/foo/scope.html", None, false));
        assert!(rule.match_include("example.com", None, false));
    }

    #[test]
    fn test_match_include_addresses() {
        let cidr = Rule::parse("192.168.10.0/24").unwrap();
        assert!(cidr.match_include("192.168.10.50", ip("192.168.10.50"), true));
        assert!(!cidr.match_include("192.168.11.50", ip("192.168.11.50"), true));
        assert!(!cidr.match_include("example.com", None, true));

        let range = Rule::parse("192.168.0.1-5").unwrap();
        assert!(range.match_include("192.168.0.4", ip("192.168.0.4"), false));
        assert!(!range.match_include("192.168.0.8", ip("192.168.0.8"), false));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Rule::parse("example.com:8080").unwrap().describe(), "example.com port 8080");
        assert_eq!(Rule::parse("10.0.0.1").unwrap().describe(), "10.0.0.1");
        assert_eq!(Rule::parse("*.example.com").unwrap().describe(), "pattern *.example.com");
        assert_eq!(
            Rule::parse("192.168.2.0/24").unwrap().describe(),
            "192.168.2.0-192.168.2.255"
        );
        assert_eq!(
            Rule::parse("192.168.3.2-5").unwrap().describe(),
            "192.168.3.2-192.168.3.5"
        );
    }

    #[test]
    fn test_match_exclude() {
        let rule = Rule::parse("192.168.0.2:8080").unwrap();
        assert!(rule.match_exclude("192.168.0.2", Some("8080")));
        assert!(!rule.match_exclude("192.168.0.2", Some("9090")));
        assert!(!rule.match_exclude("192.168.0.2", None));

        let rule = Rule::parse("somedomain.com").unwrap();
        assert!(rule.match_exclude("somedomain.com", None));
        assert!(!rule.match_exclude("somedomain.com", Some("443")));
        assert!(rule.match_exclude("sub.somedomain.com", None));
        assert!(rule.match_exclude("sub.somedomain.com", Some("9999")));
        assert!(!rule.match_exclude("othersomedomain.com", None));
    }
}
