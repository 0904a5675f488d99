//! Target classification and the confirmed-target registry.

use ahash::AHashMap;
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

use crate::rule::{addr_range, cidr_addrs, is_domain_name, parse_cidr, IpRange};

/// TargetKind categorizes a registered target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Bare IP address
    Ip,
    /// Domain name
    Domain,
    /// CIDR block
    Cidr,
    /// IP address range
    IpRange,
    /// Anything else (URLs with paths, `host:port`, ...)
    Other,
}

impl TargetKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Ip => "IP",
            TargetKind::Domain => "DOMAIN",
            TargetKind::Cidr => "CIDR",
            TargetKind::IpRange => "IP-RANGE",
            TargetKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a normalized host, first match wins: IP, domain, CIDR, IP range.
///
/// Only used to categorize targets; include/exclude decisions never depend on
/// it.
///
/// # Examples
/// ```
/// use hostscope::{classify, TargetKind};
///
/// assert_eq!(classify("10.0.0.1"), TargetKind::Ip);
/// assert_eq!(classify("example.com"), TargetKind::Domain);
/// assert_eq!(classify("example.com:8080"), TargetKind::Other);
/// ```
pub fn classify(host: &str) -> TargetKind {
    if host.parse::<IpAddr>().is_ok() {
        TargetKind::Ip
    } else if is_domain_name(host) {
        TargetKind::Domain
    } else if parse_cidr(host).is_some() {
        TargetKind::Cidr
    } else if IpRange::parse(host).is_some() {
        TargetKind::IpRange
    } else {
        TargetKind::Other
    }
}

/// Registry of confirmed targets, keyed by normalized text.
#[derive(Debug, Clone, Default)]
pub struct Targets {
    entries: AHashMap<String, TargetKind>,
}

impl Targets {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registered targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a normalized target under its kind.
    pub fn insert(&mut self, target: String, kind: TargetKind) {
        self.entries.insert(target, kind);
    }

    /// Remove a normalized target, returning its kind.
    pub fn remove(&mut self, target: &str) -> Option<TargetKind> {
        self.entries.remove(target)
    }

    /// Check whether a normalized target is registered.
    pub fn contains(&self, target: &str) -> bool {
        self.entries.contains_key(target)
    }

    /// Kind-tagged view of every target.
    pub fn kinds(&self) -> &AHashMap<String, TargetKind> {
        &self.entries
    }

    /// All targets, sorted.
    pub fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self.entries.keys().cloned().collect();
        all.sort();
        all
    }

    /// Targets of one kind, sorted.
    pub fn of_kind(&self, kind: TargetKind) -> Vec<String> {
        let mut matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(target, _)| target.clone())
            .collect();
        matching.sort();
        matching
    }

    /// Expand IP, CIDR and IP-range targets into individual addresses.
    ///
    /// Targets are visited in sorted order; addresses are produced lazily.
    pub fn hosts(&self) -> impl Iterator<Item = IpAddr> + '_ {
        let mut entries: Vec<(&String, TargetKind)> =
            self.entries.iter().map(|(t, k)| (t, *k)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        entries
            .into_iter()
            .filter_map(|(target, kind)| match kind {
                TargetKind::Ip => target.parse::<IpAddr>().ok().map(|ip| addr_range(ip, ip)),
                TargetKind::Cidr => parse_cidr(target).map(|net| cidr_addrs(&net)),
                TargetKind::IpRange => IpRange::parse(target).map(|range| range.addrs()),
                TargetKind::Domain | TargetKind::Other => None,
            })
            .flatten()
    }

    /// Aggregate the address targets into the smallest list of CIDR blocks.
    pub fn collapsed_ips(&self) -> Vec<IpNet> {
        let mut nets: Vec<IpNet> = Vec::new();

        for (target, kind) in &self.entries {
            match kind {
                TargetKind::Ip => {
                    if let Ok(ip) = target.parse::<IpAddr>() {
                        nets.extend(host_net(ip));
                    }
                }
                TargetKind::Cidr => nets.extend(parse_cidr(target).map(|net| net.trunc())),
                TargetKind::IpRange => {
                    if let Some(range) = IpRange::parse(target) {
                        nets.extend(range.subnets());
                    }
                }
                TargetKind::Domain | TargetKind::Other => {}
            }
        }

        IpNet::aggregate(&nets)
    }
}

/// Single-address network for `ip`.
fn host_net(ip: IpAddr) -> Option<IpNet> {
    let prefix = if ip.is_ipv4() { 32 } else { 128 };
    IpNet::new(ip, prefix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("192.168.0.1"), TargetKind::Ip);
        assert_eq!(classify("2001:db8::1"), TargetKind::Ip);
        assert_eq!(classify("example.com"), TargetKind::Domain);
        assert_eq!(classify("192.168.2.0/24"), TargetKind::Cidr);
        assert_eq!(classify("192.168.3.2-5"), TargetKind::IpRange);
        assert_eq!(classify("example.com/robots.txt"), TargetKind::Other);
        assert_eq!(classify("*.example.com"), TargetKind::Other);
    }

    #[test]
    fn test_registry_accessors() {
        let mut targets = Targets::new();
        targets.insert("b.example.com".into(), TargetKind::Domain);
        targets.insert("a.example.com".into(), TargetKind::Domain);
        targets.insert("10.0.0.1".into(), TargetKind::Ip);
        targets.insert("example.com/foo".into(), TargetKind::Other);

        assert_eq!(targets.len(), 4);
        assert_eq!(
            targets.of_kind(TargetKind::Domain),
            vec!["a.example.com", "b.example.com"]
        );
        assert_eq!(targets.of_kind(TargetKind::Ip), vec!["10.0.0.1"]);
        assert_eq!(targets.kinds().get("example.com/foo"), Some(&TargetKind::Other));

        assert_eq!(targets.remove("10.0.0.1"), Some(TargetKind::Ip));
        assert_eq!(targets.remove("10.0.0.1"), None);
        assert!(!targets.contains("10.0.0.1"));
    }

    #[test]
    fn test_hosts_expansion() {
        let mut targets = Targets::new();
        targets.insert("10.0.0.0/31".into(), TargetKind::Cidr);
        targets.insert("10.0.1.1-2".into(), TargetKind::IpRange);
        targets.insert("10.0.2.9".into(), TargetKind::Ip);
        targets.insert("example.com".into(), TargetKind::Domain);

        let hosts: Vec<String> = targets.hosts().map(|ip| ip.to_string()).collect();
        assert_eq!(
            hosts,
            vec!["10.0.0.0", "10.0.0.1", "10.0.1.1", "10.0.1.2", "10.0.2.9"]
        );
    }

    #[test]
    fn test_collapsed_ips() {
        let mut targets = Targets::new();
        for ip in ["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"] {
            targets.insert(ip.into(), TargetKind::Ip);
        }
        targets.insert("10.0.0.0/24".into(), TargetKind::Cidr);
        targets.insert("10.0.1.0-255".into(), TargetKind::IpRange);

        let collapsed: Vec<String> = targets
            .collapsed_ips()
            .iter()
            .map(|net| net.to_string())
            .collect();
        assert_eq!(collapsed, vec!["10.0.0.0/23", "192.168.1.0/30"]);
    }

    #[test]
    fn test_collapsed_ips_wide_ranges() {
        let mut targets = Targets::new();
        targets.insert("0.0.0.0-255.255.255.255".into(), TargetKind::IpRange);
        targets.insert("10.0.0.0-10.15.255.255".into(), TargetKind::IpRange);
        targets.insert("2001:db8::-2001:db8::ffff:ffff:ffff".into(), TargetKind::IpRange);

        let collapsed: Vec<String> = targets
            .collapsed_ips()
            .iter()
            .map(|net| net.to_string())
            .collect();
        assert_eq!(collapsed, vec!["0.0.0.0/0", "2001:db8::/80"]);
    }
}
