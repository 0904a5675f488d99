//! Rule type definitions.

use std::fmt;

/// RuleType represents the kind of a stored rule.
///
/// The kind is decided once, when the rule is inserted, and the matcher
/// dispatches on it instead of re-inspecting the rule text per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Exact IP address or domain name, optionally with a port
    Host,
    /// Pattern containing `*` tokens
    Wildcard,
    /// IP CIDR block (IPv4 or IPv6)
    Cidr,
    /// Inclusive IP address range
    IpRange,
}

impl RuleType {
    /// Parse a rule type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HOST" | "DOMAIN" | "IP" => Some(RuleType::Host),
            "WILDCARD" => Some(RuleType::Wildcard),
            "CIDR" | "IP-CIDR" => Some(RuleType::Cidr),
            "IP-RANGE" | "IPRANGE" | "RANGE" => Some(RuleType::IpRange),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Host => "HOST",
            RuleType::Wildcard => "WILDCARD",
            RuleType::Cidr => "CIDR",
            RuleType::IpRange => "IP-RANGE",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
