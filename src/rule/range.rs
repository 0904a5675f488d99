//! Inclusive IP address ranges.

use ipnet::{IpAddrRange, IpSubnets, Ipv4AddrRange, Ipv4Subnets, Ipv6AddrRange, Ipv6Subnets};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// An inclusive range of IP addresses of a single family.
///
/// # Pattern Formats
/// - Short form: `192.168.3.2-5` - the end replaces the last octet
/// - Full form: `192.168.1.1-192.168.1.50` or `2001:db8::1-2001:db8::ff`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange {
    start: IpAddr,
    end: IpAddr,
}

impl IpRange {
    /// Create a range, rejecting mixed families and `start > end`.
    pub fn new(start: IpAddr, end: IpAddr) -> Option<Self> {
        if start.is_ipv4() != end.is_ipv4() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Parse either range form.
    pub fn parse(pattern: &str) -> Option<Self> {
        let (start, end) = pattern.trim().split_once('-')?;
        let start: IpAddr = start.parse().ok()?;

        if let Ok(end) = end.parse::<IpAddr>() {
            return Self::new(start, end);
        }

        match start {
            IpAddr::V4(v4) if !end.is_empty() && end.len() <= 3 => {
                let last: u8 = end.parse().ok()?;
                let [a, b, c, _] = v4.octets();
                Self::new(start, IpAddr::V4(Ipv4Addr::new(a, b, c, last)))
            }
            _ => None,
        }
    }

    /// First address of the range.
    pub fn start(&self) -> IpAddr {
        self.start
    }

    /// Last address of the range.
    pub fn end(&self) -> IpAddr {
        self.end
    }

    /// Check whether `ip` falls inside the range.
    pub fn contains(&self, ip: IpAddr) -> bool {
        ip.is_ipv4() == self.start.is_ipv4() && self.start <= ip && ip <= self.end
    }

    /// Iterate over every address of the range.
    pub fn addrs(&self) -> IpAddrRange {
        addr_range(self.start, self.end)
    }

    /// The smallest list of CIDR blocks covering exactly this range.
    ///
    /// # Examples
    /// ```
    /// use hostscope::rule::IpRange;
    ///
    /// let range = IpRange::parse("10.0.0.0-10.0.1.255").unwrap();
    /// let nets: Vec<String> = range.subnets().map(|net| net.to_string()).collect();
    /// assert_eq!(nets, vec!["10.0.0.0/23"]);
    /// ```
    pub fn subnets(&self) -> IpSubnets {
        match (self.start, self.end) {
            (IpAddr::V4(s), IpAddr::V4(e)) => IpSubnets::V4(Ipv4Subnets::new(s, e, 0)),
            (IpAddr::V6(s), IpAddr::V6(e)) => IpSubnets::V6(Ipv6Subnets::new(s, e, 0)),
            _ => IpSubnets::V4(Ipv4Subnets::new(
                Ipv4Addr::BROADCAST,
                Ipv4Addr::UNSPECIFIED,
                0,
            )),
        }
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Build an address iterator over `start..=end`.
///
/// Mixed families yield an empty iterator.
pub(crate) fn addr_range(start: IpAddr, end: IpAddr) -> IpAddrRange {
    match (start, end) {
        (IpAddr::V4(s), IpAddr::V4(e)) => IpAddrRange::V4(Ipv4AddrRange::new(s, e)),
        (IpAddr::V6(s), IpAddr::V6(e)) => IpAddrRange::V6(Ipv6AddrRange::new(s, e)),
        _ => IpAddrRange::V4(Ipv4AddrRange::new(
            Ipv4Addr::BROADCAST,
            Ipv4Addr::UNSPECIFIED,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_short_form() {
        let range = IpRange::parse("192.168.0.1-5").unwrap();
        assert_eq!(range.start(), ip("192.168.0.1"));
        assert_eq!(range.end(), ip("192.168.0.5"));

        assert!(range.contains(ip("192.168.0.1")));
        assert!(range.contains(ip("192.168.0.4")));
        assert!(range.contains(ip("192.168.0.5")));
        assert!(!range.contains(ip("192.168.0.8")));
        assert!(!range.contains(ip("192.168.1.3")));
    }

    #[test]
    fn test_subnets() {
        let range = IpRange::parse("192.168.0.1-5").unwrap();
        let nets: Vec<String> = range.subnets().map(|net| net.to_string()).collect();
        assert_eq!(nets, vec!["192.168.0.1/32", "192.168.0.2/31", "192.168.0.4/31"]);

        let whole = IpRange::parse("0.0.0.0-255.255.255.255").unwrap();
        let nets: Vec<String> = whole.subnets().map(|net| net.to_string()).collect();
        assert_eq!(nets, vec!["0.0.0.0/0"]);

        let v6 = IpRange::parse("2001:db8::-2001:db8:ffff:ffff:ffff:ffff:ffff:ffff").unwrap();
        let nets: Vec<String> = v6.subnets().map(|net| net.to_string()).collect();
        assert_eq!(nets, vec!["2001:db8::/32"]);
    }

    #[test]
    fn test_full_form() {
        let range = IpRange::parse("10.0.0.250-10.0.1.5").unwrap();
        assert!(range.contains(ip("10.0.0.255")));
        assert!(range.contains(ip("10.0.1.0")));
        assert!(!range.contains(ip("10.0.1.6")));
    }

    #[test]
    fn test_ipv6_range() {
        let range = IpRange::parse("2001:db8::1-2001:db8::ff").unwrap();
        assert!(range.contains(ip("2001:db8::10")));
        assert!(!range.contains(ip("2001:db8::100")));
        assert!(!range.contains(ip("0.0.0.16")));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(IpRange::parse("192.168.0.5-1").is_none());
        assert!(IpRange::parse("192.168.0.1-256").is_none());
        assert!(IpRange::parse("192.168.0.1-").is_none());
        assert!(IpRange::parse("192.168.0.1-::1").is_none());
        assert!(IpRange::parse("example.com-5").is_none());
        assert!(IpRange::parse("192.168.0.1").is_none());
    }

    #[test]
    fn test_addrs() {
        let range = IpRange::parse("192.168.3.2-5").unwrap();
        let addrs: Vec<String> = range.addrs().map(|ip| ip.to_string()).collect();
        assert_eq!(
            addrs,
            vec!["192.168.3.2", "192.168.3.3", "192.168.3.4", "192.168.3.5"]
        );
        assert_eq!(range.to_string(), "192.168.3.2-192.168.3.5");
    }
}
