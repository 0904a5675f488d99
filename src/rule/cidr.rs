//! CIDR block parsing.

use ipnet::{IpAddrRange, IpNet};

use super::range::addr_range;

/// Parse `pattern` as an IPv4 or IPv6 CIDR block.
///
/// Host bits may be set (`192.168.1.7/24`); containment is always checked
/// against the network.
pub fn parse_cidr(pattern: &str) -> Option<IpNet> {
    if !pattern.contains('/') {
        return None;
    }
    pattern.trim().parse::<IpNet>().ok()
}

/// Every address of `net`, network and broadcast included.
pub fn cidr_addrs(net: &IpNet) -> IpAddrRange {
    addr_range(net.network(), net.broadcast())
}
