//! Address family helpers

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of an IP value.
///
/// Always derived from an address, never supplied separately, so a
/// family and the address it describes cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpFamily {
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
}

impl IpFamily {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpFamily::Ipv4,
            IpAddr::V6(_) => IpFamily::Ipv6,
        }
    }

    pub fn of_network(net: &IpNetwork) -> Self {
        match net {
            IpNetwork::V4(_) => IpFamily::Ipv4,
            IpNetwork::V6(_) => IpFamily::Ipv6,
        }
    }
}

impl std::fmt::Display for IpFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpFamily::Ipv4 => write!(f, "IPv4"),
            IpFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// First IPv4 address in `ips`.
pub fn find_ipv4(ips: &[IpAddr]) -> Option<Ipv4Addr> {
    ips.iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(_) => None,
    })
}

/// First IPv6 address in `ips`.
pub fn find_ipv6(ips: &[IpAddr]) -> Option<Ipv6Addr> {
    ips.iter().find_map(|ip| match ip {
        IpAddr::V6(v6) => Some(*v6),
        IpAddr::V4(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10.0.0.1", IpFamily::Ipv4 ; "ipv4")]
    #[test_case("0.0.0.0", IpFamily::Ipv4 ; "ipv4 unspecified")]
    #[test_case("ff80::1", IpFamily::Ipv6 ; "ipv6")]
    #[test_case("::ffff:10.0.0.1", IpFamily::Ipv6 ; "ipv4 mapped ipv6")]
    fn test_family_of_addr(addr: &str, expected: IpFamily) {
        let addr: IpAddr = addr.parse().unwrap();
        assert_eq!(IpFamily::of(&addr), expected);
    }

    #[test]
    fn test_family_of_network() {
        let v4: IpNetwork = "10.0.0.0/24".parse().unwrap();
        let v6: IpNetwork = "2001:db8::/64".parse().unwrap();
        assert_eq!(IpFamily::of_network(&v4), IpFamily::Ipv4);
        assert_eq!(IpFamily::of_network(&v6), IpFamily::Ipv6);
    }

    #[test]
    fn test_find_first_of_each_family() {
        let ips: Vec<IpAddr> = vec![
            "fd00::1".parse().unwrap(),
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
            "fd00::2".parse().unwrap(),
        ];
        assert_eq!(find_ipv4(&ips), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(find_ipv6(&ips), Some("fd00::1".parse().unwrap()));
        assert_eq!(find_ipv4(&[]), None);
    }
}
