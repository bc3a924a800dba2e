//! Request address matching against exact addresses and CIDR ranges

use super::Origin;
use ipnet::IpNet;
use std::net::{AddrParseError, IpAddr};
use std::str::FromStr;
use tracing::warn;

/// Origin backed by the peer address of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr {
    addr: IpAddr,
}

impl RemoteAddr {
    pub fn new(addr: IpAddr) -> Self {
        RemoteAddr {
            addr: addr.to_canonical(),
        }
    }

    /// IPv4 addresses also match ranges written in IPv4-mapped IPv6 form
    fn mapped_in(&self, net: &IpNet) -> bool {
        match (self.addr, net) {
            (IpAddr::V4(v4), IpNet::V6(_)) => net.contains(&IpAddr::V6(v4.to_ipv6_mapped())),
            _ => false,
        }
    }

    fn matches_entry(&self, entry: &str) -> bool {
        let entry = entry.trim();
        if entry == "*" {
            return true;
        }

        if entry.contains('/') {
            return match entry.parse::<IpNet>() {
                Ok(net) => net.contains(&self.addr) || self.mapped_in(&net),
                Err(e) => {
                    warn!("Skipping invalid IP range {:?}: {}", entry, e);
                    false
                }
            };
        }

        match entry.parse::<IpAddr>() {
            Ok(ip) => ip.to_canonical() == self.addr,
            Err(e) => {
                warn!("Skipping invalid IP address {:?}: {}", entry, e);
                false
            }
        }
    }
}

impl FromStr for RemoteAddr {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<IpAddr>().map(RemoteAddr::new)
    }
}

impl From<IpAddr> for RemoteAddr {
    fn from(addr: IpAddr) -> Self {
        RemoteAddr::new(addr)
    }
}

impl Origin for RemoteAddr {
    fn is_ips(&self, ips: &[String]) -> bool {
        ips.iter().any(|entry| self.matches_entry(entry))
    }
}
