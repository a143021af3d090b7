//! CIDR exclusion: carving an IPv4 range out of a larger network.

use anyhow::{bail, Result};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Remove `exclusion` from `network`, returning the minimal set of CIDR
/// networks covering the remainder.
///
/// Exclusion only fires when `exclusion` is a strict subnet of `network`:
/// if the two ranges are unrelated, equal, or `network` is itself contained
/// in `exclusion`, the network is returned unchanged as a single-element
/// vector.
///
/// The remainder is computed by binary subnet splitting: the network is
/// halved repeatedly, the half that does not contain the exclusion is
/// emitted, and the other half is split again until it equals the exclusion
/// (which is dropped). Results follow that split order, not numeric address
/// order.
///
/// # Examples
/// ```
/// use wg_reconf::exclude::exclude;
///
/// let net = "10.0.0.0/24".parse().unwrap();
/// let excl = "10.0.0.128/25".parse().unwrap();
/// assert_eq!(exclude(net, excl), vec!["10.0.0.0/25".parse().unwrap()]);
/// ```
pub fn exclude(network: Ipv4Net, exclusion: Ipv4Net) -> Vec<Ipv4Net> {
    if exclusion.prefix_len() <= network.prefix_len() || !network.contains(&exclusion) {
        return vec![network];
    }

    let mut remainder = Vec::new();
    let mut current = network;
    while current != exclusion {
        let Some((lower, upper)) = split(current) else {
            // Unreachable: current strictly contains exclusion, so its
            // prefix is < 32.
            break;
        };
        if lower.contains(&exclusion) {
            remainder.push(upper);
            current = lower;
        } else {
            remainder.push(lower);
            current = upper;
        }
    }
    remainder
}

/// Split a network into its two half-size children.
fn split(network: Ipv4Net) -> Option<(Ipv4Net, Ipv4Net)> {
    if network.prefix_len() >= 32 {
        return None;
    }
    let prefix = network.prefix_len() + 1;
    let base = u32::from(network.network());
    let half = 1u32 << (32 - prefix);
    let lower = Ipv4Net::new(Ipv4Addr::from(base), prefix).ok()?;
    let upper = Ipv4Net::new(Ipv4Addr::from(base + half), prefix).ok()?;
    Some((lower, upper))
}

/// Parse and validate the exclusion range given on the command line.
///
/// Accepts CIDR notation or a bare address (treated as /32). The range must
/// be a proper network: host bits set below the prefix are a fatal error,
/// reported before any file is touched.
pub fn parse_exclusion(s: &str) -> Result<Ipv4Net> {
    let net: Ipv4Net = if s.contains('/') {
        s.parse()
            .map_err(|_| anyhow::anyhow!("Invalid IPv4 CIDR: {}", s))?
    } else {
        let addr: Ipv4Addr = s
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid IPv4 address: {}", s))?;
        Ipv4Net::from(addr)
    };

    if net != net.trunc() {
        bail!(
            "Invalid exclusion range '{}': host bits set, did you mean {}?",
            s,
            net.trunc()
        );
    }

    Ok(net)
}
